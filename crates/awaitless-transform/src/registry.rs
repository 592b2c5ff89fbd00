//! Marker registry
//!
//! Resolves configured marker annotations against declarations and the
//! configured bridge functions against the program's top-level symbols. The
//! bridge-symbol table is built once per session and read-only afterwards.

use awaitless_config::{MarkAnnotation, TargetPlatform, TransformConfiguration, Transformer};
use awaitless_hir::{Annotation, ClassId, FunctionId, PlatformKind, Program, QualifiedName};
use rustc_hash::FxHashMap;

use crate::error::ConfigError;

/// Marker arguments resolved against one declaration
///
/// Computed once per (declaration, marker) pair; the synthetic member name is
/// `(base_name | original name) + (suffix | default suffix)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformAnnotationData {
    pub base_name: Option<String>,
    pub suffix: Option<String>,
    pub raw_as_property: Option<bool>,
    pub as_property: bool,
    pub function_name: String,
}

impl TransformAnnotationData {
    /// Read marker arguments by their configured names, defaulting absent ones
    pub fn resolve(
        annotation: &Annotation,
        mark: &MarkAnnotation,
        default_base_name: &str,
    ) -> Self {
        // An empty baseName means "use the original name"
        let base_name = annotation
            .string_arg(&mark.base_name_property)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let suffix = annotation
            .string_arg(&mark.suffix_property)
            .map(str::to_string);

        let raw_as_property = annotation.bool_arg(&mark.as_property_property);

        let function_name = format!(
            "{}{}",
            base_name.as_deref().unwrap_or(default_base_name),
            suffix.as_deref().unwrap_or(&mark.default_suffix),
        );

        TransformAnnotationData {
            base_name,
            suffix,
            raw_as_property,
            as_property: raw_as_property.unwrap_or(mark.default_as_property),
            function_name,
        }
    }
}

/// Qualified name of a marker annotation class
pub fn mark_class_name(mark: &MarkAnnotation) -> QualifiedName {
    QualifiedName::new(&mark.class_info.package_name, &mark.class_info.class_name)
}

/// Find a marker annotation on a declaration, falling back to its class
///
/// A marker on the containing type acts as a container-level default for all
/// of its members.
pub fn find_marker_annotation<'a>(
    program: &'a Program,
    function: FunctionId,
    owner: ClassId,
    mark: &MarkAnnotation,
) -> Option<&'a Annotation> {
    let class_name = mark_class_name(mark);
    program
        .function(function)
        .annotations
        .iter()
        .find(|a| a.class == class_name)
        .or_else(|| {
            program
                .class(owner)
                .annotations
                .iter()
                .find(|a| a.class == class_name)
        })
}

/// Whether a transformer's configured target applies to a module's platform
pub fn platform_matches(platform: PlatformKind, target: TargetPlatform) -> bool {
    matches!(
        (platform, target),
        (PlatformKind::Jvm, TargetPlatform::Jvm)
            | (PlatformKind::Js, TargetPlatform::Js)
            | (PlatformKind::Wasm, TargetPlatform::Wasm)
            | (PlatformKind::Native, TargetPlatform::Native)
            | (PlatformKind::Common, TargetPlatform::Common)
    )
}

/// Resolve every configured bridge descriptor to exactly one symbol
///
/// Any other outcome is a fatal configuration error: the transformation
/// cannot proceed against an absent or ambiguous bridge target.
pub fn resolve_bridge_symbols(
    program: &Program,
    config: &TransformConfiguration,
) -> Result<FxHashMap<Transformer, FunctionId>, ConfigError> {
    let mut map = FxHashMap::default();

    for (_, transformer) in config.iter() {
        let info = &transformer.transform_function_info;

        if let Some(class_name) = &info.class_name {
            return Err(ConfigError::BridgeFunctionNotTopLevel {
                fq_name: info.fq_name(),
                class_name: class_name.clone(),
            });
        }

        let symbols = program.resolve_top_level_functions(&info.package_name, &info.function_name);
        match symbols.as_slice() {
            [] => {
                return Err(ConfigError::BridgeFunctionNotFound {
                    fq_name: info.fq_name(),
                })
            }
            [single] => {
                map.insert(transformer.clone(), *single);
            }
            many => {
                return Err(ConfigError::AmbiguousBridgeFunction {
                    fq_name: info.fq_name(),
                    count: many.len(),
                })
            }
        }
    }

    Ok(map)
}

/// Resolve the scope marker class consulted by the scope-argument policy
pub fn resolve_scope_class(
    program: &Program,
    name: &QualifiedName,
) -> Result<ClassId, ConfigError> {
    program
        .resolve_class(name)
        .ok_or_else(|| ConfigError::ScopeClassNotFound {
            fq_name: name.to_string(),
        })
}

/// Every distinct marker annotation name the configuration references
///
/// Registered with the host so marker arguments are fully resolved before
/// the declaration query phase runs.
pub fn marker_predicates(config: &TransformConfiguration) -> Vec<QualifiedName> {
    let mut names = Vec::new();
    for (_, transformer) in config.iter() {
        let name = mark_class_name(&transformer.mark_annotation);
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use awaitless_config::ClassInfo;
    use awaitless_hir::AnnotationValue;

    fn mark() -> MarkAnnotation {
        MarkAnnotation::new(ClassInfo::new("awaitless.annotation", "Blocking"), "Blocking")
    }

    fn marker_annotation() -> Annotation {
        Annotation::new(QualifiedName::new("awaitless.annotation", "Blocking"))
    }

    #[test]
    fn test_annotation_data_defaults() {
        let data = TransformAnnotationData::resolve(&marker_annotation(), &mark(), "fetch");
        assert_eq!(data.base_name, None);
        assert_eq!(data.function_name, "fetchBlocking");
        assert!(!data.as_property);
    }

    #[test]
    fn test_annotation_data_explicit_arguments() {
        let annotation = marker_annotation()
            .with_arg("baseName", AnnotationValue::Str("load".to_string()))
            .with_arg("suffix", AnnotationValue::Str("Sync".to_string()))
            .with_arg("asProperty", AnnotationValue::Bool(true));

        let data = TransformAnnotationData::resolve(&annotation, &mark(), "fetch");
        assert_eq!(data.function_name, "loadSync");
        assert!(data.as_property);
    }

    #[test]
    fn test_empty_base_name_falls_back_to_original() {
        let annotation =
            marker_annotation().with_arg("baseName", AnnotationValue::Str(String::new()));
        let data = TransformAnnotationData::resolve(&annotation, &mark(), "fetch");
        assert_eq!(data.function_name, "fetchBlocking");
    }

    #[test]
    fn test_platform_matching_is_exact() {
        assert!(platform_matches(PlatformKind::Jvm, TargetPlatform::Jvm));
        assert!(!platform_matches(PlatformKind::Jvm, TargetPlatform::Js));
        assert!(!platform_matches(PlatformKind::Jvm, TargetPlatform::Common));
        assert!(platform_matches(PlatformKind::Common, TargetPlatform::Common));
    }
}
