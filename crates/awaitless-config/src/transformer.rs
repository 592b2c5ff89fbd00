//! Configuration records
//!
//! All records are plain values with structural identity; [`Transformer`] is
//! used as a map key by the core. Annotation-argument names are part of the
//! configuration (not hard-coded) so callers can reuse third-party marker
//! annotations with differently named properties.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Platform category a transformer is configured for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TargetPlatform {
    Jvm,
    Js,
    Wasm,
    Native,
    Common,
}

/// A package-qualified class name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassInfo {
    pub package_name: String,
    pub class_name: String,
}

impl ClassInfo {
    pub fn new(package_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            class_name: class_name.into(),
        }
    }

    pub fn fq_name(&self) -> String {
        format!("{}.{}", self.package_name, self.class_name)
    }
}

/// A package-qualified function name
///
/// `class_name` exists only to reject misconfiguration: bridge functions
/// must be top-level, so a populated `class_name` is a fatal error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub package_name: String,
    pub function_name: String,
    #[serde(default)]
    pub class_name: Option<String>,
}

impl FunctionInfo {
    pub fn new(package_name: impl Into<String>, function_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            function_name: function_name.into(),
            class_name: None,
        }
    }

    pub fn fq_name(&self) -> String {
        format!("{}.{}", self.package_name, self.function_name)
    }
}

/// A marker annotation and how to read its arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkAnnotation {
    pub class_info: ClassInfo,
    /// Argument holding the synthetic base name
    pub base_name_property: String,
    /// Argument holding the synthetic name suffix
    pub suffix_property: String,
    /// Argument holding the as-property flag
    pub as_property_property: String,
    /// Suffix applied when the annotation does not set one
    pub default_suffix: String,
    /// As-property flag applied when the annotation does not set one
    pub default_as_property: bool,
}

impl MarkAnnotation {
    /// Marker with the standard argument names `baseName`/`suffix`/`asProperty`
    pub fn new(class_info: ClassInfo, default_suffix: impl Into<String>) -> Self {
        Self {
            class_info,
            base_name_property: "baseName".to_string(),
            suffix_property: "suffix".to_string(),
            as_property_property: "asProperty".to_string(),
            default_suffix: default_suffix.into(),
            default_as_property: false,
        }
    }
}

/// An annotation the transformer attaches unconditionally
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IncludeAnnotation {
    pub class_info: ClassInfo,
    /// Non-repeatable includes are skipped when already present
    #[serde(default)]
    pub repeatable: bool,
    /// Whether the include also applies to synthesized properties
    #[serde(default)]
    pub include_property: bool,
}

impl IncludeAnnotation {
    pub fn new(class_info: ClassInfo) -> Self {
        Self {
            class_info,
            repeatable: false,
            include_property: false,
        }
    }
}

/// One marker-to-bridge pairing with its annotation policy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transformer {
    pub mark_annotation: MarkAnnotation,
    /// Top-level bridge function taking a suspend closure first and an
    /// optional scope second
    pub transform_function_info: FunctionInfo,
    /// Wrapper class for the synthetic return type; `None` keeps the
    /// original return type
    pub transform_return_type: Option<ClassInfo>,
    /// Whether the wrapper type is nullable
    #[serde(default)]
    pub transform_return_type_nullable: bool,
    /// Whether the wrapper is parameterized by the original return type
    /// (`Future<T>` vs a fixed type)
    #[serde(default)]
    pub transform_return_type_generic: bool,
    pub copy_annotations_to_synthetic_function: bool,
    #[serde(default)]
    pub copy_annotations_to_synthetic_property: bool,
    pub copy_annotation_excludes: Vec<ClassInfo>,
    pub synthetic_function_include_annotations: Vec<IncludeAnnotation>,
    pub origin_function_include_annotations: Vec<IncludeAnnotation>,
}

/// Failure to parse a configuration document
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Invalid transform configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// The full per-platform transformer table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformConfiguration {
    /// Ordered transformer lists per platform
    pub transformers: BTreeMap<TargetPlatform, Vec<Transformer>>,
}

impl TransformConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transformer(&mut self, platform: TargetPlatform, transformer: Transformer) {
        self.transformers.entry(platform).or_default().push(transformer);
    }

    /// All (platform, transformer) pairs in stable order
    pub fn iter(&self) -> impl Iterator<Item = (TargetPlatform, &Transformer)> {
        self.transformers
            .iter()
            .flat_map(|(platform, list)| list.iter().map(move |t| (*platform, t)))
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.values().all(|list| list.is_empty())
    }

    /// Parse the JSON document produced by the build-integration layer
    pub fn from_json(text: &str) -> Result<Self, ConfigLoadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("configuration is always serializable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::jvm_blocking_transformer;

    #[test]
    fn test_json_load_preserves_transformers() {
        let mut config = TransformConfiguration::new();
        config.add_transformer(TargetPlatform::Jvm, jvm_blocking_transformer());

        let loaded = TransformConfiguration::from_json(&config.to_json()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_transformer_is_usable_as_map_key() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(jvm_blocking_transformer(), 1u32);
        assert_eq!(map.get(&jvm_blocking_transformer()), Some(&1));
    }
}
