//! Annotation propagation
//!
//! Synthetic members inherit the originating declaration's annotations minus
//! the configured excludes, plus the configured includes. Copies are always
//! re-synthesized nodes: annotation arguments may hold type references, and
//! sharing those across two declarations is illegal in the host.

use awaitless_config::{IncludeAnnotation, Transformer};
use awaitless_hir::{Annotation, FunctionId, Program, QualifiedName};

/// Annotations prepared for one synthetic member
#[derive(Debug, Default)]
pub struct CopyAnnotations {
    /// For the synthetic function, or the getter of a synthetic property
    pub function_annotations: Vec<Annotation>,
    /// For the synthetic property declaration itself
    pub property_annotations: Vec<Annotation>,
}

fn include_name(include: &IncludeAnnotation) -> QualifiedName {
    QualifiedName::new(
        &include.class_info.package_name,
        &include.class_info.class_name,
    )
}

/// Compute the annotation sets for a synthetic member of `origin`
pub fn copy_annotations(
    program: &Program,
    origin: FunctionId,
    transformer: &Transformer,
) -> CopyAnnotations {
    let excludes: Vec<QualifiedName> = transformer
        .copy_annotation_excludes
        .iter()
        .map(|c| QualifiedName::new(&c.package_name, &c.class_name))
        .collect();

    let copied: Vec<Annotation> = program
        .function(origin)
        .annotations
        .iter()
        .filter(|a| !excludes.contains(&a.class))
        .map(Annotation::resynthesize)
        .collect();

    let mut function_annotations = Vec::new();
    if transformer.copy_annotations_to_synthetic_function {
        function_annotations.extend(copied.iter().cloned());
    }
    for include in &transformer.synthetic_function_include_annotations {
        function_annotations.push(Annotation::new(include_name(include)));
    }

    let mut property_annotations = Vec::new();
    if transformer.copy_annotations_to_synthetic_property {
        property_annotations.extend(copied);
    }
    for include in &transformer.synthetic_function_include_annotations {
        if include.include_property {
            property_annotations.push(Annotation::new(include_name(include)));
        }
    }

    CopyAnnotations {
        function_annotations,
        property_annotations,
    }
}

/// Attach the configured origin-side includes to the originating declaration
///
/// Runs in both the declaration and the body phase, so non-repeatable
/// includes must check for an existing occurrence first.
pub fn apply_includes_to_original(
    program: &mut Program,
    origin: FunctionId,
    transformer: &Transformer,
) {
    for include in &transformer.origin_function_include_annotations {
        let name = include_name(include);
        let already_present = program
            .function(origin)
            .annotations
            .iter()
            .any(|a| a.class == name);
        if already_present && !include.repeatable {
            continue;
        }
        program
            .function_mut(origin)
            .annotations
            .push(Annotation::new(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use awaitless_config::jvm_blocking_transformer;
    use awaitless_hir::{Body, DeclOrigin, Function, Modality, PlatformKind, Program};

    fn sample_program() -> (Program, FunctionId) {
        let mut program = Program::new();
        let module = program.add_module("app", PlatformKind::Jvm);
        let unit = program.types.unit();
        let function = program.add_function(Function {
            name: "fetch".to_string(),
            module,
            owner: None,
            package: Some("app".to_string()),
            is_suspend: true,
            modality: Modality::Final,
            is_override: false,
            type_params: vec![],
            params: vec![],
            receiver: None,
            return_type: unit,
            annotations: vec![
                Annotation::new(QualifiedName::new("awaitless.annotation", "Blocking")),
                Annotation::new(QualifiedName::new("app", "Custom")),
            ],
            body: Some(Body::new(vec![])),
            origin: DeclOrigin::Source,
        });
        (program, function)
    }

    #[test]
    fn test_marker_is_excluded_from_copies() {
        let (program, function) = sample_program();
        let copies = copy_annotations(&program, function, &jvm_blocking_transformer());
        let names: Vec<String> = copies
            .function_annotations
            .iter()
            .map(|a| a.class.to_string())
            .collect();

        assert!(names.contains(&"app.Custom".to_string()));
        assert!(!names.contains(&"awaitless.annotation.Blocking".to_string()));
        // The configured include lands last
        assert!(names.contains(&"awaitless.annotation.Api4J".to_string()));
    }

    #[test]
    fn test_copies_are_independent_nodes() {
        let (program, function) = sample_program();
        let copies = copy_annotations(&program, function, &jvm_blocking_transformer());

        let original = &program.function(function).annotations[1];
        let copied = copies
            .function_annotations
            .iter()
            .find(|a| a.class == original.class)
            .unwrap();
        assert_eq!(copied, original);
        assert!(!std::ptr::eq(copied, original));
    }

    #[test]
    fn test_non_repeatable_origin_include_applied_once() {
        let (mut program, function) = sample_program();
        let transformer = jvm_blocking_transformer();

        apply_includes_to_original(&mut program, function, &transformer);
        apply_includes_to_original(&mut program, function, &transformer);

        let count = program
            .function(function)
            .annotations
            .iter()
            .filter(|a| a.class == QualifiedName::new("awaitless.annotation", "SuspendOnly"))
            .count();
        assert_eq!(count, 1);
    }
}
