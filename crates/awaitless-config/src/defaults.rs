//! Stock transformer definitions
//!
//! The runtime library ships `runInBlocking`/`runInAsync`/`runInPromise`
//! bridge functions and the matching marker annotations; these constructors
//! mirror that contract so most callers never write configuration by hand.

use crate::transformer::{
    ClassInfo, FunctionInfo, IncludeAnnotation, MarkAnnotation, TargetPlatform,
    TransformConfiguration, Transformer,
};

/// Package holding the stock marker and API-surface annotations
pub const ANNOTATION_PACKAGE: &str = "awaitless.annotation";

/// Package holding the stock bridge functions and wrapper types
pub const RUNTIME_PACKAGE: &str = "awaitless.runtime";

fn api4j_include() -> IncludeAnnotation {
    IncludeAnnotation {
        class_info: ClassInfo::new(ANNOTATION_PACKAGE, "Api4J"),
        repeatable: false,
        include_property: true,
    }
}

fn api4js_include() -> IncludeAnnotation {
    IncludeAnnotation {
        class_info: ClassInfo::new(ANNOTATION_PACKAGE, "Api4Js"),
        repeatable: false,
        include_property: true,
    }
}

fn suspend_only_include() -> IncludeAnnotation {
    IncludeAnnotation {
        class_info: ClassInfo::new(ANNOTATION_PACKAGE, "SuspendOnly"),
        repeatable: false,
        include_property: false,
    }
}

/// `@Blocking suspend fun foo()` -> `fun fooBlocking()` via `runInBlocking`
pub fn jvm_blocking_transformer() -> Transformer {
    let mark = ClassInfo::new(ANNOTATION_PACKAGE, "Blocking");
    Transformer {
        mark_annotation: MarkAnnotation::new(mark.clone(), "Blocking"),
        transform_function_info: FunctionInfo::new(RUNTIME_PACKAGE, "runInBlocking"),
        transform_return_type: None,
        transform_return_type_nullable: false,
        transform_return_type_generic: false,
        copy_annotations_to_synthetic_function: true,
        copy_annotations_to_synthetic_property: false,
        copy_annotation_excludes: vec![mark],
        synthetic_function_include_annotations: vec![api4j_include()],
        origin_function_include_annotations: vec![suspend_only_include()],
    }
}

/// `@Async suspend fun foo(): T` -> `fun fooAsync(): Future<T>` via `runInAsync`
pub fn jvm_async_transformer() -> Transformer {
    let mark = ClassInfo::new(ANNOTATION_PACKAGE, "Async");
    Transformer {
        mark_annotation: MarkAnnotation::new(mark.clone(), "Async"),
        transform_function_info: FunctionInfo::new(RUNTIME_PACKAGE, "runInAsync"),
        transform_return_type: Some(ClassInfo::new(RUNTIME_PACKAGE, "Future")),
        transform_return_type_nullable: false,
        transform_return_type_generic: true,
        copy_annotations_to_synthetic_function: true,
        copy_annotations_to_synthetic_property: false,
        copy_annotation_excludes: vec![mark],
        synthetic_function_include_annotations: vec![api4j_include()],
        origin_function_include_annotations: vec![suspend_only_include()],
    }
}

/// `@Promise suspend fun foo(): T` -> `fun fooAsync(): Promise<T>` via `runInPromise`
pub fn js_promise_transformer() -> Transformer {
    let mark = ClassInfo::new(ANNOTATION_PACKAGE, "Promise");
    Transformer {
        mark_annotation: MarkAnnotation::new(mark.clone(), "Async"),
        transform_function_info: FunctionInfo::new(RUNTIME_PACKAGE, "runInPromise"),
        transform_return_type: Some(ClassInfo::new(RUNTIME_PACKAGE, "Promise")),
        transform_return_type_nullable: false,
        transform_return_type_generic: true,
        copy_annotations_to_synthetic_function: true,
        copy_annotations_to_synthetic_property: false,
        copy_annotation_excludes: vec![mark],
        synthetic_function_include_annotations: vec![api4js_include()],
        origin_function_include_annotations: vec![suspend_only_include()],
    }
}

impl TransformConfiguration {
    /// Configuration with the stock JVM and JS transformers installed
    pub fn with_defaults() -> Self {
        let mut config = Self::new();
        config.add_transformer(TargetPlatform::Jvm, jvm_blocking_transformer());
        config.add_transformer(TargetPlatform::Jvm, jvm_async_transformer());
        config.add_transformer(TargetPlatform::Js, js_promise_transformer());
        config
    }
}
