//! awaitless configuration
//!
//! The declarative configuration consumed by the transformer core: which
//! marker annotations map to which bridge functions, per target platform,
//! plus annotation copy/include/exclude policy. Loaded and validated by the
//! build-integration layer, then handed to the core as an immutable value.

mod defaults;
mod transformer;

pub use defaults::{
    js_promise_transformer, jvm_async_transformer, jvm_blocking_transformer, ANNOTATION_PACKAGE,
    RUNTIME_PACKAGE,
};
pub use transformer::{
    ClassInfo, ConfigLoadError, FunctionInfo, IncludeAnnotation, MarkAnnotation, TargetPlatform,
    TransformConfiguration, Transformer,
};
