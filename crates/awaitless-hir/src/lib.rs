//! awaitless typed representation
//!
//! The declaration, type, and expression substrate the awaitless transformer
//! operates on: id-keyed arenas for modules, classes, functions, and
//! properties, a type context with identity-carrying type parameters, and a
//! small expression tree for synthesized bodies.

pub mod decl;
pub mod expr;
pub mod program;
pub mod subtyping;
pub mod ty;

pub use decl::{
    Accessor, Annotation, AnnotationValue, Class, ClassId, DeclOrigin, Function, FunctionId,
    Modality, Module, ModuleId, PlatformKind, Property, PropertyId, QualifiedName, ScopeId,
    ValueParam,
};
pub use expr::{Body, Call, Expr, Lambda, ReturnTarget};
pub use program::Program;
pub use subtyping::SubtypingContext;
pub use ty::{PrimitiveType, Type, TypeContext, TypeId, TypeParam, TypeParamId, TypeProjection};
