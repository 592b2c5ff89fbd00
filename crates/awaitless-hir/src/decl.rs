//! Declarations: modules, classes, functions, properties, annotations
//!
//! Declarations are arena-allocated in [`crate::program::Program`] and
//! referenced through id newtypes. A declaration's [`DeclOrigin`] records
//! whether it came from source or was synthesized by a transformation pass.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::expr::Body;
use crate::ty::{TypeId, TypeParamId};

macro_rules! decl_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) u32);

        impl $name {
            pub fn new(id: u32) -> Self {
                Self(id)
            }

            pub fn as_u32(&self) -> u32 {
                self.0
            }
        }
    };
}

decl_id!(
    /// Identifier of a module (compilation unit with a platform target)
    ModuleId
);
decl_id!(
    /// Identifier of a class declaration
    ClassId
);
decl_id!(
    /// Identifier of a function declaration
    FunctionId
);
decl_id!(
    /// Identifier of a property declaration
    PropertyId
);
decl_id!(
    /// Identifier of a class member-declaration scope
    ScopeId
);

/// A package-qualified name, e.g. `awaitless.runtime.Scope`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub package: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.package, self.name)
        }
    }
}

/// Platform category a module is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    Jvm,
    Js,
    Wasm,
    Native,
    Common,
}

/// One compilation module
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub platform: PlatformKind,
}

/// Declaration modality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Final,
    Open,
    Abstract,
}

/// A value carried by an annotation argument
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Str(String),
    Bool(bool),
    /// Type-valued argument (`KClass`-like); aliasing these across two
    /// declarations is illegal, so annotation copies must re-synthesize
    /// their argument maps.
    Type(TypeId),
}

/// An annotation attached to a declaration, with named arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub class: QualifiedName,
    pub args: FxHashMap<String, AnnotationValue>,
}

impl Annotation {
    pub fn new(class: QualifiedName) -> Self {
        Self {
            class,
            args: FxHashMap::default(),
        }
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.args.insert(name.into(), value);
        self
    }

    /// Read a string argument by name
    pub fn string_arg(&self, name: &str) -> Option<&str> {
        match self.args.get(name) {
            Some(AnnotationValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Read a boolean argument by name
    pub fn bool_arg(&self, name: &str) -> Option<bool> {
        match self.args.get(name) {
            Some(AnnotationValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Produce an independent copy with a freshly built argument map
    pub fn resynthesize(&self) -> Annotation {
        let mut args = FxHashMap::default();
        for (k, v) in &self.args {
            args.insert(k.clone(), v.clone());
        }
        Annotation {
            class: self.class.clone(),
            args,
        }
    }
}

/// Where a declaration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclOrigin {
    /// Written in source
    Source,
    /// Synthesized bridge sibling of a suspend declaration
    ///
    /// `tag` is an opaque token the synthesizing pass uses to recover its
    /// configuration for the late body pass.
    SyntheticBridge {
        origin: FunctionId,
        tag: u32,
        as_property: bool,
    },
}

impl DeclOrigin {
    pub fn is_source(&self) -> bool {
        matches!(self, DeclOrigin::Source)
    }
}

/// One value parameter of a function
#[derive(Debug, Clone, PartialEq)]
pub struct ValueParam {
    pub name: String,
    pub ty: TypeId,
    pub has_default: bool,
}

impl ValueParam {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: false,
        }
    }
}

/// A function declaration (member or top-level)
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub module: ModuleId,
    /// Containing class, `None` for top-level functions
    pub owner: Option<ClassId>,
    /// Package of a top-level function, used for qualified-name resolution
    pub package: Option<String>,
    pub is_suspend: bool,
    pub modality: Modality,
    pub is_override: bool,
    pub type_params: Vec<TypeParamId>,
    pub params: Vec<ValueParam>,
    /// Extension receiver type, if any
    pub receiver: Option<TypeId>,
    pub return_type: TypeId,
    pub annotations: Vec<Annotation>,
    pub body: Option<Body>,
    pub origin: DeclOrigin,
}

/// A property accessor; only getters exist in this representation
#[derive(Debug, Clone, Default)]
pub struct Accessor {
    pub annotations: Vec<Annotation>,
    pub body: Option<Body>,
}

/// A read-only property declaration
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub module: ModuleId,
    pub owner: Option<ClassId>,
    pub modality: Modality,
    pub is_override: bool,
    pub type_params: Vec<TypeParamId>,
    pub receiver: Option<TypeId>,
    pub return_type: TypeId,
    pub annotations: Vec<Annotation>,
    pub getter: Accessor,
    pub origin: DeclOrigin,
}

/// A class declaration
#[derive(Debug, Clone)]
pub struct Class {
    pub name: QualifiedName,
    pub module: ModuleId,
    pub modality: Modality,
    pub type_params: Vec<TypeParamId>,
    /// Direct supertypes, as class types
    pub supertypes: Vec<TypeId>,
    /// Directly declared member functions, in declaration order
    pub functions: Vec<FunctionId>,
    /// Directly declared member properties, in declaration order
    pub properties: Vec<PropertyId>,
    /// Member-declaration scope; `None` for declarations outside a
    /// resolvable scope (such classes are not transformable)
    pub member_scope: Option<ScopeId>,
    pub annotations: Vec<Annotation>,
}
