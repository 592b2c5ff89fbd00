//! Core type definitions for the awaitless typed representation
//!
//! Types are stored in a [`TypeContext`] arena and referenced through
//! [`TypeId`] handles. Type parameters carry their own identity
//! ([`TypeParamId`]) so that two declarations sharing a structurally equal
//! signature never alias the same parameter.

use std::fmt;

use crate::decl::ClassId;

/// Unique identifier for a type in the type context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Unique identity of one type parameter declaration
///
/// Identity, not name, is what matters: duplicating a signature allocates
/// fresh `TypeParamId`s while keeping the names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeParamId(pub u32);

impl TypeParamId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Primitive types of the host language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Long,
    Double,
    Boolean,
    String,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::Int => write!(f, "Int"),
            PrimitiveType::Long => write!(f, "Long"),
            PrimitiveType::Double => write!(f, "Double"),
            PrimitiveType::Boolean => write!(f, "Boolean"),
            PrimitiveType::String => write!(f, "String"),
        }
    }
}

/// Variance projection of one generic type argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeProjection {
    /// `T`
    Invariant(TypeId),
    /// `out T`
    Out(TypeId),
    /// `in T`
    In(TypeId),
    /// `*`
    Star,
}

impl TypeProjection {
    /// The projected type, if the projection carries one
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            TypeProjection::Invariant(t) | TypeProjection::Out(t) | TypeProjection::In(t) => {
                Some(*t)
            }
            TypeProjection::Star => None,
        }
    }

    /// Rebuild the projection around a different type, preserving variance
    pub fn with_type(&self, ty: TypeId) -> TypeProjection {
        match self {
            TypeProjection::Invariant(_) => TypeProjection::Invariant(ty),
            TypeProjection::Out(_) => TypeProjection::Out(ty),
            TypeProjection::In(_) => TypeProjection::In(ty),
            TypeProjection::Star => TypeProjection::Star,
        }
    }
}

/// The core type representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Primitive type
    Primitive(PrimitiveType),

    /// Nominal class instantiation: `List<out T>`, `Scope?`
    Class {
        class: ClassId,
        args: Vec<TypeProjection>,
        nullable: bool,
    },

    /// Reference to a type parameter by identity
    Param(TypeParamId),

    /// Function/closure type: `suspend () -> T`
    Function {
        params: Vec<TypeId>,
        return_type: TypeId,
        is_suspend: bool,
    },

    /// Intersection type with an optional approximated upper bound
    Intersection {
        members: Vec<TypeId>,
        upper_bound: Option<TypeId>,
    },

    /// Definitely-not-null qualifier: `T & Any`
    NotNull(TypeId),

    /// Flexible (platform) type with lower and upper bounds
    Flexible { lower: TypeId, upper: TypeId },

    /// Dynamic type
    Dynamic,

    /// Captured type with an optional lower bound
    Captured { lower: Option<TypeId> },

    /// The unit type
    Unit,

    /// The bottom type
    Never,

    /// An unresolved or erroneous type, attributed to its declaration
    Error(String),
}

/// Metadata of one type parameter declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    /// Declared name, kept verbatim on duplication
    pub name: String,
    /// Upper bounds; may reference other parameters of the same list
    pub bounds: Vec<TypeId>,
}

/// Arena owning all types and type parameters of one program
#[derive(Debug, Default)]
pub struct TypeContext {
    types: Vec<Type>,
    type_params: Vec<TypeParam>,
}

impl TypeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a type and return its handle
    pub fn alloc(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    /// Look up a type by handle
    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0 as usize)
    }

    /// Allocate a fresh type parameter identity
    ///
    /// Bounds are filled in afterwards via [`TypeContext::set_type_param_bounds`]
    /// because bounds may reference parameters of the same list.
    pub fn fresh_type_param(&mut self, name: impl Into<String>) -> TypeParamId {
        let id = TypeParamId(self.type_params.len() as u32);
        self.type_params.push(TypeParam {
            name: name.into(),
            bounds: Vec::new(),
        });
        id
    }

    pub fn type_param(&self, id: TypeParamId) -> &TypeParam {
        &self.type_params[id.0 as usize]
    }

    pub fn set_type_param_bounds(&mut self, id: TypeParamId, bounds: Vec<TypeId>) {
        self.type_params[id.0 as usize].bounds = bounds;
    }

    // Convenience constructors

    pub fn primitive(&mut self, p: PrimitiveType) -> TypeId {
        self.alloc(Type::Primitive(p))
    }

    pub fn unit(&mut self) -> TypeId {
        self.alloc(Type::Unit)
    }

    pub fn class_type(
        &mut self,
        class: ClassId,
        args: Vec<TypeProjection>,
        nullable: bool,
    ) -> TypeId {
        self.alloc(Type::Class {
            class,
            args,
            nullable,
        })
    }

    pub fn param(&mut self, id: TypeParamId) -> TypeId {
        self.alloc(Type::Param(id))
    }

    pub fn function_type(
        &mut self,
        params: Vec<TypeId>,
        return_type: TypeId,
        is_suspend: bool,
    ) -> TypeId {
        self.alloc(Type::Function {
            params,
            return_type,
            is_suspend,
        })
    }

    pub fn intersection(&mut self, members: Vec<TypeId>, upper_bound: Option<TypeId>) -> TypeId {
        self.alloc(Type::Intersection {
            members,
            upper_bound,
        })
    }

    pub fn not_null(&mut self, inner: TypeId) -> TypeId {
        self.alloc(Type::NotNull(inner))
    }

    pub fn captured(&mut self, lower: Option<TypeId>) -> TypeId {
        self.alloc(Type::Captured { lower })
    }

    pub fn error(&mut self, message: impl Into<String>) -> TypeId {
        self.alloc(Type::Error(message.into()))
    }

    /// Whether a type admits null
    pub fn is_nullable(&self, id: TypeId) -> bool {
        match self.get(id) {
            Some(Type::Class { nullable, .. }) => *nullable,
            Some(Type::Flexible { upper, .. }) => self.is_nullable(*upper),
            _ => false,
        }
    }

    /// Strip the nullability qualifier, if any
    ///
    /// `Scope?` becomes `Scope`; a `NotNull` wrapper is unwrapped. Other
    /// shapes are returned unchanged.
    pub fn definitely_not_null(&mut self, id: TypeId) -> TypeId {
        match self.get(id) {
            Some(Type::Class {
                class,
                args,
                nullable: true,
            }) => {
                let (class, args) = (*class, args.clone());
                self.class_type(class, args, false)
            }
            Some(Type::NotNull(inner)) => *inner,
            _ => id,
        }
    }

    /// Structural type equality
    ///
    /// `TypeId`s are allocation handles, not interned values, so equality
    /// must compare the trees they point at. Type parameters compare by
    /// identity.
    pub fn type_equal(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }

        let (ta, tb) = match (self.get(a), self.get(b)) {
            (Some(ta), Some(tb)) => (ta, tb),
            _ => return false,
        };

        match (ta, tb) {
            (Type::Primitive(p1), Type::Primitive(p2)) => p1 == p2,
            (Type::Param(p1), Type::Param(p2)) => p1 == p2,
            (Type::Unit, Type::Unit) | (Type::Never, Type::Never) | (Type::Dynamic, Type::Dynamic) => {
                true
            }
            (
                Type::Class {
                    class: c1,
                    args: a1,
                    nullable: n1,
                },
                Type::Class {
                    class: c2,
                    args: a2,
                    nullable: n2,
                },
            ) => {
                c1 == c2
                    && n1 == n2
                    && a1.len() == a2.len()
                    && a1.iter().zip(a2).all(|(p1, p2)| match (p1, p2) {
                        (TypeProjection::Star, TypeProjection::Star) => true,
                        (TypeProjection::Invariant(t1), TypeProjection::Invariant(t2))
                        | (TypeProjection::Out(t1), TypeProjection::Out(t2))
                        | (TypeProjection::In(t1), TypeProjection::In(t2)) => {
                            self.type_equal(*t1, *t2)
                        }
                        _ => false,
                    })
            }
            (
                Type::Function {
                    params: p1,
                    return_type: r1,
                    is_suspend: s1,
                },
                Type::Function {
                    params: p2,
                    return_type: r2,
                    is_suspend: s2,
                },
            ) => {
                s1 == s2
                    && p1.len() == p2.len()
                    && p1.iter().zip(p2).all(|(&x, &y)| self.type_equal(x, y))
                    && self.type_equal(*r1, *r2)
            }
            (Type::NotNull(i1), Type::NotNull(i2)) => self.type_equal(*i1, *i2),
            (
                Type::Intersection {
                    members: m1,
                    upper_bound: u1,
                },
                Type::Intersection {
                    members: m2,
                    upper_bound: u2,
                },
            ) => {
                m1.len() == m2.len()
                    && m1.iter().zip(m2).all(|(&x, &y)| self.type_equal(x, y))
                    && match (u1, u2) {
                        (Some(x), Some(y)) => self.type_equal(*x, *y),
                        (None, None) => true,
                        _ => false,
                    }
            }
            _ => false,
        }
    }

    /// Human-readable rendering for diagnostics
    pub fn display(&self, id: TypeId) -> String {
        match self.get(id) {
            None => format!("<invalid {id}>"),
            Some(Type::Primitive(p)) => p.to_string(),
            Some(Type::Param(p)) => self.type_param(*p).name.clone(),
            Some(Type::Class {
                class,
                args,
                nullable,
            }) => {
                let mut s = format!("class#{}", class.as_u32());
                if !args.is_empty() {
                    let rendered: Vec<String> = args
                        .iter()
                        .map(|a| match a {
                            TypeProjection::Invariant(t) => self.display(*t),
                            TypeProjection::Out(t) => format!("out {}", self.display(*t)),
                            TypeProjection::In(t) => format!("in {}", self.display(*t)),
                            TypeProjection::Star => "*".to_string(),
                        })
                        .collect();
                    s.push_str(&format!("<{}>", rendered.join(", ")));
                }
                if *nullable {
                    s.push('?');
                }
                s
            }
            Some(Type::Function {
                params,
                return_type,
                is_suspend,
            }) => {
                let rendered: Vec<String> = params.iter().map(|&p| self.display(p)).collect();
                let prefix = if *is_suspend { "suspend " } else { "" };
                format!(
                    "{}({}) -> {}",
                    prefix,
                    rendered.join(", "),
                    self.display(*return_type)
                )
            }
            Some(Type::Intersection { members, .. }) => members
                .iter()
                .map(|&m| self.display(m))
                .collect::<Vec<_>>()
                .join(" & "),
            Some(Type::NotNull(inner)) => format!("{} & Any", self.display(*inner)),
            Some(Type::Flexible { lower, upper }) => {
                format!("{}..{}", self.display(*lower), self.display(*upper))
            }
            Some(Type::Dynamic) => "dynamic".to_string(),
            Some(Type::Captured { .. }) => "<captured>".to_string(),
            Some(Type::Unit) => "Unit".to_string(),
            Some(Type::Never) => "Nothing".to_string(),
            Some(Type::Error(message)) => format!("<error: {message}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_equal_is_structural() {
        let mut ctx = TypeContext::new();
        let a = ctx.primitive(PrimitiveType::Int);
        let b = ctx.primitive(PrimitiveType::Int);
        assert_ne!(a, b);
        assert!(ctx.type_equal(a, b));
    }

    #[test]
    fn test_type_equal_params_by_identity() {
        let mut ctx = TypeContext::new();
        let t = ctx.fresh_type_param("T");
        let u = ctx.fresh_type_param("T");
        let pt = ctx.param(t);
        let pu = ctx.param(u);
        assert!(!ctx.type_equal(pt, pu));
    }

    #[test]
    fn test_definitely_not_null_strips_nullability() {
        let mut ctx = TypeContext::new();
        let class = ClassId::new(0);
        let nullable = ctx.class_type(class, vec![], true);
        let stripped = ctx.definitely_not_null(nullable);
        assert!(!ctx.is_nullable(stripped));
        let plain = ctx.class_type(class, vec![], false);
        assert!(ctx.type_equal(stripped, plain));
    }
}
