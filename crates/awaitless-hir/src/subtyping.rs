//! Subtyping over the declaration hierarchy
//!
//! Implements the nominal relation T <: U used by the scope-argument policy.
//! Structural identity goes through [`crate::ty::TypeContext::type_equal`];
//! this module only adds the class-hierarchy walk.

use crate::decl::ClassId;
use crate::program::Program;
use crate::ty::{Type, TypeId};

/// Context for checking subtyping relationships
pub struct SubtypingContext<'a> {
    program: &'a Program,
}

impl<'a> SubtypingContext<'a> {
    pub fn new(program: &'a Program) -> Self {
        SubtypingContext { program }
    }

    /// Check if `sub` is a subtype of `sup` (sub <: sup)
    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        let types = &self.program.types;

        // Reflexivity
        if types.type_equal(sub, sup) {
            return true;
        }

        let sub_ty = match types.get(sub) {
            Some(ty) => ty,
            None => return false,
        };
        let sup_ty = match types.get(sup) {
            Some(ty) => ty,
            None => return false,
        };

        match (sub_ty, sup_ty) {
            // Never is a subtype of everything
            (Type::Never, _) => true,

            // A definitely-not-null qualifier only narrows the subject
            (Type::NotNull(inner), _) => self.is_subtype(*inner, sup),

            // An intersection is a subtype if any member is
            (Type::Intersection { members, .. }, _) => {
                members.iter().any(|&m| self.is_subtype(m, sup))
            }

            // A type parameter is a subtype through any of its bounds
            (Type::Param(p), _) => {
                let bounds = types.type_param(*p).bounds.clone();
                bounds.iter().any(|&b| self.is_subtype(b, sup))
            }

            (
                Type::Class {
                    class: sub_class,
                    nullable: sub_nullable,
                    ..
                },
                Type::Class {
                    class: sup_class,
                    nullable: sup_nullable,
                    ..
                },
            ) => {
                // A nullable value never fits a non-null slot
                if *sub_nullable && !*sup_nullable {
                    return false;
                }
                self.is_class_subtype(*sub_class, *sup_class)
            }

            _ => false,
        }
    }

    /// Nominal walk: does `sub` extend or implement `sup`?
    fn is_class_subtype(&self, sub: ClassId, sup: ClassId) -> bool {
        sub == sup || self.program.super_classes(sub).contains(&sup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{Class, Modality, PlatformKind, QualifiedName};

    fn class(program: &mut Program, name: &str, supertypes: Vec<TypeId>) -> ClassId {
        let module = program.add_module("test", PlatformKind::Jvm);
        program.add_class(Class {
            name: QualifiedName::new("test", name),
            module,
            modality: Modality::Open,
            type_params: vec![],
            supertypes,
            functions: vec![],
            properties: vec![],
            member_scope: None,
            annotations: vec![],
        })
    }

    #[test]
    fn test_class_subtype_transitive() {
        let mut program = Program::new();
        let a = class(&mut program, "A", vec![]);
        let a_ty = program.types.class_type(a, vec![], false);
        let b = class(&mut program, "B", vec![a_ty]);
        let b_ty = program.types.class_type(b, vec![], false);
        let c = class(&mut program, "C", vec![b_ty]);
        let c_ty = program.types.class_type(c, vec![], false);

        let ctx = SubtypingContext::new(&program);
        assert!(ctx.is_subtype(c_ty, a_ty));
        assert!(!ctx.is_subtype(a_ty, c_ty));
    }

    #[test]
    fn test_nullable_not_subtype_of_non_null() {
        let mut program = Program::new();
        let a = class(&mut program, "A", vec![]);
        let plain = program.types.class_type(a, vec![], false);
        let nullable = program.types.class_type(a, vec![], true);

        let ctx = SubtypingContext::new(&program);
        assert!(ctx.is_subtype(plain, nullable));
        assert!(!ctx.is_subtype(nullable, plain));
    }
}
