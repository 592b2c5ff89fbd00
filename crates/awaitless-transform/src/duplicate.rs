//! Signature duplication
//!
//! A synthetic member coexists with its originating declaration in the same
//! scope, so it cannot share type-parameter identities with it. Duplication
//! allocates fresh identities for every original type parameter and rewrites
//! each occurrence inside value-parameter, receiver, bound, and return types.
//!
//! Substitution is conservative: type shapes it does not understand pass
//! through unchanged rather than failing, since only the generic-function
//! case needs rewriting at all.

use awaitless_hir::{
    FunctionId, Program, Type, TypeContext, TypeId, TypeParamId, TypeProjection, ValueParam,
};

/// One original-to-fresh type-parameter association
///
/// A list of pairs forms the substitution environment for one duplication
/// pass; the environment is consulted before any structural recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopiedTypeParameterPair {
    pub original: TypeParamId,
    pub copied: TypeParamId,
}

/// A structurally independent copy of a declaration signature
#[derive(Debug, Clone)]
pub struct DuplicatedSignature {
    pub type_params: Vec<TypeParamId>,
    pub params: Vec<ValueParam>,
    pub receiver: Option<TypeId>,
    pub return_type: TypeId,
    /// The substitution environment used, for callers that substitute more
    pub pairs: Vec<CopiedTypeParameterPair>,
}

/// Duplicate a function's signature with fresh type-parameter identities
pub fn duplicate_signature(program: &mut Program, function: FunctionId) -> DuplicatedSignature {
    let (orig_type_params, orig_params, orig_receiver, orig_return) = {
        let f = program.function(function);
        (
            f.type_params.clone(),
            f.params.clone(),
            f.receiver,
            f.return_type,
        )
    };

    // Allocate every fresh identity before touching bounds: bounds may
    // reference other parameters of the same list.
    let mut pairs = Vec::with_capacity(orig_type_params.len());
    let mut fresh = Vec::with_capacity(orig_type_params.len());
    for &original in &orig_type_params {
        let name = program.types.type_param(original).name.clone();
        let copied = program.types.fresh_type_param(name);
        pairs.push(CopiedTypeParameterPair { original, copied });
        fresh.push(copied);
    }

    for (i, &original) in orig_type_params.iter().enumerate() {
        let bounds = program.types.type_param(original).bounds.clone();
        let new_bounds = bounds
            .iter()
            .map(|&b| copy_type_with_params(&mut program.types, b, &pairs).unwrap_or(b))
            .collect();
        program.types.set_type_param_bounds(fresh[i], new_bounds);
    }

    let params = orig_params
        .iter()
        .map(|p| ValueParam {
            name: p.name.clone(),
            ty: copy_type_with_params(&mut program.types, p.ty, &pairs).unwrap_or(p.ty),
            has_default: p.has_default,
        })
        .collect();

    let receiver = orig_receiver
        .map(|r| copy_type_with_params(&mut program.types, r, &pairs).unwrap_or(r));

    let return_type =
        copy_type_with_params(&mut program.types, orig_return, &pairs).unwrap_or(orig_return);

    DuplicatedSignature {
        type_params: fresh,
        params,
        receiver,
        return_type,
        pairs,
    }
}

fn find_copied(
    types: &TypeContext,
    ty: TypeId,
    pairs: &[CopiedTypeParameterPair],
) -> Option<TypeParamId> {
    match types.get(ty) {
        Some(Type::Param(p)) => pairs
            .iter()
            .find(|pair| pair.original == *p)
            .map(|pair| pair.copied),
        _ => None,
    }
}

/// Substitute copied type parameters inside a type tree
///
/// Returns `Some(new)` when something was rewritten, `None` when the type
/// contains no copied parameter (the caller keeps the original). Unknown
/// shapes (dynamic, flexible, primitives) always return `None`.
pub fn copy_type_with_params(
    types: &mut TypeContext,
    ty: TypeId,
    pairs: &[CopiedTypeParameterPair],
) -> Option<TypeId> {
    if let Some(copied) = find_copied(types, ty, pairs) {
        return Some(types.param(copied));
    }

    let current = types.get(ty)?.clone();
    match current {
        Type::Class {
            class,
            args,
            nullable,
        } => {
            if args.is_empty() {
                return None;
            }

            let mut any = false;
            let new_args: Vec<TypeProjection> = args
                .iter()
                .map(|projection| match copy_projection(types, projection, pairs) {
                    Some(new) => {
                        any = true;
                        new
                    }
                    None => *projection,
                })
                .collect();

            if any {
                Some(types.class_type(class, new_args, nullable))
            } else {
                None
            }
        }

        Type::NotNull(inner) => {
            let copied = copy_type_with_params(types, inner, pairs)?;
            Some(types.not_null(copied))
        }

        Type::Intersection {
            members,
            upper_bound,
        } => {
            let mut any = false;
            let new_members: Vec<TypeId> = members
                .iter()
                .map(|&m| match copy_type_with_params(types, m, pairs) {
                    Some(new) => {
                        any = true;
                        new
                    }
                    None => m,
                })
                .collect();

            let new_upper = upper_bound.and_then(|u| copy_type_with_params(types, u, pairs));

            if any || new_upper.is_some() {
                Some(types.intersection(new_members, new_upper.or(upper_bound)))
            } else {
                None
            }
        }

        Type::Function {
            params,
            return_type,
            is_suspend,
        } => {
            let mut any = false;
            let new_params: Vec<TypeId> = params
                .iter()
                .map(|&p| match copy_type_with_params(types, p, pairs) {
                    Some(new) => {
                        any = true;
                        new
                    }
                    None => p,
                })
                .collect();
            let new_return = copy_type_with_params(types, return_type, pairs);
            if new_return.is_some() {
                any = true;
            }

            if any {
                Some(types.function_type(
                    new_params,
                    new_return.unwrap_or(return_type),
                    is_suspend,
                ))
            } else {
                None
            }
        }

        // A captured type is only rewritten through its lower bound
        Type::Captured { lower } => {
            let new_lower = copy_type_with_params(types, lower?, pairs)?;
            Some(types.captured(Some(new_lower)))
        }

        // Dynamic, flexible, primitives, unit, never, errors, and parameters
        // outside the environment pass through unchanged.
        _ => None,
    }
}

fn copy_projection(
    types: &mut TypeContext,
    projection: &TypeProjection,
    pairs: &[CopiedTypeParameterPair],
) -> Option<TypeProjection> {
    let inner = projection.type_id()?;
    let copied = copy_type_with_params(types, inner, pairs)?;
    Some(projection.with_type(copied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use awaitless_hir::ClassId;

    #[test]
    fn test_direct_param_substitution() {
        let mut types = TypeContext::new();
        let t = types.fresh_type_param("T");
        let fresh = types.fresh_type_param("T");
        let pairs = [CopiedTypeParameterPair {
            original: t,
            copied: fresh,
        }];

        let pt = types.param(t);
        let result = copy_type_with_params(&mut types, pt, &pairs).unwrap();
        assert_eq!(types.get(result), Some(&Type::Param(fresh)));
    }

    #[test]
    fn test_nested_generic_substitution() {
        let mut types = TypeContext::new();
        let t = types.fresh_type_param("T");
        let fresh = types.fresh_type_param("T");
        let pairs = [CopiedTypeParameterPair {
            original: t,
            copied: fresh,
        }];

        // List<out Map<T>>
        let pt = types.param(t);
        let map = types.class_type(ClassId::new(0), vec![TypeProjection::Invariant(pt)], false);
        let list = types.class_type(ClassId::new(1), vec![TypeProjection::Out(map)], false);

        let result = copy_type_with_params(&mut types, list, &pairs).unwrap();

        // No residual reference to the original parameter anywhere
        fn contains_param(types: &TypeContext, ty: TypeId, target: TypeParamId) -> bool {
            match types.get(ty) {
                Some(Type::Param(p)) => *p == target,
                Some(Type::Class { args, .. }) => args
                    .iter()
                    .filter_map(|a| a.type_id())
                    .any(|a| contains_param(types, a, target)),
                _ => false,
            }
        }
        assert!(!contains_param(&types, result, t));
        assert!(contains_param(&types, result, fresh));
    }

    #[test]
    fn test_unrelated_types_pass_through() {
        let mut types = TypeContext::new();
        let t = types.fresh_type_param("T");
        let fresh = types.fresh_type_param("T");
        let pairs = [CopiedTypeParameterPair {
            original: t,
            copied: fresh,
        }];

        let dynamic = types.alloc(Type::Dynamic);
        assert_eq!(copy_type_with_params(&mut types, dynamic, &pairs), None);

        let other = types.fresh_type_param("U");
        let pu = types.param(other);
        assert_eq!(copy_type_with_params(&mut types, pu, &pairs), None);
    }

    #[test]
    fn test_not_null_unwrap_rewrap() {
        let mut types = TypeContext::new();
        let t = types.fresh_type_param("T");
        let fresh = types.fresh_type_param("T");
        let pairs = [CopiedTypeParameterPair {
            original: t,
            copied: fresh,
        }];

        let pt = types.param(t);
        let wrapped = types.not_null(pt);
        let result = copy_type_with_params(&mut types, wrapped, &pairs).unwrap();
        match types.get(result) {
            Some(Type::NotNull(inner)) => {
                assert_eq!(types.get(*inner), Some(&Type::Param(fresh)));
            }
            other => panic!("Expected NotNull, got {other:?}"),
        }
    }

    #[test]
    fn test_intersection_substitution() {
        let mut types = TypeContext::new();
        let t = types.fresh_type_param("T");
        let fresh = types.fresh_type_param("T");
        let pairs = [CopiedTypeParameterPair {
            original: t,
            copied: fresh,
        }];

        let pt = types.param(t);
        let other = types.class_type(ClassId::new(0), vec![], false);
        let upper = types.param(t);
        let inter = types.intersection(vec![pt, other], Some(upper));

        let result = copy_type_with_params(&mut types, inter, &pairs).unwrap();
        match types.get(result).cloned() {
            Some(Type::Intersection {
                members,
                upper_bound,
            }) => {
                assert_eq!(types.get(members[0]), Some(&Type::Param(fresh)));
                assert!(types.type_equal(members[1], other));
                assert_eq!(
                    types.get(upper_bound.unwrap()),
                    Some(&Type::Param(fresh))
                );
            }
            other => panic!("Expected Intersection, got {other:?}"),
        }
    }
}
