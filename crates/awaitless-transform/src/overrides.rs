//! Override detection for synthetic members
//!
//! A synthetic member carries the `override` flag in two situations: a
//! supertype already declares a compatible member with the synthetic name
//! (structural), or the originating declaration overrides a marked supertype
//! declaration whose marker produces the same synthetic shape (propagated).

use awaitless_hir::{ClassId, FunctionId, Modality, Program, TypeId};

use crate::registry::{self, TransformAnnotationData};
use crate::resolver::SyntheticFunData;

/// Whether a supertype declares a non-final member the synthetic one would
/// override
///
/// Signature compatibility is structural: same name, same receiver type,
/// same value-parameter types. Properties compare with an empty value list.
pub fn is_overridable(
    program: &Program,
    name: &str,
    receiver: Option<TypeId>,
    value_types: &[TypeId],
    owner: ClassId,
    is_property: bool,
) -> bool {
    for sup in program.super_classes(owner) {
        if is_property {
            for &prop in &program.class(sup).properties {
                let p = program.property(prop);
                if p.name == name
                    && p.modality != Modality::Final
                    && receivers_match(program, p.receiver, receiver)
                {
                    return true;
                }
            }
        } else {
            for &func in program.declared_functions(sup) {
                let f = program.function(func);
                if f.name == name
                    && f.modality != Modality::Final
                    && receivers_match(program, f.receiver, receiver)
                    && params_match(program, &f.params.iter().map(|p| p.ty).collect::<Vec<_>>(), value_types)
                {
                    return true;
                }
            }
        }
    }
    false
}

/// Whether the originating declaration's own override chain forces the
/// synthetic member to be an override
///
/// This holds when some overridden supertype declaration carries a marker of
/// the same transformer that resolves to the same synthetic name and the
/// same as-property flag. The supertype's own transformation will then have
/// declared the matching synthetic member.
pub fn is_override_from_marker(
    program: &Program,
    fun_data: &SyntheticFunData,
    origin: FunctionId,
) -> bool {
    let origin_fn = program.function(origin);
    if !origin_fn.is_override {
        return false;
    }
    let origin_param_types: Vec<TypeId> = origin_fn.params.iter().map(|p| p.ty).collect();

    for overridden in program.overridden_functions(origin) {
        let over = program.function(overridden);
        if !receivers_match(program, over.receiver, origin_fn.receiver) {
            continue;
        }
        let over_param_types: Vec<TypeId> = over.params.iter().map(|p| p.ty).collect();
        if !params_match(program, &over_param_types, &origin_param_types) {
            continue;
        }

        let owner = match over.owner {
            Some(owner) => owner,
            None => continue,
        };
        let annotation = match registry::find_marker_annotation(
            program,
            overridden,
            owner,
            &fun_data.transformer.mark_annotation,
        ) {
            Some(annotation) => annotation,
            None => continue,
        };

        let over_data = TransformAnnotationData::resolve(
            annotation,
            &fun_data.transformer.mark_annotation,
            &over.name,
        );
        if over_data.function_name == fun_data.fun_name
            && over_data.as_property == fun_data.annotation_data.as_property
        {
            return true;
        }
    }

    false
}

fn receivers_match(program: &Program, a: Option<TypeId>, b: Option<TypeId>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => program.types.type_equal(a, b),
        _ => false,
    }
}

fn params_match(program: &Program, a: &[TypeId], b: &[TypeId]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(&x, &y)| program.types.type_equal(x, y))
}
