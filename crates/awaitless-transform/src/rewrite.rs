//! Late body rewriting
//!
//! The body phase runs after every declaration of the session is registered.
//! Placeholder bodies are located through their origin metadata, the
//! originating declaration is re-identified by matching source suspend
//! declarations in the owner, and the bridge-call body is installed. An
//! origin that no longer matches exactly one declaration is reported and the
//! member is left alone.

use awaitless_hir::{DeclOrigin, FunctionId, Program, TypeId};

use crate::annotations;
use crate::diagnostics::{codes, Diagnostic};
use crate::error::SynthesisError;
use crate::session::TransformSession;
use crate::synthesize::{self, SyntheticCaller};

/// Fill in every placeholder body left by the declaration phase
pub fn rewrite_bodies(session: &TransformSession, program: &mut Program) {
    let functions: Vec<FunctionId> = program
        .function_ids()
        .filter(|&id| {
            let f = program.function(id);
            matches!(f.origin, DeclOrigin::SyntheticBridge { .. })
                && f.body.as_ref().is_some_and(|b| b.placeholder)
        })
        .collect();

    for id in functions {
        let (origin, tag) = match program.function(id).origin {
            DeclOrigin::SyntheticBridge { origin, tag, .. } => (origin, tag),
            DeclOrigin::Source => continue,
        };
        let owner = program.function(id).owner;

        let origin = match locate_origin(program, owner, origin) {
            Ok(origin) => origin,
            Err(found) => {
                report_ambiguous(session, &program.function(id).name, found);
                continue;
            }
        };

        let transformer = match session.transformer_by_tag(tag) {
            Some(transformer) => transformer.clone(),
            None => continue,
        };

        if let Some(body) = synthesize::build_bridge_body(
            session,
            program,
            SyntheticCaller::Function(id),
            origin,
            &transformer,
        ) {
            program.function_mut(id).body = Some(body);
            annotations::apply_includes_to_original(program, origin, &transformer);
        }
    }

    let properties: Vec<_> = program
        .property_ids()
        .filter(|&id| {
            let p = program.property(id);
            matches!(p.origin, DeclOrigin::SyntheticBridge { .. })
                && p.getter.body.as_ref().is_some_and(|b| b.placeholder)
        })
        .collect();

    for id in properties {
        let (origin, tag) = match program.property(id).origin {
            DeclOrigin::SyntheticBridge { origin, tag, .. } => (origin, tag),
            DeclOrigin::Source => continue,
        };
        let owner = program.property(id).owner;

        let origin = match locate_origin(program, owner, origin) {
            Ok(origin) => origin,
            Err(found) => {
                report_ambiguous(session, &program.property(id).name, found);
                continue;
            }
        };

        let transformer = match session.transformer_by_tag(tag) {
            Some(transformer) => transformer.clone(),
            None => continue,
        };

        if let Some(body) = synthesize::build_bridge_body(
            session,
            program,
            SyntheticCaller::PropertyGetter(id),
            origin,
            &transformer,
        ) {
            program.property_mut(id).getter.body = Some(body);
            annotations::apply_includes_to_original(program, origin, &transformer);
        }
    }
}

/// Re-identify the originating declaration in the body phase
///
/// The origin is matched structurally among the owner's source suspend
/// declarations (same name, receiver, and value-parameter types), not
/// assumed stable by id. Anything but exactly one match is an error carrying
/// the number found.
fn locate_origin(
    program: &Program,
    owner: Option<awaitless_hir::ClassId>,
    recorded: FunctionId,
) -> Result<FunctionId, usize> {
    let owner = match owner {
        Some(owner) => owner,
        None => return Err(0),
    };
    let target = program.function(recorded);
    let target_params: Vec<TypeId> = target.params.iter().map(|p| p.ty).collect();

    let matches: Vec<FunctionId> = program
        .declared_functions(owner)
        .iter()
        .copied()
        .filter(|&id| {
            let f = program.function(id);
            f.origin.is_source()
                && f.is_suspend
                && f.name == target.name
                && f.params.len() == target_params.len()
                && f.params
                    .iter()
                    .zip(&target_params)
                    .all(|(p, &t)| program.types.type_equal(p.ty, t))
                && match (f.receiver, target.receiver) {
                    (None, None) => true,
                    (Some(a), Some(b)) => program.types.type_equal(a, b),
                    _ => false,
                }
        })
        .collect();

    match matches.as_slice() {
        [single] => Ok(*single),
        other => Err(other.len()),
    }
}

fn report_ambiguous(session: &TransformSession, name: &str, found: usize) {
    let error = SynthesisError::AmbiguousOrigin {
        name: name.to_string(),
        found,
    };
    session.report(Diagnostic::warning(error.to_string()).with_code(codes::AMBIGUOUS_ORIGIN));
}
