//! Synthetic member generation
//!
//! The declaration phase of the transformation: for every resolved
//! [`crate::resolver::SyntheticFunData`] this module declares a synthetic
//! sibling function or read-only property with a duplicated signature, the
//! rewritten return type, propagated annotations, and a placeholder body.
//! Bodies are filled in by [`crate::rewrite`] once symbols are registered.

use awaitless_config::Transformer;
use awaitless_hir::{
    Accessor, Body, Call, ClassId, DeclOrigin, Expr, Function, FunctionId, Modality, Program,
    Property, PropertyId, ReturnTarget, SubtypingContext, TypeId, TypeProjection,
};

use crate::annotations;
use crate::diagnostics::{codes, Diagnostic};
use crate::error::{ConfigError, SynthesisError};
use crate::overrides;
use crate::resolver::{self, SyntheticFunData};
use crate::session::TransformSession;

/// Declare the synthetic functions a container contributes under one name
pub fn generate_functions(
    session: &TransformSession,
    program: &mut Program,
    class: ClassId,
    name: &str,
) -> Result<Vec<FunctionId>, ConfigError> {
    let entries = entries_for(session, program, class, name, false)?;
    let mut generated = Vec::new();

    for (origin, data) in entries {
        let sig = crate::duplicate::duplicate_signature(program, origin);
        let return_type = resolve_return_type(session, program, &data, sig.return_type);

        let param_types: Vec<TypeId> = sig.params.iter().map(|p| p.ty).collect();
        let is_override = overrides::is_overridable(
            program,
            &data.fun_name,
            sig.receiver,
            &param_types,
            class,
            false,
        ) || overrides::is_override_from_marker(program, &data, origin);

        let tag = match session.transformer_tag(&data.transformer) {
            Some(tag) => tag,
            None => continue,
        };

        let copies = annotations::copy_annotations(program, origin, &data.transformer);
        let origin_fn = program.function(origin);
        let modality = synthetic_modality(origin_fn.modality, origin_fn.is_override);
        let module = origin_fn.module;

        let id = program.add_function(Function {
            name: data.fun_name.clone(),
            module,
            owner: Some(class),
            package: None,
            is_suspend: false,
            modality,
            is_override,
            type_params: sig.type_params,
            params: sig.params,
            receiver: sig.receiver,
            return_type,
            annotations: copies.function_annotations,
            body: Some(Body::placeholder()),
            origin: DeclOrigin::SyntheticBridge {
                origin,
                tag,
                as_property: false,
            },
        });
        annotations::apply_includes_to_original(program, origin, &data.transformer);
        generated.push(id);
    }

    Ok(generated)
}

/// Declare the synthetic properties a container contributes under one name
///
/// A marked declaration with required value parameters cannot become a
/// property; it is reported and skipped rather than silently producing an
/// uncallable getter.
pub fn generate_properties(
    session: &TransformSession,
    program: &mut Program,
    class: ClassId,
    name: &str,
) -> Result<Vec<PropertyId>, ConfigError> {
    let entries = entries_for(session, program, class, name, true)?;
    let mut generated = Vec::new();

    for (origin, data) in entries {
        // Defaulted parameters can be elided at the forwarding call site;
        // only required ones make the property impossible.
        if program
            .function(origin)
            .params
            .iter()
            .any(|p| !p.has_default)
        {
            let error = SynthesisError::PropertyWithParameters {
                name: data.fun_name.clone(),
            };
            session.report(
                Diagnostic::warning(error.to_string()).with_code(codes::PROPERTY_WITH_PARAMETERS),
            );
            continue;
        }

        let sig = crate::duplicate::duplicate_signature(program, origin);
        let return_type = resolve_return_type(session, program, &data, sig.return_type);

        let is_override = overrides::is_overridable(
            program,
            &data.fun_name,
            sig.receiver,
            &[],
            class,
            true,
        ) || overrides::is_override_from_marker(program, &data, origin);

        let tag = match session.transformer_tag(&data.transformer) {
            Some(tag) => tag,
            None => continue,
        };

        let copies = annotations::copy_annotations(program, origin, &data.transformer);
        let origin_fn = program.function(origin);
        let modality = synthetic_modality(origin_fn.modality, origin_fn.is_override);
        let module = origin_fn.module;

        let id = program.add_property(Property {
            name: data.fun_name.clone(),
            module,
            owner: Some(class),
            modality,
            is_override,
            type_params: sig.type_params,
            receiver: sig.receiver,
            return_type,
            annotations: copies.property_annotations,
            getter: Accessor {
                annotations: copies.function_annotations,
                body: Some(Body::placeholder()),
            },
            origin: DeclOrigin::SyntheticBridge {
                origin,
                tag,
                as_property: true,
            },
        });
        annotations::apply_includes_to_original(program, origin, &data.transformer);
        generated.push(id);
    }

    Ok(generated)
}

/// Resolved entries under one synthetic name, in stable origin order
fn entries_for(
    session: &TransformSession,
    program: &Program,
    class: ClassId,
    name: &str,
    as_property: bool,
) -> Result<Vec<(FunctionId, SyntheticFunData)>, ConfigError> {
    let members = resolver::synthetic_members(session, program, class)?;
    let mut entries: Vec<(FunctionId, SyntheticFunData)> = match members.as_ref() {
        Some(map) => map
            .get(name)
            .into_iter()
            .flatten()
            .filter(|(_, data)| data.annotation_data.as_property == as_property)
            .map(|(&origin, data)| (origin, data.clone()))
            .collect(),
        None => Vec::new(),
    };
    entries.sort_by_key(|(origin, _)| origin.as_u32());
    Ok(entries)
}

/// A synthetic member is never final when its origin could be refined
///
/// An overriding or abstract origin sits in a refinable hierarchy, so the
/// synthetic sibling opens up regardless of the origin's own final flag.
fn synthetic_modality(origin: Modality, origin_is_override: bool) -> Modality {
    if origin_is_override || origin == Modality::Abstract {
        Modality::Open
    } else {
        origin
    }
}

/// Rewrite the return type through the configured wrapper, if any
///
/// An unresolvable wrapper class degrades to an error type attributed to the
/// synthetic member instead of aborting the whole compilation.
fn resolve_return_type(
    session: &TransformSession,
    program: &mut Program,
    data: &SyntheticFunData,
    original_return: TypeId,
) -> TypeId {
    let wrapper = match &data.transformer.transform_return_type {
        Some(wrapper) => wrapper,
        None => return original_return,
    };

    let name = awaitless_hir::QualifiedName::new(&wrapper.package_name, &wrapper.class_name);
    let class = match program.resolve_class(&name) {
        Some(class) => class,
        None => {
            session.report(
                Diagnostic::warning(format!(
                    "Unable to resolve return wrapper type '{name}' for '{}'",
                    data.fun_name
                ))
                .with_code(codes::UNRESOLVED_WRAPPER),
            );
            return program.types.error(format!("unresolved wrapper {name}"));
        }
    };

    let args = if data.transformer.transform_return_type_generic {
        vec![TypeProjection::Out(original_return)]
    } else {
        vec![]
    };
    program
        .types
        .class_type(class, args, data.transformer.transform_return_type_nullable)
}

/// The declaration a late-rewritten body belongs to
#[derive(Debug, Clone, Copy)]
pub enum SyntheticCaller {
    Function(FunctionId),
    PropertyGetter(PropertyId),
}

/// Build the bridge body: `return bridge({ origin(...) }, scope?)`
pub fn build_bridge_body(
    session: &TransformSession,
    program: &mut Program,
    caller: SyntheticCaller,
    origin: FunctionId,
    transformer: &Transformer,
) -> Option<Body> {
    let bridge = session.bridge_symbol(transformer)?;

    let (params, receiver, return_type, owner, return_target) = match caller {
        SyntheticCaller::Function(id) => {
            let f = program.function(id);
            (
                f.params.clone(),
                f.receiver,
                f.return_type,
                f.owner,
                ReturnTarget::Function(id),
            )
        }
        SyntheticCaller::PropertyGetter(id) => {
            let p = program.property(id);
            (
                Vec::new(),
                p.receiver,
                p.return_type,
                p.owner,
                ReturnTarget::Accessor(id),
            )
        }
    };

    let this_ty = owner.map(|owner| owner_this_type(program, owner));
    let origin_return = program.function(origin).return_type;

    // Inner suspend closure forwarding `this` and every parameter verbatim
    let inner_call = Call {
        callee: origin,
        dispatch_receiver: this_ty.map(|ty| Expr::This { ty }),
        extension_receiver: receiver.map(|ty| Expr::This { ty }),
        args: params
            .iter()
            .enumerate()
            .map(|(index, p)| Expr::ParamRef { index, ty: p.ty })
            .collect(),
        ty: origin_return,
    };
    let lambda = awaitless_hir::Lambda {
        is_suspend: true,
        return_type: origin_return,
        body: Body::new(vec![Expr::Return {
            target: ReturnTarget::Lambda,
            value: Box::new(Expr::Call(Box::new(inner_call))),
        }]),
    };

    let mut args = vec![Expr::Lambda(Box::new(lambda))];
    if let Some(this_ty) = this_ty {
        if let Some(scope_arg) = resolve_scope_argument(session, program, bridge, this_ty) {
            args.push(scope_arg);
        }
    }

    let outer_call = Call {
        callee: bridge,
        dispatch_receiver: None,
        extension_receiver: None,
        args,
        ty: return_type,
    };

    Some(Body::new(vec![Expr::Return {
        target: return_target,
        value: Box::new(Expr::Call(Box::new(outer_call))),
    }]))
}

/// The type of `this` inside a class, with its own parameters as arguments
fn owner_this_type(program: &mut Program, class: ClassId) -> TypeId {
    let type_params = program.class(class).type_params.clone();
    let args = type_params
        .into_iter()
        .map(|p| {
            let ty = program.types.param(p);
            TypeProjection::Invariant(ty)
        })
        .collect();
    program.types.class_type(class, args, false)
}

/// Decide what to pass for the bridge's optional scope parameter
///
/// If the bridge's second parameter accepts the session's scope class:
/// forward `this` when the enclosing class is itself a scope, safe-cast it
/// when the parameter admits null, and omit the argument otherwise.
fn resolve_scope_argument(
    session: &TransformSession,
    program: &mut Program,
    bridge: FunctionId,
    this_ty: TypeId,
) -> Option<Expr> {
    let scope_class = session.scope_class()?;
    let param_ty = program.function(bridge).params.get(1)?.ty;

    let stripped = program.types.definitely_not_null(param_ty);
    let scope_ty = program.types.class_type(scope_class, vec![], false);

    let subtyping = SubtypingContext::new(program);
    if !subtyping.is_subtype(stripped, scope_ty) {
        return None;
    }

    if subtyping.is_subtype(this_ty, stripped) {
        return Some(Expr::This { ty: this_ty });
    }

    if program.types.is_nullable(param_ty) {
        return Some(Expr::SafeCast {
            value: Box::new(Expr::This { ty: this_ty }),
            target: stripped,
        });
    }

    None
}
