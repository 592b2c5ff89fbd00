//! Eligibility and shape resolution
//!
//! Scans a declaration container for suspend members matching configured
//! markers and decides which synthetic callables will exist, before any of
//! them is generated. The result is cached per (container, member scope);
//! the host's lazy declaration system depends on this answer being stable.

use std::sync::Arc;

use awaitless_config::Transformer;
use awaitless_hir::{ClassId, FunctionId, Program, ScopeId};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::ConfigError;
use crate::registry::{self, TransformAnnotationData};
use crate::session::TransformSession;

/// The resolved intent to generate one synthetic member
#[derive(Debug, Clone)]
pub struct SyntheticFunData {
    /// Final synthetic member name
    pub fun_name: String,
    pub annotation_data: TransformAnnotationData,
    pub transformer: Transformer,
    /// Resolved bridge-function symbol
    pub bridge_symbol: FunctionId,
}

/// Synthetic name -> originating declaration -> data
///
/// Several originating declarations may map to the same synthetic name
/// (overloads), so the inner map is keyed by origin, never collapsed.
pub type SyntheticMemberMap = FxHashMap<String, FxHashMap<FunctionId, SyntheticFunData>>;

/// Cache key: one container in one member-declaration scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub class: ClassId,
    pub scope: Option<ScopeId>,
}

/// Synthetic members of a container, computed at most once per key
///
/// A `None` payload means the container has no resolvable member scope and
/// is not transformable.
pub fn synthetic_members(
    session: &TransformSession,
    program: &Program,
    class: ClassId,
) -> Result<Arc<Option<SyntheticMemberMap>>, ConfigError> {
    let key = CacheKey {
        class,
        scope: program.class(class).member_scope,
    };

    if let Some(cached) = session.cache.get(&key) {
        return Ok(cached.clone());
    }

    // First population resolves the bridge table. The computation runs under
    // the entry lock so one key is scanned at most once; it never re-enters
    // the cache, so holding the shard lock is safe.
    session.ensure_initialized(program)?;
    let entry = session
        .cache
        .entry(key)
        .or_insert_with(|| Arc::new(compute_synthetic_members(session, program, class, key.scope)));
    Ok(entry.clone())
}

fn compute_synthetic_members(
    session: &TransformSession,
    program: &Program,
    class: ClassId,
    scope: Option<ScopeId>,
) -> Option<SyntheticMemberMap> {
    scope?;

    let platform = program.platform_of(class);
    let mut map: SyntheticMemberMap = FxHashMap::default();

    for &function in program.declared_functions(class) {
        let f = program.function(function);
        if !f.is_suspend || !f.origin.is_source() {
            continue;
        }
        let default_base_name = f.name.clone();

        for (target, transformer) in session.transformers() {
            if !registry::platform_matches(platform, target) {
                continue;
            }

            let annotation = match registry::find_marker_annotation(
                program,
                function,
                class,
                &transformer.mark_annotation,
            ) {
                Some(annotation) => annotation,
                None => continue,
            };

            let annotation_data = TransformAnnotationData::resolve(
                annotation,
                &transformer.mark_annotation,
                &default_base_name,
            );

            // The bridge table is resolved before the cache is filled, so a
            // configured transformer always has a symbol here.
            let bridge_symbol = match session.bridge_symbol(transformer) {
                Some(symbol) => symbol,
                None => continue,
            };

            map.entry(annotation_data.function_name.clone())
                .or_default()
                .insert(
                    function,
                    SyntheticFunData {
                        fun_name: annotation_data.function_name.clone(),
                        annotation_data,
                        transformer: transformer.clone(),
                        bridge_symbol,
                    },
                );
        }
    }

    Some(map)
}

/// The set of synthetic callable names a container will declare
pub fn callable_names(
    session: &TransformSession,
    program: &Program,
    class: ClassId,
) -> Result<FxHashSet<String>, ConfigError> {
    let members = synthetic_members(session, program, class)?;
    let mut names = FxHashSet::default();
    if let Some(map) = members.as_ref() {
        for per_origin in map.values() {
            for data in per_origin.values() {
                names.insert(data.fun_name.clone());
            }
        }
    }
    Ok(names)
}
