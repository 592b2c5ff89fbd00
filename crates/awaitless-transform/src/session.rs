//! Per-compilation-session state
//!
//! One [`TransformSession`] lives for one compilation session and is handed
//! to every pass explicitly. The bridge-symbol table and the scope class are
//! resolved lazily on first cache population and read-only afterwards; the
//! synthetic-member cache supports concurrent read/populate with at-most-once
//! computation per key (redundant recomputation is benign, corruption is not).

use std::sync::Arc;

use awaitless_config::{TargetPlatform, TransformConfiguration, Transformer};
use awaitless_hir::{ClassId, FunctionId, Program, QualifiedName};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::diagnostics::Diagnostic;
use crate::error::ConfigError;
use crate::registry;
use crate::resolver::{CacheKey, SyntheticMemberMap};

/// Session-scoped state of the transformer
pub struct TransformSession {
    config: TransformConfiguration,
    scope_class_name: QualifiedName,
    /// Flattened configuration; a transformer's position is the opaque tag
    /// recorded in synthetic declarations' origin metadata
    transformers: Vec<(TargetPlatform, Transformer)>,
    bridge_symbols: OnceCell<FxHashMap<Transformer, FunctionId>>,
    scope_class: OnceCell<ClassId>,
    pub(crate) cache: DashMap<CacheKey, Arc<Option<SyntheticMemberMap>>>,
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl TransformSession {
    /// Create a session for one compilation
    ///
    /// `scope_class_name` names the host's scope marker class consulted by
    /// the scope-argument policy.
    pub fn new(config: TransformConfiguration, scope_class_name: QualifiedName) -> Self {
        let transformers = config
            .iter()
            .map(|(platform, t)| (platform, t.clone()))
            .collect();
        TransformSession {
            config,
            scope_class_name,
            transformers,
            bridge_symbols: OnceCell::new(),
            scope_class: OnceCell::new(),
            cache: DashMap::new(),
            diagnostics: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &TransformConfiguration {
        &self.config
    }

    /// Declare all marker annotation names to the host's resolution system
    ///
    /// Must run once before the query phase, otherwise marker arguments stay
    /// unresolved when the eligibility scan reads them.
    pub fn register_predicates(&self, program: &mut Program) {
        program.register_annotation_predicates(registry::marker_predicates(&self.config));
    }

    /// Resolve the bridge-symbol table and scope class, once
    pub(crate) fn ensure_initialized(&self, program: &Program) -> Result<(), ConfigError> {
        self.bridge_symbols
            .get_or_try_init(|| registry::resolve_bridge_symbols(program, &self.config))?;
        self.scope_class
            .get_or_try_init(|| registry::resolve_scope_class(program, &self.scope_class_name))?;
        Ok(())
    }

    pub(crate) fn bridge_symbol(&self, transformer: &Transformer) -> Option<FunctionId> {
        self.bridge_symbols.get()?.get(transformer).copied()
    }

    pub(crate) fn scope_class(&self) -> Option<ClassId> {
        self.scope_class.get().copied()
    }

    pub(crate) fn transformers(&self) -> impl Iterator<Item = (TargetPlatform, &Transformer)> {
        self.transformers.iter().map(|(p, t)| (*p, t))
    }

    /// Opaque origin tag of a configured transformer, `None` for one from a
    /// different session's configuration
    pub(crate) fn transformer_tag(&self, transformer: &Transformer) -> Option<u32> {
        self.transformers
            .iter()
            .position(|(_, t)| t == transformer)
            .map(|index| index as u32)
    }

    pub(crate) fn transformer_by_tag(&self, tag: u32) -> Option<&Transformer> {
        self.transformers.get(tag as usize).map(|(_, t)| t)
    }

    /// Record a per-declaration diagnostic
    pub fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }

    /// Snapshot of all collected diagnostics
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }
}
