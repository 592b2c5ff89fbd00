//! awaitless transformer core
//!
//! Synthesizes non-suspending bridge siblings for marked suspend
//! declarations: a `@Blocking suspend fun fetch()` gains a `fun
//! fetchBlocking()` whose body wraps the original call in a configured
//! top-level bridge function, optionally rewriting the return type through a
//! wrapper such as `Future<T>`.
//!
//! The pass runs in two phases mirroring the host's declaration lifecycle:
//! a declaration phase answering "which synthetic members exist" per
//! container ([`resolver`], [`synthesize`]) and a late body phase installing
//! the bridge-call bodies once every symbol is registered ([`rewrite`]).
//! Hosts with a lazy declaration system drive the phases themselves;
//! [`run_transformation`] drives both for whole-program callers.

pub mod annotations;
pub mod diagnostics;
pub mod duplicate;
pub mod error;
pub mod overrides;
pub mod registry;
pub mod resolver;
pub mod rewrite;
pub mod session;
pub mod synthesize;

pub use diagnostics::{Diagnostic, Severity};
pub use error::{ConfigError, SynthesisError};
pub use resolver::{SyntheticFunData, SyntheticMemberMap};
pub use session::TransformSession;

use awaitless_hir::{ClassId, Program};

/// Run both phases over a whole program
///
/// Declares every synthetic member of every class, then installs all bodies.
/// Per-declaration failures land in the session's diagnostics; only
/// configuration failures abort.
pub fn run_transformation(
    session: &TransformSession,
    program: &mut Program,
) -> Result<(), ConfigError> {
    session.register_predicates(program);

    let classes: Vec<ClassId> = program.class_ids().collect();
    for class in classes {
        let mut names: Vec<String> = resolver::callable_names(session, program, class)?
            .into_iter()
            .collect();
        names.sort();

        for name in names {
            synthesize::generate_functions(session, program, class, &name)?;
            synthesize::generate_properties(session, program, class, &name)?;
        }
    }

    rewrite::rewrite_bodies(session, program);
    Ok(())
}
