//! Error taxonomy
//!
//! Two classes of failure with different blast radii: [`ConfigError`] aborts
//! the whole pass (the configuration cannot be trusted), while
//! [`SynthesisError`] is isolated to one declaration, reported as a
//! diagnostic, and never stops sibling declarations from being synthesized.

use thiserror::Error;

/// Fatal configuration errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// A configured bridge function resolved to no top-level symbol
    #[error("Cannot find bridge function symbol for `{fq_name}`")]
    BridgeFunctionNotFound { fq_name: String },

    /// A configured bridge function resolved to more than one symbol
    #[error("Found {count} bridge function symbols for `{fq_name}`, expected exactly one")]
    AmbiguousBridgeFunction { fq_name: String, count: usize },

    /// A bridge descriptor referenced a member function
    #[error("Bridge function `{fq_name}` must be a top-level function, not a member of `{class_name}`")]
    BridgeFunctionNotTopLevel { fq_name: String, class_name: String },

    /// The scope marker class is missing from the program
    #[error("Cannot resolve scope class `{fq_name}`")]
    ScopeClassNotFound { fq_name: String },
}

/// Per-declaration synthesis errors (isolated, skip and continue)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SynthesisError {
    /// The late pass found zero or several origin candidates; usually an
    /// unsupported override shape
    #[error("Expected exactly one origin declaration for `{name}`, found {found}")]
    AmbiguousOrigin { name: String, found: usize },

    /// A property cannot forward required value parameters
    #[error("Cannot generate property `{name}`: the original declaration takes required value parameters")]
    PropertyWithParameters { name: String },
}
