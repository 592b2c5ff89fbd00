//! Diagnostic collection
//!
//! Per-declaration failures surface as collected diagnostics rather than
//! errors, so one bad declaration never aborts its siblings. The host decides
//! how to render them.

use std::fmt;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

/// A diagnostic message with an optional stable code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable code (e.g. "E4201") for tooling
    pub code: Option<&'static str>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            code: None,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        };
        match self.code {
            Some(code) => write!(f, "{severity}[{code}]: {}", self.message),
            None => write!(f, "{severity}: {}", self.message),
        }
    }
}

/// Stable diagnostic codes
pub mod codes {
    /// Late pass: zero or several origin candidates for a synthetic member
    pub const AMBIGUOUS_ORIGIN: &str = "E4201";
    /// Wrapper class configured for a return type could not be resolved
    pub const UNRESOLVED_WRAPPER: &str = "E4202";
    /// As-property marker on a declaration with required value parameters
    pub const PROPERTY_WITH_PARAMETERS: &str = "E4203";
}
