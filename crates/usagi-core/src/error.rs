//! Error types for the resolution engine.
//!
//! Registration problems are collected as [`RegistryError`] diagnostics and
//! never abort registry construction. Module invocation problems are
//! [`RedirectError`]s, which the resolver recovers from by falling back.

use thiserror::Error;

/// Convenience type alias for redirect results.
pub type RedirectResult = std::result::Result<String, RedirectError>;

// ============================================================================
// Registration Errors
// ============================================================================

/// Problems found while indexing modules into the registry.
///
/// None of these are fatal: the offending key or module is dropped and the
/// error is kept in [`Registry::diagnostics`](crate::Registry::diagnostics).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate trigger '{key}' from module '{module}' (already bound to '{existing}')")]
    DuplicateTrigger {
        key: String,
        module: String,
        existing: String,
    },

    #[error("duplicate slash '{key}' from module '{module}' (already bound to '{existing}')")]
    DuplicateSlash {
        key: String,
        module: String,
        existing: String,
    },

    #[error("malformed module '{module}': {reason}")]
    Malformed { module: String, reason: String },
}

impl RegistryError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateTrigger { .. } => "duplicate_trigger",
            Self::DuplicateSlash { .. } => "duplicate_slash",
            Self::Malformed { .. } => "malformed_module",
        }
    }

    /// Name of the module the diagnostic refers to.
    pub fn module(&self) -> &str {
        match self {
            Self::DuplicateTrigger { module, .. }
            | Self::DuplicateSlash { module, .. }
            | Self::Malformed { module, .. } => module,
        }
    }

    pub(crate) fn malformed(module: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            module: module.to_string(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Redirect Errors
// ============================================================================

/// Errors a module can report from its redirect operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedirectError {
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("module produced an invalid url: {url}")]
    InvalidUrl { url: String },

    #[error("module error: {0}")]
    Module(String),
}

impl RedirectError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingArgument(_) => "missing_argument",
            Self::InvalidUrl { .. } => "invalid_url",
            Self::Module(_) => "module_error",
        }
    }
}

// ============================================================================
// Locale Errors
// ============================================================================

/// A string that is not a usable locale tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid locale tag: '{0}'")]
pub struct LocaleError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_codes() {
        let dup = RegistryError::DuplicateTrigger {
            key: "g".into(),
            module: "second".into(),
            existing: "first".into(),
        };
        assert_eq!(dup.error_code(), "duplicate_trigger");
        assert_eq!(dup.module(), "second");
        assert_eq!(
            RegistryError::malformed("x", "no description").error_code(),
            "malformed_module"
        );
    }

    #[test]
    fn registry_error_display_names_both_modules() {
        let dup = RegistryError::DuplicateSlash {
            key: "w".into(),
            module: "wiki2".into(),
            existing: "wikipedia".into(),
        };
        let text = dup.to_string();
        assert!(text.contains("'w'"));
        assert!(text.contains("wiki2"));
        assert!(text.contains("wikipedia"));
    }

    #[test]
    fn redirect_error_codes() {
        assert_eq!(
            RedirectError::MissingArgument("user").error_code(),
            "missing_argument"
        );
        assert_eq!(
            RedirectError::InvalidUrl { url: "nope".into() }.error_code(),
            "invalid_url"
        );
        assert_eq!(RedirectError::Module("boom".into()).error_code(), "module_error");
    }
}
