//! Unified error handling for pugview core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for pugview core operations.
#[derive(Debug, Error, Clone)]
pub enum PugError {
    /// Errors from the domain layer (validation).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (engine, filesystem, generator).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl PugError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check config/app.toml and PUGVIEW__* environment variables".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in pugview".into(),
                "Please report this issue at: https://github.com/cosecruz/pugview/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type PugResult<T> = Result<T, PugError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::EngineErrorKind;

    #[test]
    fn missing_template_is_not_found() {
        let err: PugError = ApplicationError::engine(EngineErrorKind::NotFound, "x.pug").into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn engine_message_is_kept_verbatim() {
        let err: PugError =
            ApplicationError::engine(EngineErrorKind::Syntax, "unexpected end of input").into();
        assert!(err.to_string().contains("unexpected end of input"));
    }

    #[test]
    fn invalid_view_name_is_validation() {
        let err: PugError = DomainError::InvalidViewName {
            name: "view".into(),
            reason: "empty".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.suggestions().is_empty());
    }
}
