// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside `PugError`)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid view name '{name}': {reason}")]
    InvalidViewName { name: String, reason: String },

    #[error("Invalid file extension '{extension}'")]
    InvalidExtension { extension: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidViewName { name, reason } => vec![
                format!("'{}' cannot be turned into a view path: {}", name, reason),
                "Use dots to nest views, e.g. users.profile".into(),
                "Note that every occurrence of 'view' is removed from the name".into(),
            ],
            Self::InvalidExtension { extension } => vec![
                format!("'{}' is not a usable file extension", extension),
                "Set app.pug.extension to a bare extension such as 'pug'".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidViewName { .. } => ErrorCategory::Validation,
            Self::InvalidExtension { .. } => ErrorCategory::Configuration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    NotFound,
    Internal,
}
