//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the ports the
//! application drives. Pure validation errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// What kind of failure the template engine reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    /// The template (or something it includes) does not exist.
    NotFound,
    /// The template source could not be compiled.
    Syntax,
    /// Anything else raised while rendering.
    Render,
}

impl std::fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "template not found"),
            Self::Syntax => write!(f, "syntax error"),
            Self::Render => write!(f, "render error"),
        }
    }
}

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The template engine failed; `message` is the engine's own text.
    #[error("Template engine {kind}: {message}")]
    TemplateEngine {
        kind: EngineErrorKind,
        message: String,
    },

    /// A generator was run outside a project root.
    #[error("Make sure you are inside a project root to run {command} (missing '{sentinel}')")]
    NotInProjectRoot {
        command: &'static str,
        sentinel: String,
    },

    /// The view file to generate already exists.
    #[error("View already exists at {path}")]
    ViewExists { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Shorthand for engine adapters.
    pub fn engine(kind: EngineErrorKind, message: impl Into<String>) -> Self {
        Self::TemplateEngine {
            kind,
            message: message.into(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateEngine {
                kind: EngineErrorKind::NotFound,
                ..
            } => vec![
                "Check the view name and the configured app.pug.basedir".into(),
                "View names are resolved relative to the views directory".into(),
            ],
            Self::TemplateEngine { .. } => vec!["Fix the template source and try again".into()],
            Self::NotInProjectRoot { sentinel, .. } => vec![
                format!("No '{}' file found in the current directory", sentinel),
                "Change into the application's root directory and try again".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::ViewExists { path } => vec![
                format!("File already exists: {}", path.display()),
                "Use --force to overwrite (destructive)".into(),
                "Choose a different view name".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateEngine {
                kind: EngineErrorKind::NotFound,
                ..
            } => ErrorCategory::NotFound,
            Self::TemplateEngine { .. } => ErrorCategory::Validation,
            Self::NotInProjectRoot { .. } => ErrorCategory::Validation,
            Self::ViewExists { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } => ErrorCategory::Internal,
        }
    }
}
