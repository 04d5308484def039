//! Application layer for pugview.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ViewRenderer, ViewGenerator)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer; option and naming
//! rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ConfigResolver, ConfigWarning, GlobalRegistry, MergeOrder, PROJECT_SENTINEL,
    RequestContextAdapter, RequestScope, ResolvedConfig, ViewGenerator, ViewRenderer,
};

// Re-export port traits (for adapter implementation)
pub use ports::{ConfigSource, Filesystem, TemplateEngine};

pub use error::{ApplicationError, EngineErrorKind};
