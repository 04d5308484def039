//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `pugview-adapters` crate provides implementations.

use std::path::Path;

use serde_json::Value;

use crate::domain::{FilterTable, RendererOptions};
use crate::error::PugResult;

/// Port for configuration lookups.
///
/// Implemented by:
/// - `pugview_adapters::config::LayeredConfig` (file + environment)
/// - `pugview_adapters::config::MemoryConfig` (testing, embedding)
///
/// Keys are dotted paths such as `app.pug.basedir`.
pub trait ConfigSource: Send + Sync {
    /// Look up a value. `None` when the key is not set.
    fn get(&self, key: &str) -> Option<Value>;

    /// Look up a value, falling back to `default` when the key is not set.
    fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Filters registered under `key`.
    ///
    /// Filters are code rather than data, so sources that support them
    /// register them programmatically. The default has none.
    fn get_filters(&self, key: &str) -> Option<FilterTable> {
        let _ = key;
        None
    }
}

/// Port for the template engine.
///
/// Implemented by:
/// - `pugview_adapters::engine::MiniJinjaEngine`
///
/// Both operations receive the fully merged option map; engine errors are
/// reported as `ApplicationError::TemplateEngine` with the engine's message.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateEngine: Send + Sync {
    /// Render the template file at `path`.
    fn render_file(&self, path: &Path, options: &RendererOptions) -> PugResult<String>;

    /// Render a literal template source.
    fn render_source(&self, source: &str, options: &RendererOptions) -> PugResult<String>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `pugview_adapters::filesystem::LocalFilesystem` (production)
/// - `pugview_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> PugResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> PugResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> PugResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}
