// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for pugview.
//!
//! This module contains pure logic with no I/O: option values, request
//! capabilities and view naming. Configuration, rendering and filesystem
//! concerns are reached through ports defined in the application layer.
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no filesystem, network, or engine calls
//! - **Few external crates**: std, `serde_json` for values, `thiserror`
//
// Public API - what the world sees
pub mod capabilities;
pub mod error;
pub mod options;
pub mod view;

// Re-exports for convenience
pub use capabilities::RequestCapabilities;
pub use error::{DomainError, ErrorCategory};
pub use options::{
    Accessor, Filter, FilterTable, OptionValue, RendererOptions, TokenSource, is_truthy, keys,
};
pub use view::{DEFAULT_EXTENSION, VIEWS_DIR, ViewBlueprint, ViewName, normalise_extension};
