//! Infrastructure adapters for pugview.
//!
//! This crate implements the ports defined in `pugview-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod config;
pub mod engine;
pub mod filesystem;

// Re-export commonly used adapters
pub use self::config::{LayeredConfig, MemoryConfig};
pub use engine::MiniJinjaEngine;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
