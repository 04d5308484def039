//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `pugview-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `ConfigSource`: Configuration lookups
//!   - `TemplateEngine`: Template rendering
//!   - `Filesystem`: File operations (view generation)
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (The framework integration layer calls `ViewRenderer` directly)

pub mod output;

pub use output::{ConfigSource, Filesystem, TemplateEngine};

#[cfg(test)]
pub use output::{MockFilesystem, MockTemplateEngine};
