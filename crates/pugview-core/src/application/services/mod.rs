//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! adapter's use cases: resolve options, keep template globals, apply the
//! per-request hook, render views and generate new view files.

pub mod config_resolver;
pub mod global_registry;
pub mod renderer;
pub mod request_context;
pub mod view_generator;

pub use config_resolver::{ConfigResolver, ConfigWarning, MergeOrder, ResolvedConfig, config_keys};
pub use global_registry::GlobalRegistry;
pub use renderer::ViewRenderer;
pub use request_context::{RequestContextAdapter, RequestScope};
pub use view_generator::{PROJECT_SENTINEL, ViewGenerator};
