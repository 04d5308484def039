//! pugview core - view rendering for web applications.
//!
//! This crate provides the domain and application layers of the pugview
//! view adapter, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │   web application / pugview-cli         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (ViewRenderer, ViewGenerator)       │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (ConfigSource, TemplateEngine, Filesystem)
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     pugview-adapters (Infrastructure)   │
//! │ (LayeredConfig, MiniJinjaEngine, ...)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pugview_core::prelude::*;
//! # use pugview_adapters::{MemoryConfig, MiniJinjaEngine};
//! # let config: Arc<dyn ConfigSource> = Arc::new(MemoryConfig::new(serde_json::json!({})));
//! # let engine: Box<dyn TemplateEngine> = Box::new(MiniJinjaEngine::new());
//! # fn token() -> String { "tok".into() }
//!
//! // 1. Build the renderer once, at application start
//! let renderer = ViewRenderer::new(config, "/srv/app", engine);
//! renderer.global("siteName", "Acme");
//!
//! // 2. Per request: install request globals, then render
//! renderer.handle(&RequestCapabilities::new().with_csrf_token(|| Some(token())));
//! let html = renderer.render("users/index", None)?;
//! # Ok::<(), PugError>(())
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        MergeOrder, RequestScope, ViewGenerator, ViewRenderer,
        ports::{ConfigSource, Filesystem, TemplateEngine},
    };
    pub use crate::domain::{
        FilterTable, OptionValue, RendererOptions, RequestCapabilities, ViewName,
    };
    pub use crate::error::{PugError, PugResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
