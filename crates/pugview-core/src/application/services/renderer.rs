//! View Renderer - the public rendering facade.
//!
//! `ViewRenderer` owns the global registry, runs the request hook and
//! renders views through the [`TemplateEngine`] port:
//!
//! 1. Resolve options from configuration (once, at construction)
//! 2. Per request, install request globals (`handle`) or build a private
//!    scope (`scope`)
//! 3. Render: merge call-site options with the globals and delegate to the
//!    engine

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::ports::{ConfigSource, TemplateEngine},
    domain::{OptionValue, RendererOptions, RequestCapabilities},
    error::PugResult,
};

use super::{
    ConfigResolver, GlobalRegistry, MergeOrder, RequestContextAdapter, RequestScope,
    ResolvedConfig,
};

/// Renders views and literal template sources with the registered globals.
pub struct ViewRenderer {
    registry: GlobalRegistry,
    request: RequestContextAdapter,
    engine: Box<dyn TemplateEngine>,
    views_path: PathBuf,
    extension: String,
    merge_order: MergeOrder,
}

impl ViewRenderer {
    /// Create a renderer for the application rooted at `application_base`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::sync::Arc;
    /// use pugview_core::application::{ViewRenderer, ports::*};
    /// # use pugview_adapters::{MemoryConfig, MiniJinjaEngine};
    /// # let config: Arc<dyn ConfigSource> = Arc::new(MemoryConfig::new(serde_json::json!({})));
    /// # let engine: Box<dyn TemplateEngine> = Box::new(MiniJinjaEngine::new());
    ///
    /// let renderer = ViewRenderer::new(
    ///     config,         // Arc<dyn ConfigSource>
    ///     "/srv/app",     // application base path
    ///     engine,         // Box<dyn TemplateEngine>
    /// );
    /// ```
    pub fn new(
        config: Arc<dyn ConfigSource>,
        application_base: impl AsRef<Path>,
        engine: Box<dyn TemplateEngine>,
    ) -> Self {
        let resolved = ConfigResolver::resolve(config.as_ref(), application_base.as_ref());
        Self::from_resolved(resolved, config, engine)
    }

    /// Create a renderer from an already resolved configuration.
    pub fn from_resolved(
        resolved: ResolvedConfig,
        config: Arc<dyn ConfigSource>,
        engine: Box<dyn TemplateEngine>,
    ) -> Self {
        Self {
            registry: GlobalRegistry::new(resolved.options),
            request: RequestContextAdapter::new(config),
            engine,
            views_path: resolved.views_path,
            extension: resolved.extension,
            merge_order: resolved.merge_order,
        }
    }

    /// Override the configured merge order.
    pub fn with_merge_order(mut self, merge_order: MergeOrder) -> Self {
        self.merge_order = merge_order;
        self
    }

    pub fn merge_order(&self) -> MergeOrder {
        self.merge_order
    }

    pub fn views_path(&self) -> &Path {
        &self.views_path
    }

    pub fn registry(&self) -> &GlobalRegistry {
        &self.registry
    }

    /// Path of the file backing `view`.
    pub fn view_path(&self, view: &str) -> PathBuf {
        self.views_path.join(format!("{view}.{}", self.extension))
    }

    // ── Globals ───────────────────────────────────────────────────────────

    /// Add a global method or variable to every view.
    pub fn global(&self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.registry.set_global(name, value);
    }

    /// Request hook: install the request's globals into the shared registry.
    ///
    /// Call once per request, before the downstream handlers render.
    pub fn handle(&self, capabilities: &RequestCapabilities) {
        self.request.apply(&self.registry, capabilities);
    }

    /// Request-scoped alternative to [`handle`](Self::handle).
    pub fn scope(&self, capabilities: &RequestCapabilities) -> RequestScope {
        self.request.scope(&self.registry, capabilities)
    }

    // ── Rendering ─────────────────────────────────────────────────────────

    /// Render `view` (a name relative to the views directory, without
    /// extension) with the registry globals and optional call-site options.
    #[instrument(skip(self, options), fields(view = %view))]
    pub fn render(&self, view: &str, options: Option<RendererOptions>) -> PugResult<String> {
        let merged = self.merge_options(options, self.registry.snapshot());
        self.render_path(view, &merged)
    }

    /// Alias of [`render`](Self::render).
    pub fn make(&self, view: &str, options: Option<RendererOptions>) -> PugResult<String> {
        self.render(view, options)
    }

    /// Render a literal template source.
    #[instrument(skip_all, fields(len = source.len()))]
    pub fn render_string(
        &self,
        source: &str,
        options: Option<RendererOptions>,
    ) -> PugResult<String> {
        let merged = self.merge_options(options, self.registry.snapshot());
        self.engine
            .render_source(source, &merged)
            .inspect_err(|e| debug!(error = %e, "Rendering source failed"))
    }

    /// Like [`render`](Self::render), with a request scope in place of the
    /// shared registry.
    #[instrument(skip(self, scope, options), fields(view = %view))]
    pub fn render_scoped(
        &self,
        scope: &RequestScope,
        view: &str,
        options: Option<RendererOptions>,
    ) -> PugResult<String> {
        let merged = self.merge_options(options, scope.options().clone());
        self.render_path(view, &merged)
    }

    /// Like [`render_string`](Self::render_string), with a request scope in
    /// place of the shared registry.
    pub fn render_string_scoped(
        &self,
        scope: &RequestScope,
        source: &str,
        options: Option<RendererOptions>,
    ) -> PugResult<String> {
        let merged = self.merge_options(options, scope.options().clone());
        self.engine.render_source(source, &merged)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn render_path(&self, view: &str, options: &RendererOptions) -> PugResult<String> {
        let path = self.view_path(view);
        debug!(path = %path.display(), "Rendering view");
        self.engine
            .render_file(&path, options)
            .inspect_err(|e| debug!(error = %e, path = %path.display(), "Rendering view failed"))
    }

    /// Combine call-site options with `base` according to the merge order.
    /// Without call-site options `base` is used as-is.
    fn merge_options(
        &self,
        options: Option<RendererOptions>,
        base: RendererOptions,
    ) -> RendererOptions {
        match (options, self.merge_order) {
            (None, _) => base,
            (Some(mut call), MergeOrder::RegistryWins) => {
                call.overlay(&base);
                call
            }
            (Some(call), MergeOrder::CallSiteWins) => {
                let mut base = base;
                base.overlay(&call);
                base
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{
        ApplicationError, EngineErrorKind, ports::MockTemplateEngine,
        services::test_support::StaticConfig,
    };
    use crate::error::PugError;
    use serde_json::json;

    /// Engine that echoes the path and a few options it was given.
    fn echo_engine() -> MockTemplateEngine {
        let mut engine = MockTemplateEngine::new();
        engine.expect_render_file().returning(|path, opts| {
            Ok(format!(
                "{} pretty={} title={}",
                path.display(),
                opts.pretty(),
                opts.data("title").cloned().unwrap_or_default()
            ))
        });
        engine.expect_render_source().returning(|source, opts| {
            Ok(format!("{source} pretty={}", opts.pretty()))
        });
        engine
    }

    fn renderer_with(tree: serde_json::Value, engine: MockTemplateEngine) -> ViewRenderer {
        ViewRenderer::new(Arc::new(StaticConfig::new(tree)), "/srv/app", Box::new(engine))
    }

    fn renderer() -> ViewRenderer {
        renderer_with(json!({}), echo_engine())
    }

    #[test]
    fn view_path_appends_extension_under_views_dir() {
        assert_eq!(
            renderer().view_path("users/index"),
            Path::new("/srv/app/resources/views/users/index.pug")
        );
    }

    #[test]
    fn custom_extension_is_used() {
        let r = renderer_with(
            json!({"app": {"pug": {"basedir": "views", "extension": "html"}}}),
            echo_engine(),
        );
        assert_eq!(r.view_path("home"), Path::new("/srv/app/views/home.html"));
    }

    #[test]
    fn empty_and_missing_call_options_render_the_same() {
        let r = renderer();
        r.global("title", "Home");
        let without = r.render("x", None).unwrap();
        let with_empty = r.render("x", Some(RendererOptions::new())).unwrap();
        assert_eq!(without, with_empty);
    }

    #[test]
    fn registry_wins_over_call_site_by_default() {
        let r = renderer();
        r.global("pretty", false);
        let out = r
            .render("x", Some(RendererOptions::new().with("pretty", true)))
            .unwrap();
        assert!(out.contains("pretty=false"), "{out}");
    }

    #[test]
    fn call_site_wins_when_configured() {
        let r = renderer_with(json!({"app": {"pug": {"call_site_wins": true}}}), echo_engine());
        r.global("pretty", false);
        let out = r
            .render("x", Some(RendererOptions::new().with("pretty", true)))
            .unwrap();
        assert!(out.contains("pretty=true"), "{out}");
    }

    #[test]
    fn merge_order_can_be_set_in_code() {
        let r = renderer().with_merge_order(MergeOrder::CallSiteWins);
        assert_eq!(r.merge_order(), MergeOrder::CallSiteWins);
        let out = r
            .render_string("p", Some(RendererOptions::new().with("pretty", true)))
            .unwrap();
        assert_eq!(out, "p pretty=true");
    }

    #[test]
    fn call_site_only_keys_survive_the_merge() {
        let r = renderer();
        let out = r
            .render("x", Some(RendererOptions::new().with("title", "Only here")))
            .unwrap();
        assert!(out.contains("Only here"), "{out}");
    }

    #[test]
    fn handle_makes_request_globals_visible_to_renders() {
        let mut engine = MockTemplateEngine::new();
        engine
            .expect_render_source()
            .withf(|_, opts| opts.data("csrfToken") == Some(&json!("tok")))
            .times(1)
            .returning(|_, _| Ok("ok".into()));
        let r = renderer_with(json!({}), engine);

        r.handle(&RequestCapabilities::new().with_csrf_token(|| Some("tok".into())));
        assert_eq!(r.render_string("x", None).unwrap(), "ok");
    }

    #[test]
    fn scoped_render_uses_scope_not_registry() {
        let mut engine = MockTemplateEngine::new();
        engine
            .expect_render_file()
            .withf(|_, opts| opts.data("csrfToken") == Some(&json!("scoped")))
            .times(1)
            .returning(|_, _| Ok("scoped".into()));
        let r = renderer_with(json!({}), engine);

        let scope = r.scope(&RequestCapabilities::new().with_csrf_token(|| Some("scoped".into())));
        assert_eq!(r.render_scoped(&scope, "x", None).unwrap(), "scoped");
        assert!(!r.registry().contains("csrfToken"));
    }

    #[test]
    fn make_is_an_alias_of_render() {
        let r = renderer();
        assert_eq!(r.make("a", None).unwrap(), r.render("a", None).unwrap());
    }

    #[test]
    fn engine_errors_propagate_unchanged() {
        let mut engine = MockTemplateEngine::new();
        engine.expect_render_file().returning(|_, _| {
            Err(ApplicationError::engine(EngineErrorKind::NotFound, "missing.pug").into())
        });
        let r = renderer_with(json!({}), engine);

        let err = r.render("missing", None).unwrap_err();
        assert!(matches!(
            err,
            PugError::Application(ApplicationError::TemplateEngine {
                kind: EngineErrorKind::NotFound,
                ref message,
            }) if message == "missing.pug"
        ));
    }
}
