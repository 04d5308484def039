//! Request hook: turns request capabilities into template globals.
//!
//! | Capability        | Global          | Registered when                 |
//! |-------------------|-----------------|---------------------------------|
//! | flash messages    | `flashMessages` | present                         |
//! | old input lookup  | `old`           | present                         |
//! | nonce source      | `cspNonce`      | present and yields a token      |
//! | CSRF token source | `csrfToken`     | present and yields a token      |
//! | input lookup      | `input`         | present                         |
//! | configuration     | `config`        | always                          |
//!
//! A missing capability leaves the global untouched; it is never cleared.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    application::ports::ConfigSource,
    domain::{OptionValue, RendererOptions, RequestCapabilities, TokenSource, keys},
};

use super::GlobalRegistry;

/// Derives request globals and installs them before the downstream
/// handlers run.
#[derive(Clone)]
pub struct RequestContextAdapter {
    config: Arc<dyn ConfigSource>,
}

impl RequestContextAdapter {
    pub fn new(config: Arc<dyn ConfigSource>) -> Self {
        Self { config }
    }

    /// The globals `capabilities` contribute, in registration order.
    ///
    /// Token sources are invoked exactly once here.
    pub fn request_globals(
        &self,
        capabilities: &RequestCapabilities,
    ) -> Vec<(&'static str, OptionValue)> {
        let mut globals = Vec::with_capacity(6);

        if let Some(values) = capabilities.flash_messages() {
            globals.push((keys::FLASH_MESSAGES, OptionValue::Data(values.clone())));
        }

        if let Some(old) = capabilities.old_input() {
            globals.push((keys::OLD, OptionValue::Accessor(Arc::clone(old))));
        }

        if let Some(nonce) = produce(capabilities.nonce()) {
            globals.push((keys::CSP_NONCE, OptionValue::from(nonce)));
        }

        if let Some(token) = produce(capabilities.csrf_token()) {
            globals.push((keys::CSRF_TOKEN, OptionValue::from(token)));
        }

        if let Some(input) = capabilities.input() {
            globals.push((keys::INPUT, OptionValue::Accessor(Arc::clone(input))));
        }

        let config = Arc::clone(&self.config);
        globals.push((
            keys::CONFIG,
            OptionValue::accessor(move |key, default| {
                config.get_or(key, default.unwrap_or(Value::Null))
            }),
        ));

        globals
    }

    /// Install the request's globals into the shared registry.
    #[instrument(skip_all)]
    pub fn apply(&self, registry: &GlobalRegistry, capabilities: &RequestCapabilities) {
        let globals = self.request_globals(capabilities);
        debug!(
            globals = ?globals.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            "Request globals applied"
        );
        for (name, value) in globals {
            registry.set_global(name, value);
        }
    }

    /// Build a private scope for one request: the registry snapshot with the
    /// request's globals on top. The registry itself is not touched.
    #[instrument(skip_all)]
    pub fn scope(
        &self,
        registry: &GlobalRegistry,
        capabilities: &RequestCapabilities,
    ) -> RequestScope {
        let mut options = registry.snapshot();
        for (name, value) in self.request_globals(capabilities) {
            options.insert(name, value);
        }
        RequestScope { options }
    }
}

/// Per-request globals, isolated from every other request.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    options: RendererOptions,
}

impl RequestScope {
    pub fn new(options: RendererOptions) -> Self {
        Self { options }
    }

    /// Set a global for this request only.
    pub fn set_global(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.options.insert(name, value);
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    pub fn into_options(self) -> RendererOptions {
        self.options
    }
}

/// Call a token source once, keeping only a non-empty token.
fn produce(source: Option<&TokenSource>) -> Option<String> {
    source
        .and_then(|source| source())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::StaticConfig;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn adapter() -> RequestContextAdapter {
        RequestContextAdapter::new(Arc::new(StaticConfig::new(
            json!({"app": {"name": "Acme"}}),
        )))
    }

    #[test]
    fn csrf_only_request_sets_csrf_and_config() {
        let registry = GlobalRegistry::default();
        adapter().apply(
            &registry,
            &RequestCapabilities::new().with_csrf_token(|| Some("tok-1".into())),
        );

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.data("csrfToken"), Some(&json!("tok-1")));
        assert!(snapshot.get("config").is_some());
        for absent in ["flashMessages", "old", "cspNonce", "input"] {
            assert!(snapshot.get(absent).is_none(), "{absent} should not be set");
        }
    }

    #[test]
    fn missing_capabilities_leave_previous_values() {
        let registry = GlobalRegistry::default();
        let adapter = adapter();

        adapter.apply(
            &registry,
            &RequestCapabilities::new()
                .with_flash_messages(json!({"notice": "first request"}))
                .with_nonce(|| Some("n-1".into())),
        );
        adapter.apply(
            &registry,
            &RequestCapabilities::new().with_csrf_token(|| Some("tok-2".into())),
        );

        let snapshot = registry.snapshot();
        assert_eq!(
            snapshot.data("flashMessages"),
            Some(&json!({"notice": "first request"}))
        );
        assert_eq!(snapshot.data("cspNonce"), Some(&json!("n-1")));
        assert_eq!(snapshot.data("csrfToken"), Some(&json!("tok-2")));
    }

    #[test]
    fn empty_tokens_are_not_registered() {
        let registry = GlobalRegistry::default();
        adapter().apply(
            &registry,
            &RequestCapabilities::new()
                .with_nonce(|| Some(String::new()))
                .with_csrf_token(|| None),
        );
        assert!(!registry.contains("cspNonce"));
        assert!(!registry.contains("csrfToken"));
    }

    #[test]
    fn token_sources_are_called_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let caps = RequestCapabilities::new().with_nonce(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some("n".into())
        });

        adapter().apply(&GlobalRegistry::default(), &caps);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn accessors_forward_key_and_default() {
        let registry = GlobalRegistry::default();
        adapter().apply(
            &registry,
            &RequestCapabilities::new()
                .with_old_input(|key, default| {
                    if key == "email" {
                        json!("ada@example.com")
                    } else {
                        default.unwrap_or(Value::Null)
                    }
                })
                .with_input(|key, _| json!(format!("input:{key}"))),
        );

        let old = registry.get("old").unwrap();
        let old = old.as_accessor().unwrap();
        assert_eq!(old("email", None), json!("ada@example.com"));
        assert_eq!(old("name", Some(json!("anon"))), json!("anon"));

        let input = registry.get("input").unwrap();
        assert_eq!(input.as_accessor().unwrap()("q", None), json!("input:q"));
    }

    #[test]
    fn config_global_reads_configuration() {
        let registry = GlobalRegistry::default();
        adapter().apply(&registry, &RequestCapabilities::new());

        let config = registry.get("config").unwrap();
        let config = config.as_accessor().unwrap();
        assert_eq!(config("app.name", None), json!("Acme"));
        assert_eq!(config("app.missing", Some(json!(42))), json!(42));
        assert_eq!(config("app.missing", None), Value::Null);
    }

    #[test]
    fn scope_does_not_touch_the_registry() {
        let registry = GlobalRegistry::new(RendererOptions::new().with("siteName", "Acme"));
        let scope = adapter().scope(
            &registry,
            &RequestCapabilities::new().with_csrf_token(|| Some("scoped".into())),
        );

        assert_eq!(scope.options().data("csrfToken"), Some(&json!("scoped")));
        assert_eq!(scope.options().data("siteName"), Some(&json!("Acme")));
        assert!(!registry.contains("csrfToken"));
    }

    #[test]
    fn scopes_do_not_inherit_each_others_values() {
        let registry = GlobalRegistry::default();
        let adapter = adapter();
        let first = adapter.scope(
            &registry,
            &RequestCapabilities::new().with_flash_messages(json!(["saved"])),
        );
        let second = adapter.scope(&registry, &RequestCapabilities::new());

        assert!(first.options().contains_key("flashMessages"));
        assert!(!second.options().contains_key("flashMessages"));
    }
}
