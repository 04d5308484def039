//! Request capabilities.
//!
//! The framework integration layer describes what an inbound request can
//! offer to templates by filling a [`RequestCapabilities`] record. Every
//! field is optional; a missing field means the request cannot provide that
//! value and the matching template global is simply not registered.

use std::{fmt, sync::Arc};

use serde_json::Value;

use super::options::{Accessor, TokenSource};

/// Typed description of the optional, request-derived values that can be
/// exposed to templates.
#[derive(Clone, Default)]
pub struct RequestCapabilities {
    flash_messages: Option<Value>,
    old_input: Option<Accessor>,
    nonce: Option<TokenSource>,
    csrf_token: Option<TokenSource>,
    input: Option<Accessor>,
}

impl RequestCapabilities {
    /// A request with no capabilities at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flash messages carried over from the previous request.
    pub fn with_flash_messages(mut self, values: Value) -> Self {
        self.flash_messages = Some(values);
        self
    }

    /// Lookup of input submitted with the previous request.
    pub fn with_old_input<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str, Option<Value>) -> Value + Send + Sync + 'static,
    {
        self.old_input = Some(Arc::new(lookup));
        self
    }

    /// Content-Security-Policy nonce producer.
    pub fn with_nonce<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.nonce = Some(Arc::new(source));
        self
    }

    /// CSRF token producer.
    pub fn with_csrf_token<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.csrf_token = Some(Arc::new(source));
        self
    }

    /// Lookup of the current request's input.
    pub fn with_input<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str, Option<Value>) -> Value + Send + Sync + 'static,
    {
        self.input = Some(Arc::new(lookup));
        self
    }

    pub fn flash_messages(&self) -> Option<&Value> {
        self.flash_messages.as_ref()
    }

    pub fn old_input(&self) -> Option<&Accessor> {
        self.old_input.as_ref()
    }

    pub fn nonce(&self) -> Option<&TokenSource> {
        self.nonce.as_ref()
    }

    pub fn csrf_token(&self) -> Option<&TokenSource> {
        self.csrf_token.as_ref()
    }

    pub fn input(&self) -> Option<&Accessor> {
        self.input.as_ref()
    }
}

impl fmt::Debug for RequestCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestCapabilities")
            .field("flash_messages", &self.flash_messages)
            .field("old_input", &self.old_input.is_some())
            .field("nonce", &self.nonce.is_some())
            .field("csrf_token", &self.csrf_token.is_some())
            .field("input", &self.input.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_request_has_nothing() {
        let caps = RequestCapabilities::new();
        assert!(caps.flash_messages().is_none());
        assert!(caps.old_input().is_none());
        assert!(caps.nonce().is_none());
        assert!(caps.csrf_token().is_none());
        assert!(caps.input().is_none());
    }

    #[test]
    fn builders_record_each_capability() {
        let caps = RequestCapabilities::new()
            .with_flash_messages(json!({"notice": "saved"}))
            .with_csrf_token(|| Some("tok".into()))
            .with_input(|key, _| json!(key));

        assert_eq!(caps.flash_messages(), Some(&json!({"notice": "saved"})));
        assert_eq!(caps.csrf_token().map(|f| f()), Some(Some("tok".to_string())));
        assert_eq!(caps.input().map(|f| f("q", None)), Some(json!("q")));
        assert!(caps.nonce().is_none());
    }

    #[test]
    fn debug_reports_presence_only() {
        let caps = RequestCapabilities::new().with_nonce(|| None);
        let rendered = format!("{caps:?}");
        assert!(rendered.contains("nonce: true"));
        assert!(rendered.contains("csrf_token: false"));
    }
}
