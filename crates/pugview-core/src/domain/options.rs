//! Renderer options and the values stored in them.
//!
//! `RendererOptions` is one flat map shared by two kinds of data:
//!
//! - the engine's own switches (`basedir`, `pretty`, `cache`, `doctype`,
//!   `filters`, `self`, `debug`)
//! - template globals (anything else, e.g. `csrfToken` or `config`)
//!
//! Both live in the same namespace on purpose: a global named `pretty`
//! overrides the engine switch of the same name.

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde_json::Value;

/// A callable global with the `(key, default)` signature used by
/// `old`, `input` and `config`.
pub type Accessor = Arc<dyn Fn(&str, Option<Value>) -> Value + Send + Sync>;

/// A text filter: receives the filtered block/value as text, returns text.
pub type Filter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Named filters, as registered under the `filters` option.
pub type FilterTable = BTreeMap<String, Filter>;

/// Produces a per-request token (CSP nonce, CSRF token).
pub type TokenSource = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Well-known option and global names.
pub mod keys {
    pub const BASEDIR: &str = "basedir";
    pub const PRETTY: &str = "pretty";
    pub const CACHE: &str = "cache";
    pub const DOCTYPE: &str = "doctype";
    pub const FILTERS: &str = "filters";
    pub const SELF: &str = "self";
    pub const DEBUG: &str = "debug";

    pub const FLASH_MESSAGES: &str = "flashMessages";
    pub const OLD: &str = "old";
    pub const CSP_NONCE: &str = "cspNonce";
    pub const CSRF_TOKEN: &str = "csrfToken";
    pub const INPUT: &str = "input";
    pub const CONFIG: &str = "config";
}

/// A single entry of [`RendererOptions`].
#[derive(Clone)]
pub enum OptionValue {
    /// Plain data: strings, numbers, booleans, maps, ...
    Data(Value),
    /// A callable exposed to templates as `name(key, default)`.
    Accessor(Accessor),
    /// A table of text filters.
    Filters(FilterTable),
}

impl OptionValue {
    /// Wrap a closure as an accessor value.
    pub fn accessor<F>(f: F) -> Self
    where
        F: Fn(&str, Option<Value>) -> Value + Send + Sync + 'static,
    {
        Self::Accessor(Arc::new(f))
    }

    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_accessor(&self) -> Option<&Accessor> {
        match self {
            Self::Accessor(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_filters(&self) -> Option<&FilterTable> {
        match self {
            Self::Filters(table) => Some(table),
            _ => None,
        }
    }

    /// Truthiness in the loose sense used by configuration lookups:
    /// callables and filter tables are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Data(value) => is_truthy(value),
            Self::Accessor(_) | Self::Filters(_) => true,
        }
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Self::Accessor(_) => f.write_str("Accessor(<fn>)"),
            Self::Filters(table) => f
                .debug_tuple("Filters")
                .field(&table.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

impl From<Value> for OptionValue {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Data(Value::Bool(value))
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Data(Value::String(value.to_owned()))
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Data(Value::String(value))
    }
}

impl From<FilterTable> for OptionValue {
    fn from(table: FilterTable) -> Self {
        Self::Filters(table)
    }
}

/// Loose truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy,
/// everything else (including empty arrays and maps) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The option map handed to the template engine.
#[derive(Debug, Clone, Default)]
pub struct RendererOptions {
    entries: BTreeMap<String, OptionValue>,
}

impl RendererOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, returning the value it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        self.entries.insert(name.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.get(name)
    }

    /// The plain data stored under `name`, if any.
    pub fn data(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(OptionValue::as_data)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<OptionValue> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy every entry of `other` onto `self`; `other` wins on collision.
    pub fn overlay(&mut self, other: &RendererOptions) {
        for (name, value) in &other.entries {
            self.entries.insert(name.clone(), value.clone());
        }
    }

    // ── Typed readers ─────────────────────────────────────────────────────

    /// The `basedir` option as a string, if it holds one.
    pub fn basedir(&self) -> Option<&str> {
        self.data(keys::BASEDIR).and_then(Value::as_str)
    }

    pub fn pretty(&self) -> bool {
        self.flag(keys::PRETTY)
    }

    pub fn cache(&self) -> bool {
        self.flag(keys::CACHE)
    }

    /// `self` mode: locals are exposed under a `self` namespace.
    pub fn self_mode(&self) -> bool {
        self.flag(keys::SELF)
    }

    pub fn debug(&self) -> bool {
        self.flag(keys::DEBUG)
    }

    pub fn doctype(&self) -> Option<&str> {
        self.data(keys::DOCTYPE)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn filters(&self) -> Option<&FilterTable> {
        self.get(keys::FILTERS).and_then(OptionValue::as_filters)
    }

    /// `true` when `name` is present and truthy.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(OptionValue::is_truthy)
    }
}

impl<'a> IntoIterator for &'a RendererOptions {
    type Item = (&'a String, &'a OptionValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for RendererOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
