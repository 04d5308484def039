//! In-memory configuration backed by a JSON tree.

use std::sync::Arc;

use pugview_core::{application::ports::ConfigSource, domain::FilterTable};
use serde_json::Value;

/// Configuration held in memory; keys are dotted paths into `tree`.
#[derive(Default)]
pub struct MemoryConfig {
    tree: Value,
    filters: FilterTable,
}

impl MemoryConfig {
    pub fn new(tree: Value) -> Self {
        Self {
            tree,
            filters: FilterTable::new(),
        }
    }

    /// Register a filter handed to templates through `app.pug.filters`.
    pub fn with_filter<F>(mut self, name: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
        self
    }
}

impl ConfigSource for MemoryConfig {
    fn get(&self, key: &str) -> Option<Value> {
        key.split('.')
            .try_fold(&self.tree, |node, part| node.get(part))
            .cloned()
    }

    fn get_filters(&self, _key: &str) -> Option<FilterTable> {
        (!self.filters.is_empty()).then(|| self.filters.clone())
    }
}
