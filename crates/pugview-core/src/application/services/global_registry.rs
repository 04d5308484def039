//! Process-wide registry of template globals.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::domain::{OptionValue, RendererOptions};

/// Mutable name → value map shared by every render of a renderer.
///
/// Seeded from configuration at construction and written to by the request
/// hook. Writes are visible to every later render, whichever request it
/// belongs to: a request that lacks a capability sees the value the
/// previous request registered. Use [`RequestScope`] when request values
/// must not leak between requests.
///
/// Cloning shares the underlying map.
///
/// [`RequestScope`]: super::RequestScope
#[derive(Debug, Clone, Default)]
pub struct GlobalRegistry {
    inner: Arc<RwLock<RendererOptions>>,
}

impl GlobalRegistry {
    pub fn new(options: RendererOptions) -> Self {
        Self {
            inner: Arc::new(RwLock::new(options)),
        }
    }

    /// Set `name` to `value`, replacing whatever was there.
    pub fn set_global(&self, name: impl Into<String>, value: impl Into<OptionValue>) {
        let name = name.into();
        debug!(global = %name, "Global set");
        self.write().insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<OptionValue> {
        self.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Copy of the full option map as it is right now.
    pub fn snapshot(&self) -> RendererOptions {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave the map half-written
    // (every write is a single insert), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, RendererOptions> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RendererOptions> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn last_write_wins() {
        let registry = GlobalRegistry::default();
        registry.set_global("title", "first");
        registry.set_global("title", "second");
        assert_eq!(registry.snapshot().data("title"), Some(&json!("second")));
    }

    #[test]
    fn maps_are_replaced_not_merged() {
        let registry = GlobalRegistry::default();
        registry.set_global("user", json!({"name": "ada", "admin": true}));
        registry.set_global("user", json!({"name": "bob"}));
        assert_eq!(registry.snapshot().data("user"), Some(&json!({"name": "bob"})));
    }

    #[test]
    fn seeded_options_are_visible() {
        let registry = GlobalRegistry::new(RendererOptions::new().with("pretty", true));
        assert!(registry.snapshot().pretty());
        assert!(registry.contains("pretty"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn snapshot_does_not_track_later_writes() {
        let registry = GlobalRegistry::default();
        let before = registry.snapshot();
        registry.set_global("late", 1.to_string());
        assert!(before.get("late").is_none());
        assert!(registry.get("late").is_some());
    }

    #[test]
    fn clones_share_state() {
        let registry = GlobalRegistry::default();
        let other = registry.clone();
        other.set_global("shared", true);
        assert!(registry.snapshot().flag("shared"));
    }
}
