//! State consulted by the stateful matching predicate.
//!
//! A lookup never mutates state; it only reads it through [`StateView`].
//! Transitions (setting and clearing flags when a pair is served) belong to
//! the collaborator driving the proxy, which typically owns an
//! [`InMemoryState`] and hands a view of it into each lookup.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Read-only view of the string-to-string state mapping.
///
/// Intentionally synchronous: the matcher runs with no suspension points and
/// holds the view only for the duration of one lookup.
pub trait StateView: Send + Sync {
    /// Current value for `key`, if any.
    fn value(&self, key: &str) -> Option<String>;

    /// Whether `key` is present.
    fn contains(&self, key: &str) -> bool {
        self.value(key).is_some()
    }
}

impl StateView for HashMap<String, String> {
    fn value(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

/// Mutable state store for callers that own simulation state themselves.
#[derive(Debug, Default)]
pub struct InMemoryState {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from existing entries.
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.write().remove(key)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Copy of the current entries, for diagnostics and export.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries.read().clone()
    }
}

impl StateView for InMemoryState {
    fn value(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }
}
