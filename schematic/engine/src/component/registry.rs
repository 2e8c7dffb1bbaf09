//! Name-keyed child registries.

use std::sync::Arc;

use indexmap::IndexMap;

use super::Component;

/// Ordered registry of child components keyed by registered name.
#[derive(Clone, Default)]
pub struct Registry {
    entries: IndexMap<String, Arc<Component>>,
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, component: Arc<Component>) {
        self.entries.insert(component.name().to_string(), component);
    }

    /// Adds `component` only if its name is not registered yet.
    pub(crate) fn insert_missing(&mut self, name: &str, component: &Arc<Component>) {
        if !self.entries.contains_key(name) {
            self.entries.insert(name.to_string(), Arc::clone(component));
        }
    }

    /// Returns the component registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<Component>> {
        self.entries.get(name)
    }

    /// Returns whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Iterates `(name, component)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Component>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
