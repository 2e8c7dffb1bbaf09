//! Per-component key/value configuration.
//!
//! [`Metadata`] is the raw store owned by a single component. It is never
//! read directly by other components: lookups go through
//! [`Component::get_metadata`](crate::Component::get_metadata), which walks
//! the component's resolution chain.
//!
//! A handful of keys carry meaning for calling layers (see the constants
//! below); the store itself treats every key the same way.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Base URL requests are issued against.
pub const BASE_URL: &str = "baseurl";
/// Path segment of a resource or method.
pub const PATH: &str = "path";
/// Explicit registration name.
pub const NAME: &str = "name";
/// HTTP verb of a method (see [`RestMethod`](crate::RestMethod)).
pub const REQUEST_METHOD: &str = "requestmethod";
/// Reserved for calling layers that attach payload descriptions.
pub const PAYLOAD: &str = "payload";

/// An ordered mapping from string key to arbitrary JSON value.
///
/// Insertion order is preserved; writing an existing key overwrites it in
/// place without moving it.
///
/// ## Examples
///
/// ```
/// use schematic_engine::Metadata;
///
/// let mut meta = Metadata::new();
/// meta.set("baseurl", "https://api.example.com");
/// meta.set("baseurl", "https://api.example.org");
///
/// assert_eq!(meta.get("baseurl").and_then(|v| v.as_str()), Some("https://api.example.org"));
/// assert_eq!(meta.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: Map<String, Value>,
}

impl Metadata {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `value` under `key`, silently replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the value stored directly under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is stored directly in this store.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Copies every entry of `other` into this store; `other` wins on collision.
    pub fn merge(&mut self, other: &Metadata) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Copies the entries of `other` whose keys are not stored yet.
    pub(crate) fn fill(&mut self, other: &Metadata) {
        for (key, value) in &other.entries {
            if !self.entries.contains_key(key) {
                self.entries.insert(key.clone(), value.clone());
            }
        }
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Metadata::new();
        for (key, value) in iter {
            meta.set(key, value);
        }
        meta
    }
}
