//! Resource path composition and enclosing scope.
//!
//! Segment rules, walking from the outermost enclosing component down to the
//! component itself:
//!
//! - a **resource** contributes its `path` metadata, or its registered name
//!   when no path is declared;
//! - a **method** contributes its `path` metadata only when declared;
//! - a **client** contributes nothing.
//!
//! Segments are joined with `/` and runs of separators collapse to one.
//!
//! Both the full path and the metadata visible through enclosing components
//! are fixed when a tree is frozen, so a handle to a nested component keeps
//! them after the rest of the tree is dropped.

use std::sync::Arc;

use serde_json::Value;

use super::{Component, ComponentKind};
use crate::metadata::{self, Metadata};

/// What a component sees of the components enclosing it.
#[derive(Debug, Clone, Default)]
pub(super) struct Enclosing {
    path: String,
    scope: Arc<Metadata>,
}

impl Enclosing {
    /// Resolves `key` through the enclosing components, nearest first.
    pub(super) fn lookup(&self, key: &str) -> Option<&Value> {
        self.scope.get(key)
    }
}

/// Places a component inside `outer`.
///
/// Returns the component's full path and the context its own children are
/// frozen in. `chain` is the component's resolution chain, nearest first.
pub(super) fn place(
    outer: &Enclosing,
    kind: ComponentKind,
    name: &str,
    own: &Metadata,
    chain: &[Arc<Component>],
) -> (String, Enclosing) {
    let lineage: Vec<&Metadata> = std::iter::once(own)
        .chain(chain.iter().map(|base| &base.metadata))
        .collect();

    let declared = lineage
        .iter()
        .find_map(|entries| entries.get(metadata::PATH))
        .and_then(Value::as_str);
    let segment = match kind {
        ComponentKind::Client => None,
        ComponentKind::Resource => Some(declared.unwrap_or(name)),
        ComponentKind::Method => declared,
    };
    let path = match segment {
        None => outer.path.clone(),
        Some(segment) if outer.path.is_empty() => collapse_separators(segment),
        Some(segment) => collapse_separators(&format!("{}/{segment}", outer.path)),
    };

    let mut scope = Metadata::new();
    for entries in lineage {
        scope.fill(entries);
    }
    scope.fill(&outer.scope);

    let inner = Enclosing {
        path: path.clone(),
        scope: Arc::new(scope),
    };
    (path, inner)
}

/// Replaces every run of `/` with a single `/`.
fn collapse_separators(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && collapsed.ends_with('/') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed
}
