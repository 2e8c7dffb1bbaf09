//! Parameter schema trees.
//!
//! A schema is a tree of [`ParameterNode`]s: [`Parameter`] leaves and
//! [`NestedParameter`] branches. Both resolution operations are pure and
//! recursive:
//!
//! - [`ParameterNode::validate`] answers whether the arguments satisfy the
//!   node (required children present, constraints met).
//! - [`ParameterNode::map`] produces the node's contribution to the output
//!   level it is declared at.

mod constraint;
mod leaf;
mod nested;

pub use constraint::{Constraint, ParamType};
pub use leaf::Parameter;
pub use nested::NestedParameter;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::ValidationError;
use nested::dotted_suffix;

/// A node of a parameter schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterNode {
    /// Resolves one argument to one output key.
    Leaf(Parameter),
    /// Resolves a nested or dotted argument region.
    Branch(NestedParameter),
}

impl ParameterNode {
    /// Output key the node writes under (the nested object's key for branches).
    pub fn output_key(&self) -> &str {
        match self {
            Self::Leaf(param) => param.output_key(),
            Self::Branch(branch) => branch.output_key(),
        }
    }

    /// Returns `true` if the node declared at `key` is satisfied by `input`.
    pub fn validate(&self, key: &str, input: &Map<String, Value>) -> bool {
        self.check(key, input).is_ok()
    }

    /// Like [`validate`](Self::validate) but reports the first failure.
    ///
    /// ## Errors
    ///
    /// Returns the [`ValidationError`] of the first node, in declaration
    /// order, that is missing or violates its constraint.
    pub fn check(&self, key: &str, input: &Map<String, Value>) -> Result<(), ValidationError> {
        self.check_in(key, input, key)
    }

    /// Maps `input` through the node declared at `key`.
    ///
    /// The returned map holds only this node's contribution, at the level
    /// the node is declared at.
    ///
    /// ## Errors
    ///
    /// Fails with the first [`ValidationError`]; nothing is returned on failure.
    pub fn map(
        &self,
        key: &str,
        input: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ValidationError> {
        let mut out = Map::new();
        self.resolve_into(key, input, &mut out, key)?;
        Ok(out)
    }

    pub(crate) fn check_in(
        &self,
        key: &str,
        input: &Map<String, Value>,
        path: &str,
    ) -> Result<(), ValidationError> {
        match self {
            Self::Leaf(param) => param.check_in(key, input, path),
            Self::Branch(branch) => branch.check_in(key, input, path),
        }
    }

    pub(crate) fn resolve_into(
        &self,
        key: &str,
        input: &Map<String, Value>,
        out: &mut Map<String, Value>,
        path: &str,
    ) -> Result<(), ValidationError> {
        match self {
            Self::Leaf(param) => param.resolve_into(key, input, out, path),
            Self::Branch(branch) => branch.resolve_into(key, input, out, path),
        }
    }

    /// Returns `true` if `input` supplies anything for the node at `key`.
    pub(crate) fn is_addressed(&self, key: &str, input: &Map<String, Value>) -> bool {
        match self {
            Self::Leaf(_) => input.contains_key(key),
            Self::Branch(branch) => branch.is_addressed(key, input),
        }
    }

    /// Returns `true` if the argument named `arg` is consumed by the node at `key`.
    fn claims(&self, key: &str, arg: &str) -> bool {
        if arg == key {
            return true;
        }
        match self {
            Self::Leaf(_) => false,
            Self::Branch(branch) => dotted_suffix(key, arg).is_some_and(|rest| {
                branch
                    .child_map()
                    .iter()
                    .any(|(child_key, child)| child.claims(child_key, rest))
            }),
        }
    }
}

impl From<Parameter> for ParameterNode {
    fn from(param: Parameter) -> Self {
        Self::Leaf(param)
    }
}

impl From<NestedParameter> for ParameterNode {
    fn from(branch: NestedParameter) -> Self {
        Self::Branch(branch)
    }
}

/// Appends to `acc` every argument in `input` that no node in `nodes` consumes.
///
/// Objects supplied under a branch's own key are searched recursively, so
/// `{"price": {"avg": 1}}` reports `price.avg`.
pub(crate) fn collect_unmatched(
    nodes: &IndexMap<String, ParameterNode>,
    input: &Map<String, Value>,
    prefix: &str,
    acc: &mut Vec<String>,
) {
    for (arg, value) in input {
        let owner = nodes.iter().find(|(key, node)| node.claims(key, arg));
        match (owner, value) {
            (None, _) => acc.push(format!("{prefix}{arg}")),
            (Some((key, ParameterNode::Branch(branch))), Value::Object(inner)) if key == arg => {
                collect_unmatched(branch.child_map(), inner, &format!("{prefix}{arg}."), acc);
            }
            _ => {}
        }
    }
}
