//! Branch schema node: a group of parameters addressed as one region.
//!
//! A nested parameter registered under `price` can be fed two ways:
//!
//! - **nested**: `{"price": {"min": 10}}` - the children resolve inside the
//!   object, and their output is nested under the branch's output key:
//!   `{"price": {"price.gte": 10}}`.
//! - **dotted**: `{"price.min": 10}` - the children resolve against the
//!   `price.`-prefixed arguments, and their output lands flat at the current
//!   level: `{"price.gte": 10}`.
//!
//! The choice is made per child, so one call may feed some children nested
//! and others dotted. A child fed by neither notation falls back to its own
//! required/default rules; its default lands inside the nested output when a
//! nested object was given, otherwise flat.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::ParameterNode;
use crate::error::ValidationError;

/// A branch parameter grouping named child nodes.
///
/// ## Examples
///
/// ```
/// use schematic_engine::{NestedParameter, Parameter, ParameterNode};
/// use serde_json::json;
///
/// let price = ParameterNode::from(
///     NestedParameter::new("price")
///         .child("min", Parameter::new("price.gte"))
///         .child("max", Parameter::new("price.lte")),
/// );
///
/// let nested = json!({"price": {"min": 10, "max": 100}});
/// let out = price.map("price", nested.as_object().unwrap()).unwrap();
/// assert_eq!(json!(out), json!({"price": {"price.gte": 10, "price.lte": 100}}));
///
/// let dotted = json!({"price.min": 10, "price.max": 100});
/// let out = price.map("price", dotted.as_object().unwrap()).unwrap();
/// assert_eq!(json!(out), json!({"price.gte": 10, "price.lte": 100}));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NestedParameter {
    output_key: String,
    children: IndexMap<String, ParameterNode>,
}

/// Where a child's argument was found.
enum Source<'a> {
    Nested(&'a Map<String, Value>),
    Dotted(&'a Map<String, Value>),
    Absent,
}

impl NestedParameter {
    /// Creates an empty branch whose nested output goes under `output_key`.
    pub fn new(output_key: impl Into<String>) -> Self {
        Self {
            output_key: output_key.into(),
            children: IndexMap::new(),
        }
    }

    /// Adds a child addressed by `key`. Re-adding a key replaces the child.
    pub fn child(mut self, key: impl Into<String>, node: impl Into<ParameterNode>) -> Self {
        self.children.insert(key.into(), node.into());
        self
    }

    /// Key the nested output object is written under.
    pub fn output_key(&self) -> &str {
        &self.output_key
    }

    /// Children in declaration order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ParameterNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn child_map(&self) -> &IndexMap<String, ParameterNode> {
        &self.children
    }

    /// Returns the object supplied under the branch's own key, if any.
    fn nested_input<'a>(
        key: &str,
        input: &'a Map<String, Value>,
        path: &str,
    ) -> Result<Option<&'a Map<String, Value>>, ValidationError> {
        match input.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(ValidationError::ExpectedObject {
                path: path.to_string(),
            }),
        }
    }

    /// Collects `key.`-prefixed arguments with the prefix stripped.
    fn dotted_input(key: &str, input: &Map<String, Value>) -> Map<String, Value> {
        input
            .iter()
            .filter_map(|(arg, value)| {
                let rest = dotted_suffix(key, arg)?;
                Some((rest.to_string(), value.clone()))
            })
            .collect()
    }

    fn locate<'a>(
        child_key: &str,
        child: &ParameterNode,
        nested: Option<&'a Map<String, Value>>,
        dotted: &'a Map<String, Value>,
    ) -> Source<'a> {
        match nested {
            Some(region) if child.is_addressed(child_key, region) => Source::Nested(region),
            _ if child.is_addressed(child_key, dotted) => Source::Dotted(dotted),
            _ => Source::Absent,
        }
    }

    pub(crate) fn is_addressed(&self, key: &str, input: &Map<String, Value>) -> bool {
        input.contains_key(key) || input.keys().any(|arg| dotted_suffix(key, arg).is_some())
    }

    pub(crate) fn check_in(
        &self,
        key: &str,
        input: &Map<String, Value>,
        path: &str,
    ) -> Result<(), ValidationError> {
        let nested = Self::nested_input(key, input, path)?;
        let dotted = Self::dotted_input(key, input);
        let empty = Map::new();

        for (child_key, child) in &self.children {
            let child_path = format!("{path}.{child_key}");
            let region = match Self::locate(child_key, child, nested, &dotted) {
                Source::Nested(region) | Source::Dotted(region) => region,
                Source::Absent => &empty,
            };
            child.check_in(child_key, region, &child_path)?;
        }
        Ok(())
    }

    pub(crate) fn resolve_into(
        &self,
        key: &str,
        input: &Map<String, Value>,
        out: &mut Map<String, Value>,
        path: &str,
    ) -> Result<(), ValidationError> {
        let nested = Self::nested_input(key, input, path)?;
        let dotted = Self::dotted_input(key, input);
        let empty = Map::new();
        let mut nested_out = Map::new();

        for (child_key, child) in &self.children {
            let child_path = format!("{path}.{child_key}");
            match Self::locate(child_key, child, nested, &dotted) {
                Source::Nested(region) => {
                    child.resolve_into(child_key, region, &mut nested_out, &child_path)?;
                }
                Source::Dotted(region) => {
                    child.resolve_into(child_key, region, out, &child_path)?;
                }
                Source::Absent if nested.is_some() => {
                    child.resolve_into(child_key, &empty, &mut nested_out, &child_path)?;
                }
                Source::Absent => {
                    child.resolve_into(child_key, &empty, out, &child_path)?;
                }
            }
        }

        if nested.is_some() {
            tracing::trace!(path, output_key = %self.output_key, "resolved nested region");
            out.insert(self.output_key.clone(), Value::Object(nested_out));
        }
        Ok(())
    }
}

/// Returns the part of `arg` after `key.`, if `arg` is a dotted address under `key`.
pub(crate) fn dotted_suffix<'a>(key: &str, arg: &'a str) -> Option<&'a str> {
    arg.strip_prefix(key)?
        .strip_prefix('.')
        .filter(|rest| !rest.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parameter;
    use serde_json::json;

    fn price() -> ParameterNode {
        NestedParameter::new("price")
            .child("min", Parameter::new("price.gte"))
            .child("max", Parameter::new("price.lte"))
            .into()
    }

    fn map(node: &ParameterNode, key: &str, input: Value) -> Result<Value, ValidationError> {
        let input = input.as_object().cloned().unwrap_or_default();
        node.map(key, &input).map(Value::Object)
    }

    #[test]
    fn dotted_suffix_requires_separator() {
        assert_eq!(dotted_suffix("price", "price.min"), Some("min"));
        assert_eq!(dotted_suffix("price", "pricemin"), None);
        assert_eq!(dotted_suffix("price", "price."), None);
        assert_eq!(dotted_suffix("price", "price"), None);
    }

    #[test]
    fn nested_input_nests_output() {
        let out = map(&price(), "price", json!({"price": {"min": 10, "max": 100}})).unwrap();
        assert_eq!(out, json!({"price": {"price.gte": 10, "price.lte": 100}}));
    }

    #[test]
    fn dotted_input_flattens_output() {
        let out = map(&price(), "price", json!({"price.min": 10, "price.max": 100})).unwrap();
        assert_eq!(out, json!({"price.gte": 10, "price.lte": 100}));
    }

    #[test]
    fn mixed_notation_within_one_branch() {
        let out = map(&price(), "price", json!({"price": {"min": 10}, "price.max": 100})).unwrap();
        assert_eq!(out, json!({"price": {"price.gte": 10}, "price.lte": 100}));
    }

    #[test]
    fn branch_output_key_differs_from_local_key() {
        let node: ParameterNode = NestedParameter::new("filter")
            .child("tag", Parameter::new("t"))
            .into();
        let out = map(&node, "filters", json!({"filters": {"tag": "red"}})).unwrap();
        assert_eq!(out, json!({"filter": {"t": "red"}}));
    }

    #[test]
    fn deep_dotted_path_flattens_every_level() {
        let node: ParameterNode = NestedParameter::new("a")
            .child("b", NestedParameter::new("b").child("c", Parameter::new("leaf")))
            .into();
        let out = map(&node, "a", json!({"a.b.c": 1})).unwrap();
        assert_eq!(out, json!({"leaf": 1}));
    }

    #[test]
    fn nested_then_dotted_keeps_outer_nesting() {
        let node: ParameterNode = NestedParameter::new("a")
            .child("b", NestedParameter::new("b").child("c", Parameter::new("leaf")))
            .into();
        let out = map(&node, "a", json!({"a": {"b.c": 1}})).unwrap();
        assert_eq!(out, json!({"a": {"leaf": 1}}));
    }

    #[test]
    fn fully_nested_path_nests_every_level() {
        let node: ParameterNode = NestedParameter::new("a")
            .child("b", NestedParameter::new("b").child("c", Parameter::new("leaf")))
            .into();
        let out = map(&node, "a", json!({"a": {"b": {"c": 1}}})).unwrap();
        assert_eq!(out, json!({"a": {"b": {"leaf": 1}}}));
    }

    #[test]
    fn missing_required_child_reports_dotted_path() {
        let node: ParameterNode = NestedParameter::new("price")
            .child("min", Parameter::new("price.gte").required())
            .into();
        let err = map(&node, "price", json!({"price": {}})).unwrap_err();
        assert_eq!(err, ValidationError::missing("price.min"));
        assert!(!node.validate("price", &Map::new()));
    }

    #[test]
    fn required_child_satisfied_by_either_notation() {
        let node: ParameterNode = NestedParameter::new("price")
            .child("min", Parameter::new("price.gte").required())
            .child("max", Parameter::new("price.lte").required())
            .into();
        let input = json!({"price": {"min": 1}, "price.max": 2});
        assert!(node.validate("price", input.as_object().unwrap()));
    }

    #[test]
    fn absent_branch_applies_defaults_flat() {
        let node: ParameterNode = NestedParameter::new("page")
            .child("size", Parameter::new("page.size").with_default(25))
            .into();
        let out = map(&node, "page", json!({})).unwrap();
        assert_eq!(out, json!({"page.size": 25}));
    }

    #[test]
    fn defaults_follow_nested_notation() {
        let node: ParameterNode = NestedParameter::new("page")
            .child("size", Parameter::new("size").with_default(25))
            .child("number", Parameter::new("number"))
            .into();
        let out = map(&node, "page", json!({"page": {"number": 3}})).unwrap();
        assert_eq!(out, json!({"page": {"size": 25, "number": 3}}));
    }

    #[test]
    fn scalar_under_branch_key_is_rejected() {
        let err = map(&price(), "price", json!({"price": 10})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ExpectedObject {
                path: "price".to_string()
            }
        );
    }

    #[test]
    fn unknown_dotted_children_are_ignored() {
        let out = map(&price(), "price", json!({"price.avg": 50, "price.min": 1})).unwrap();
        assert_eq!(out, json!({"price.gte": 1}));
    }
}
