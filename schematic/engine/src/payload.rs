//! Root schema for one operation's arguments.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::parameter::{ParameterNode, collect_unmatched};

/// Dynamic parameter nodes combined with static literal overrides.
///
/// [`map`](Self::map) is a pure function of the declared schema and the
/// call-time arguments:
///
/// 1. start from a copy of the static values,
/// 2. resolve every dynamic node in declaration order,
/// 3. let dynamic output overwrite static output on key collisions (and later
///    dynamic nodes overwrite earlier ones).
///
/// Arguments no node addresses are ignored; [`unmatched`](Self::unmatched)
/// lists them for callers that want to be strict.
///
/// ## Examples
///
/// ```
/// use schematic_engine::{NestedParameter, Parameter, Payload};
/// use serde_json::json;
///
/// let payload = Payload::builder()
///     .parameter("price", NestedParameter::new("price")
///         .child("min", Parameter::new("price.gte"))
///         .child("max", Parameter::new("price.lte")))
///     .parameter("category", Parameter::new("cat"))
///     .static_value("format", "json")
///     .build();
///
/// let args = json!({"price.min": 10, "category": "shoes"});
/// let out = payload.map(args.as_object().unwrap()).unwrap();
/// assert_eq!(json!(out), json!({"format": "json", "price.gte": 10, "cat": "shoes"}));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    dynamic: IndexMap<String, ParameterNode>,
    statics: Map<String, Value>,
}

impl Payload {
    /// Starts an empty payload declaration.
    pub fn builder() -> PayloadBuilder {
        PayloadBuilder::default()
    }

    /// Dynamic nodes in declaration order, keyed by argument name.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &ParameterNode)> {
        self.dynamic.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Looks up a dynamic node by argument name.
    pub fn parameter(&self, key: &str) -> Option<&ParameterNode> {
        self.dynamic.get(key)
    }

    /// Static literal values, keyed by output key.
    pub fn statics(&self) -> &Map<String, Value> {
        &self.statics
    }

    /// Returns `true` if every dynamic node is satisfied by `arguments`.
    pub fn validate(&self, arguments: &Map<String, Value>) -> bool {
        self.check(arguments).is_ok()
    }

    /// Checks every dynamic node, reporting the first failure.
    ///
    /// ## Errors
    ///
    /// Returns the first [`ValidationError`] in declaration order.
    pub fn check(&self, arguments: &Map<String, Value>) -> Result<(), ValidationError> {
        self.dynamic
            .iter()
            .try_for_each(|(key, node)| node.check_in(key, arguments, key))
    }

    /// Compiles `arguments` into the flat, wire-ready output mapping.
    ///
    /// ## Errors
    ///
    /// Fails on the first missing required parameter or violated constraint.
    /// No partial output is returned.
    pub fn map(
        &self,
        arguments: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ValidationError> {
        let mut result = self.statics.clone();
        for (key, node) in &self.dynamic {
            node.resolve_into(key, arguments, &mut result, key)?;
        }

        if tracing::enabled!(tracing::Level::DEBUG) {
            let ignored = self.unmatched(arguments);
            tracing::debug!(
                outputs = result.len(),
                ignored = ?ignored,
                "mapped payload arguments"
            );
        }
        Ok(result)
    }

    /// Lists argument keys (in dotted form) that no dynamic node consumes.
    pub fn unmatched(&self, arguments: &Map<String, Value>) -> Vec<String> {
        let mut acc = Vec::new();
        collect_unmatched(&self.dynamic, arguments, "", &mut acc);
        acc
    }
}

/// Builder for [`Payload`].
#[derive(Debug, Default)]
pub struct PayloadBuilder {
    dynamic: IndexMap<String, ParameterNode>,
    statics: Map<String, Value>,
}

impl PayloadBuilder {
    /// Declares a dynamic node addressed by the argument `key`.
    ///
    /// Declaring the same key twice replaces the earlier node but keeps its
    /// position.
    pub fn parameter(mut self, key: impl Into<String>, node: impl Into<ParameterNode>) -> Self {
        self.dynamic.insert(key.into(), node.into());
        self
    }

    /// Declares a literal always present in the output unless a dynamic node
    /// writes the same output key.
    pub fn static_value(mut self, output_key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.statics.insert(output_key.into(), value.into());
        self
    }

    /// Declares several literals at once.
    pub fn statics(mut self, values: Map<String, Value>) -> Self {
        self.statics.extend(values);
        self
    }

    /// Freezes the declaration.
    pub fn build(self) -> Payload {
        Payload {
            dynamic: self.dynamic,
            statics: self.statics,
        }
    }
}
