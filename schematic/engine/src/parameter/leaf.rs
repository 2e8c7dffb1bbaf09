//! Leaf schema node: one argument to one output key.

use serde_json::{Map, Value};

use super::constraint::{Constraint, ParamType};
use crate::error::ValidationError;

/// A leaf parameter resolving a single argument to a single output key.
///
/// The key a parameter is registered under (in a [`Payload`](crate::Payload)
/// or a [`NestedParameter`](crate::NestedParameter)) is only the handle used
/// to find the caller's argument. The value is always written under
/// [`output_key`](Self::output_key).
///
/// Parameters are optional unless marked [`required`](Self::required). A
/// required parameter never falls back to its default: a missing required
/// argument fails validation even when a default is declared.
///
/// ## Examples
///
/// ```
/// use schematic_engine::{Parameter, ParamType};
/// use serde_json::json;
///
/// let limit = Parameter::new("page_size")
///     .with_default(20)
///     .with_type(ParamType::Integer);
///
/// assert_eq!(limit.output_key(), "page_size");
/// assert!(!limit.is_required());
/// assert_eq!(limit.default_value(), Some(&json!(20)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    output_key: String,
    required: bool,
    default: Option<Value>,
    constraint: Constraint,
}

impl Parameter {
    /// Creates an optional parameter written under `output_key`.
    pub fn new(output_key: impl Into<String>) -> Self {
        Self {
            output_key: output_key.into(),
            required: false,
            default: None,
            constraint: Constraint::default(),
        }
    }

    /// Marks the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the parameter as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the value used when an optional parameter is not supplied.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restricts supplied values to a JSON type.
    pub fn with_type(mut self, kind: ParamType) -> Self {
        self.constraint.kind = Some(kind);
        self
    }

    /// Restricts supplied values to a fixed set.
    pub fn with_choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.constraint.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the whole constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = constraint;
        self
    }

    /// Key the resolved value is written under.
    pub fn output_key(&self) -> &str {
        &self.output_key
    }

    /// Whether the argument must be supplied.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Fallback value for an optional, unsupplied argument.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Declared value constraint.
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub(crate) fn check_in(
        &self,
        key: &str,
        input: &Map<String, Value>,
        path: &str,
    ) -> Result<(), ValidationError> {
        match input.get(key) {
            Some(value) => self.constraint.check(path, value),
            None if self.required => Err(ValidationError::missing(path)),
            None => Ok(()),
        }
    }

    pub(crate) fn resolve_into(
        &self,
        key: &str,
        input: &Map<String, Value>,
        out: &mut Map<String, Value>,
        path: &str,
    ) -> Result<(), ValidationError> {
        self.check_in(key, input, path)?;

        let value = input.get(key).or(self.default.as_ref());
        if let Some(value) = value {
            tracing::trace!(path, output_key = %self.output_key, "resolved parameter");
            out.insert(self.output_key.clone(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test arguments must be an object"),
        }
    }

    fn resolve(
        param: &Parameter,
        key: &str,
        input: Value,
    ) -> Result<Map<String, Value>, ValidationError> {
        let mut out = Map::new();
        param.resolve_into(key, &args(input), &mut out, key)?;
        Ok(out)
    }

    #[test]
    fn writes_under_output_key_not_local_key() {
        let param = Parameter::new("cat");
        let out = resolve(&param, "category", json!({"category": "shoes"})).unwrap();
        assert_eq!(Value::Object(out), json!({"cat": "shoes"}));
    }

    #[test]
    fn default_applies_when_absent() {
        let param = Parameter::new("page").with_default(1);
        let out = resolve(&param, "page", json!({})).unwrap();
        assert_eq!(Value::Object(out), json!({"page": 1}));
    }

    #[test]
    fn supplied_value_beats_default() {
        let param = Parameter::new("page").with_default(1);
        let out = resolve(&param, "page", json!({"page": 7})).unwrap();
        assert_eq!(Value::Object(out), json!({"page": 7}));
    }

    #[test]
    fn optional_without_default_contributes_nothing() {
        let param = Parameter::new("q");
        let out = resolve(&param, "query", json!({})).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn required_ignores_default() {
        let param = Parameter::new("id").required().with_default("fallback");
        let err = resolve(&param, "id", json!({})).unwrap_err();
        assert_eq!(err, ValidationError::missing("id"));
    }

    #[test]
    fn explicit_null_counts_as_supplied() {
        let param = Parameter::new("cursor").required();
        let out = resolve(&param, "cursor", json!({"cursor": null})).unwrap();
        assert_eq!(Value::Object(out), json!({"cursor": null}));
    }

    #[test]
    fn defaults_skip_constraint_checks() {
        let param = Parameter::new("sort")
            .with_choices(["asc", "desc"])
            .with_default("relevance");
        let out = resolve(&param, "sort", json!({})).unwrap();
        assert_eq!(Value::Object(out), json!({"sort": "relevance"}));

        let err = resolve(&param, "sort", json!({"sort": "random"})).unwrap_err();
        assert!(matches!(err, ValidationError::ConstraintViolation { .. }));
    }
}
