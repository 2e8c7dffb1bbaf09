//! Value constraints a leaf parameter can declare.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

use crate::error::ValidationError;

/// JSON value types a parameter can be restricted to.
///
/// `Float` accepts any JSON number, integers included.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParamType {
    /// A JSON string.
    String,
    /// A JSON number without a fractional part.
    Integer,
    /// Any JSON number.
    Float,
    /// A JSON boolean.
    Boolean,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
}

impl ParamType {
    /// Returns `true` if `value` is of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

/// Name of a value's JSON type, for error messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Constraints checked against a supplied (not defaulted) leaf value.
///
/// An empty constraint accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Required JSON type, if any.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ParamType>,
    /// Allowed values. Empty means any value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Value>,
}

impl Constraint {
    /// Returns `true` if no restriction is declared.
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.choices.is_empty()
    }

    /// Checks `value` supplied for the parameter at `path`.
    ///
    /// ## Errors
    ///
    /// Returns [`ValidationError::ConstraintViolation`] when the value has the
    /// wrong type or is not one of the declared choices.
    pub fn check(&self, path: &str, value: &Value) -> Result<(), ValidationError> {
        if let Some(kind) = self.kind
            && !kind.accepts(value)
        {
            return Err(ValidationError::constraint(
                path,
                format!("expected {kind}, got {}", type_name(value)),
            ));
        }

        if !self.choices.is_empty() && !self.choices.contains(value) {
            return Err(ValidationError::constraint(
                path,
                format!("{value} is not one of the allowed values"),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_rejects_fractions() {
        assert!(ParamType::Integer.accepts(&json!(3)));
        assert!(!ParamType::Integer.accepts(&json!(3.5)));
        assert!(ParamType::Float.accepts(&json!(3)));
    }

    #[test]
    fn empty_constraint_accepts_anything() {
        let constraint = Constraint::default();
        assert!(constraint.is_empty());
        assert!(constraint.check("any", &json!(null)).is_ok());
    }

    #[test]
    fn type_mismatch_reports_both_types() {
        let constraint = Constraint {
            kind: Some(ParamType::Integer),
            choices: vec![],
        };
        let err = constraint.check("limit", &json!("ten")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::constraint("limit", "expected integer, got string")
        );
    }

    #[test]
    fn choices_are_enforced() {
        let constraint = Constraint {
            kind: None,
            choices: vec![json!("asc"), json!("desc")],
        };
        assert!(constraint.check("order", &json!("asc")).is_ok());
        assert!(constraint.check("order", &json!("sideways")).is_err());
    }

    #[test]
    fn param_type_parses_lowercase() {
        assert_eq!("boolean".parse::<ParamType>().unwrap(), ParamType::Boolean);
        assert_eq!(ParamType::Object.to_string(), "object");
    }
}
