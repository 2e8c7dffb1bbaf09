//! Call-time argument validation errors.

use thiserror::Error;

/// Errors raised while resolving call-time arguments against a schema.
///
/// Every variant carries the dotted `path` of the offending schema node
/// (e.g. `price.min`) so the caller can point at the bad argument. No
/// partial mapping is ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required parameter was not supplied under any notation.
    #[error("Missing required parameter: {path}")]
    MissingRequired {
        /// Dotted path of the missing parameter.
        path: String,
    },

    /// A supplied value failed the parameter's declared constraint.
    #[error("Invalid value for '{path}': {message}")]
    ConstraintViolation {
        /// Dotted path of the parameter.
        path: String,
        /// Description of the failed constraint.
        message: String,
    },

    /// A nested parameter's key held something other than a mapping.
    #[error("Expected an object for '{path}'")]
    ExpectedObject {
        /// Dotted path of the nested parameter.
        path: String,
    },

    /// A `{placeholder}` in the resource path had no mapped value.
    #[error("Missing value for path parameter '{name}'")]
    MissingPathParam {
        /// Placeholder name.
        name: String,
    },
}

impl ValidationError {
    /// Creates a missing required parameter error.
    pub fn missing(path: impl Into<String>) -> Self {
        Self::MissingRequired { path: path.into() }
    }

    /// Creates a constraint violation error.
    pub fn constraint(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this error reports an absent required parameter.
    pub fn is_missing_required(&self) -> bool {
        matches!(self, Self::MissingRequired { .. })
    }

    /// Returns the dotted schema path this error refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingRequired { path }
            | Self::ConstraintViolation { path, .. }
            | Self::ExpectedObject { path } => Some(path),
            Self::MissingPathParam { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_display() {
        let err = ValidationError::missing("price.min");
        assert_eq!(err.to_string(), "Missing required parameter: price.min");
        assert!(err.is_missing_required());
        assert_eq!(err.path(), Some("price.min"));
    }

    #[test]
    fn test_constraint_violation_display() {
        let err = ValidationError::constraint("limit", "expected integer, got string");
        assert!(err.to_string().contains("Invalid value for 'limit'"));
        assert!(!err.is_missing_required());
    }

    #[test]
    fn test_path_param_has_no_schema_path() {
        let err = ValidationError::MissingPathParam {
            name: "id".to_string(),
        };
        assert_eq!(err.path(), None);
        assert_eq!(err.to_string(), "Missing value for path parameter 'id'");
    }
}
