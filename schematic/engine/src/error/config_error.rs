//! Definition-time configuration errors.

use thiserror::Error;

use crate::component::ComponentKind;

/// Errors in a client, resource or method declaration.
///
/// These are raised while a declaration is being frozen and indicate a
/// programmer error in the declaration itself. They are never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two siblings in the same scope registered under the same name.
    #[error("Duplicate {kind} '{name}' registered in '{scope}'")]
    DuplicateName {
        /// Registered name of the enclosing component.
        scope: String,
        /// Kind of the colliding children.
        kind: ComponentKind,
        /// The colliding registered name.
        name: String,
    },

    /// A child was registered under a component that cannot hold it.
    #[error("A {child} cannot be declared inside a {parent}")]
    InvalidNesting {
        /// Kind of the enclosing component.
        parent: ComponentKind,
        /// Kind of the rejected child.
        child: ComponentKind,
    },

    /// A component tried to derive from a component of another kind.
    #[error("Expected a {expected} base, got a {actual}")]
    KindMismatch {
        /// Kind of the deriving component.
        expected: ComponentKind,
        /// Kind of the offered base.
        actual: ComponentKind,
    },

    /// A declaration document or schema node could not be understood.
    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),

    /// A URL assembled from `baseurl` and the resource path failed to parse.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A metadata key the caller depends on resolved nowhere.
    #[error("Component '{component}' has no '{key}' metadata")]
    MissingMetadata {
        /// Registered name of the component.
        component: String,
        /// The unresolved metadata key.
        key: String,
    },

    /// A metadata value exists but has the wrong shape.
    #[error("Invalid '{key}' metadata: {message}")]
    InvalidMetadata {
        /// The offending metadata key.
        key: String,
        /// What was wrong with the value.
        message: String,
    },
}

impl ConfigError {
    /// Creates an invalid declaration error.
    pub fn invalid_declaration(message: impl Into<String>) -> Self {
        Self::InvalidDeclaration(message.into())
    }

    /// Creates a missing metadata error.
    pub fn missing_metadata(component: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingMetadata {
            component: component.into(),
            key: key.into(),
        }
    }

    /// Creates an invalid metadata error.
    pub fn invalid_metadata(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this error was caused by a name collision.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateName { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_name_display() {
        let err = ConfigError::DuplicateName {
            scope: "shop".to_string(),
            kind: ComponentKind::Resource,
            name: "products".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate resource 'products' registered in 'shop'"
        );
        assert!(err.is_duplicate());
    }

    #[test]
    fn test_invalid_nesting_display() {
        let err = ConfigError::InvalidNesting {
            parent: ComponentKind::Method,
            child: ComponentKind::Resource,
        };
        assert_eq!(err.to_string(), "A resource cannot be declared inside a method");
        assert!(!err.is_duplicate());
    }

    #[test]
    fn test_invalid_url() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err = ConfigError::from(url_err);
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_missing_metadata() {
        let err = ConfigError::missing_metadata("list", "baseurl");
        assert_eq!(err.to_string(), "Component 'list' has no 'baseurl' metadata");
    }
}
