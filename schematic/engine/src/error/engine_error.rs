//! Top-level engine error type.

use super::{ConfigError, ValidationError};
use thiserror::Error;

/// Top-level error type for engine operations that span both phases.
///
/// ## Examples
///
/// ```rust,ignore
/// use schematic_engine::EngineError;
///
/// fn report(err: EngineError) {
///     match err {
///         EngineError::Config(e) => eprintln!("Bad declaration: {e}"),
///         EngineError::Validation(e) => eprintln!("Bad arguments: {e}"),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Definition-time configuration errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Call-time argument validation errors.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_validation_error() {
        let err: EngineError = ValidationError::missing("query").into();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(err.to_string(), "Missing required parameter: query");
    }

    #[test]
    fn test_from_config_error() {
        let err: EngineError = ConfigError::invalid_declaration("unknown node type").into();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
