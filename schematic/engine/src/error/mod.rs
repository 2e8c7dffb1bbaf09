//! Layered error types for the schema engine.
//!
//! The hierarchy follows the two phases a declaration goes through:
//! - [`EngineError`] - Top-level error type wrapping both phases
//! - [`ConfigError`] - Definition-time errors (fatal to the declaring scope)
//! - [`ValidationError`] - Call-time errors raised while mapping arguments
//!
//! A metadata key that resolves nowhere is not an error; lookups return the
//! caller-supplied default instead.

mod config_error;
mod engine_error;
mod validation_error;

pub use config_error::ConfigError;
pub use engine_error::EngineError;
pub use validation_error::ValidationError;
