//! Loading declarations from YAML and JSON documents.

use std::sync::Arc;

use schematic_engine::{Component, ConfigError};
use thiserror::Error;
use tracing::debug;

use crate::decl::{ClientDecl, DeclarationDocument};
use crate::driver::{Declarations, declare_client};

/// Errors raised while loading a declaration document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document is not valid YAML, or does not match the declaration shape.
    #[error("YAML declaration could not be parsed: {0}")]
    InvalidYaml(String),

    /// The document is not valid JSON, or does not match the declaration shape.
    #[error("JSON declaration could not be parsed: {0}")]
    InvalidJson(String),

    /// The document parsed but its declarations could not be frozen.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<serde_yaml::Error> for LoadError {
    fn from(err: serde_yaml::Error) -> Self {
        LoadError::InvalidYaml(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::InvalidJson(err.to_string())
    }
}

/// Parses a YAML document holding a `clients` list.
pub fn parse_yaml(document: &str) -> Result<DeclarationDocument, LoadError> {
    Ok(serde_yaml::from_str(document)?)
}

/// Parses a JSON document holding a `clients` list.
pub fn parse_json(document: &str) -> Result<DeclarationDocument, LoadError> {
    Ok(serde_json::from_str(document)?)
}

/// Parses and freezes a YAML document holding a single client declaration.
///
/// ## Examples
///
/// ```
/// use schematic_declare::load_client_yaml;
///
/// let client = load_client_yaml(
///     r#"
/// type: Weather
/// base_url: https://weather.example.com
/// resources:
///   - type: Forecast
///     path: /forecast
///     methods:
///       - type: Daily
///         method: GET
/// "#,
/// )
/// .unwrap();
///
/// let daily = client.resource("forecast").unwrap().method("daily").unwrap();
/// assert_eq!(daily.full_path(), "/forecast");
/// ```
pub fn load_client_yaml(document: &str) -> Result<Arc<Component>, LoadError> {
    let decl: ClientDecl = serde_yaml::from_str(document)?;
    Ok(declare_client(&decl)?)
}

/// Parses and freezes a JSON document holding a single client declaration.
pub fn load_client_json(document: &str) -> Result<Arc<Component>, LoadError> {
    let decl: ClientDecl = serde_json::from_str(document)?;
    Ok(declare_client(&decl)?)
}

impl Declarations {
    /// Declares every client of a YAML document, in order.
    ///
    /// Either every client is registered or none is.
    pub fn load_yaml(&mut self, document: &str) -> Result<Vec<Arc<Component>>, LoadError> {
        let document = parse_yaml(document)?;
        self.load_document(&document)
    }

    /// Declares every client of a JSON document, in order.
    ///
    /// Either every client is registered or none is.
    pub fn load_json(&mut self, document: &str) -> Result<Vec<Arc<Component>>, LoadError> {
        let document = parse_json(document)?;
        self.load_document(&document)
    }

    /// Declares every client of a parsed document, in order.
    pub fn load_document(
        &mut self,
        document: &DeclarationDocument,
    ) -> Result<Vec<Arc<Component>>, LoadError> {
        let mut staged = self.clone();
        let clients = document
            .clients
            .iter()
            .map(|decl| staged.declare(decl))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = clients.len(), "loaded declaration document");
        *self = staged;
        Ok(clients)
    }
}
