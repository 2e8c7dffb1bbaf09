//! Requests assembled from a method and its mapped arguments.
//!
//! This is the hand-off point to the transport layer: the engine resolves
//! the verb, URL and flat payload, and never performs I/O itself.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::component::Component;
use crate::error::{ConfigError, EngineError, ValidationError};
use crate::metadata;
use crate::method::RestMethod;

/// Everything but RFC 3986 unreserved characters is escaped inside a path value.
const PATH_VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A fully resolved request, ready for a transport to encode and send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedRequest {
    /// HTTP verb.
    pub method: RestMethod,
    /// Base URL joined with the substituted full path.
    pub url: Url,
    /// Mapped arguments left after filling path placeholders.
    pub payload: Map<String, Value>,
}

impl PreparedRequest {
    pub(crate) fn assemble(
        component: &Component,
        arguments: &Map<String, Value>,
    ) -> Result<Self, EngineError> {
        let method = component.request_method()?;
        let base_url = component
            .lookup(metadata::BASE_URL)
            .and_then(|value| value.as_str().map(str::to_string))
            .ok_or_else(|| ConfigError::missing_metadata(component.name(), metadata::BASE_URL))?;

        let mut payload = match component.payload() {
            Some(schema) => schema.map(arguments)?,
            None => Map::new(),
        };

        let path = substitute_placeholders(&component.full_path(), &mut payload)?;
        let url = Url::parse(&join_url(&base_url, &path)).map_err(ConfigError::from)?;

        tracing::debug!(%method, %url, fields = payload.len(), "prepared request");
        Ok(Self {
            method,
            url,
            payload,
        })
    }
}

/// Names inside `{...}` placeholders, in order of appearance.
pub fn placeholders(path: &str) -> Vec<&str> {
    path.split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}').map(|(name, _)| name))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Replaces each `{name}` in `path` with the mapped value, removing it from `payload`.
///
/// Values are percent-encoded so each stays within its own path segment; a
/// value of `.` or `..` is rejected.
fn substitute_placeholders(
    path: &str,
    payload: &mut Map<String, Value>,
) -> Result<String, ValidationError> {
    let mut resolved = path.to_string();
    for name in placeholders(path) {
        let token = format!("{{{name}}}");
        if !resolved.contains(&token) {
            continue;
        }
        let value = payload
            .remove(name)
            .ok_or_else(|| ValidationError::MissingPathParam {
                name: name.to_string(),
            })?;
        let text = match value {
            Value::String(text) => text,
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            _ => {
                return Err(ValidationError::constraint(
                    name,
                    "path parameters must be strings, numbers or booleans",
                ));
            }
        };
        if text == "." || text == ".." {
            return Err(ValidationError::constraint(
                name,
                "path parameters cannot be '.' or '..'",
            ));
        }
        let encoded = utf8_percent_encode(&text, PATH_VALUE_ENCODE_SET).to_string();
        resolved = resolved.replace(&token, &encoded);
    }
    Ok(resolved)
}

fn join_url(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), path)
    }
}
