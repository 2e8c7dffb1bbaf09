//! HTTP verbs a method component can declare.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// HTTP verb stored under the `requestmethod` metadata key.
///
/// ## Examples
///
/// ```rust
/// use schematic_engine::RestMethod;
///
/// let method: RestMethod = "POST".parse().unwrap();
/// assert_eq!(method, RestMethod::Post);
/// assert!(method.has_body());
/// assert_eq!(RestMethod::Get.to_string(), "GET");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum RestMethod {
    /// HTTP GET - Retrieve a resource.
    #[default]
    Get,
    /// HTTP POST - Create a resource or trigger an action.
    Post,
    /// HTTP PUT - Replace a resource entirely.
    Put,
    /// HTTP PATCH - Partially update a resource.
    Patch,
    /// HTTP DELETE - Remove a resource.
    Delete,
    /// HTTP HEAD - Retrieve headers only.
    Head,
    /// HTTP OPTIONS - Query supported methods.
    Options,
}

impl RestMethod {
    /// Returns `true` if the mapped payload travels as a request body.
    ///
    /// For the other verbs calling layers usually encode it as a query string.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Returns `true` if repeating the call has the same effect as calling once.
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, Self::Post | Self::Patch)
    }
}
