//! Plain declarations of clients, resources, methods and parameters.
//!
//! These are inert descriptions: they carry no inheritance and no parent
//! links. The [drivers](crate::driver) turn them into frozen
//! [`Component`](schematic_engine::Component)s. Every type deserializes from
//! YAML or JSON documents.

use indexmap::IndexMap;
use schematic_engine::{Metadata, ParamType, RestMethod};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declaration of an API client.
///
/// ## Examples
///
/// ```
/// use schematic_declare::decl::{ClientDecl, ResourceDecl};
///
/// let shop = ClientDecl {
///     type_name: "Shop".to_string(),
///     base_url: Some("https://shop.example.com".to_string()),
///     resources: vec![ResourceDecl::new("Products").with_path("/products")],
///     ..Default::default()
/// };
/// assert_eq!(shop.resources.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientDecl {
    /// Declared type name; lowercased to form the default registered name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Explicit registered name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Names of already-declared clients this one derives from, nearest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    /// Base URL for every request issued through the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Free-form metadata. Explicit fields above win over the same keys here.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    /// Top-level resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceDecl>,
    /// Methods declared directly on the client.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodDecl>,
}

/// Declaration of a resource and its nested scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceDecl {
    /// Declared type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Explicit registered name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Path segment; defaults to the registered name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    /// Resources nested inside this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceDecl>,
    /// Methods of this resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodDecl>,
    /// Argument schema shared by methods that declare none of their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<PayloadDecl>,
}

impl ResourceDecl {
    /// Creates a resource declaration with only a type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /// Sets the path segment.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Adds a nested resource.
    pub fn with_resource(mut self, resource: ResourceDecl) -> Self {
        self.resources.push(resource);
        self
    }

    /// Adds a method.
    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

/// Declaration of a callable method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDecl {
    /// Declared type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Explicit registered name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Path suffix appended to the enclosing resource's path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// HTTP verb; `GET` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<RestMethod>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    /// Argument schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<PayloadDecl>,
}

impl MethodDecl {
    /// Creates a method declaration with a type name and verb.
    pub fn new(type_name: impl Into<String>, method: RestMethod) -> Self {
        Self {
            type_name: type_name.into(),
            method: Some(method),
            ..Default::default()
        }
    }

    /// Sets the path suffix.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the argument schema.
    pub fn with_payload(mut self, payload: PayloadDecl) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Declaration of a payload: named parameters plus static overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PayloadDecl {
    /// Dynamic parameters keyed by argument name, in declaration order.
    #[serde(default)]
    pub parameters: IndexMap<String, ParameterDecl>,
    /// Literal output values, keyed by output key.
    #[serde(default, rename = "static", skip_serializing_if = "Map::is_empty")]
    pub statics: Map<String, Value>,
}

impl PayloadDecl {
    /// Adds a parameter addressed by `key`.
    pub fn parameter(mut self, key: impl Into<String>, decl: ParameterDecl) -> Self {
        self.parameters.insert(key.into(), decl);
        self
    }

    /// Adds a static override.
    pub fn static_value(mut self, output_key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.statics.insert(output_key.into(), value.into());
        self
    }
}

/// Declaration of one schema node, tagged by `type`.
///
/// ```yaml
/// price:
///   type: nested
///   children:
///     min: { type: parameter, output: price.gte }
///     max: { type: parameter, output: price.lte }
/// ```
///
/// An unrecognised `type` fails to deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterDecl {
    /// A leaf parameter.
    Parameter {
        /// Output key; defaults to the argument key.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output: Option<String>,
        /// Whether the argument must be supplied.
        #[serde(default)]
        required: bool,
        /// Fallback for an optional argument.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<Value>,
        /// JSON type supplied values must have.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accepts: Option<ParamType>,
        /// Allowed values.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        choices: Vec<Value>,
    },
    /// A branch grouping child parameters.
    Nested {
        /// Output key of the nested object; defaults to the argument key.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output: Option<String>,
        /// Child nodes keyed by local name.
        #[serde(default)]
        children: IndexMap<String, ParameterDecl>,
    },
}

impl ParameterDecl {
    /// An optional leaf written under `output`.
    pub fn leaf(output: impl Into<String>) -> Self {
        Self::Parameter {
            output: Some(output.into()),
            required: false,
            default: None,
            accepts: None,
            choices: Vec::new(),
        }
    }

    /// An empty branch written under `output`.
    pub fn nested(output: impl Into<String>) -> Self {
        Self::Nested {
            output: Some(output.into()),
            children: IndexMap::new(),
        }
    }

    /// Adds a child to a branch. Leaves are returned unchanged.
    pub fn child(mut self, key: impl Into<String>, decl: ParameterDecl) -> Self {
        if let Self::Nested { children, .. } = &mut self {
            children.insert(key.into(), decl);
        }
        self
    }
}

/// A document holding several client declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationDocument {
    /// Clients in the order they are declared; later ones may extend earlier ones.
    #[serde(default)]
    pub clients: Vec<ClientDecl>,
}
