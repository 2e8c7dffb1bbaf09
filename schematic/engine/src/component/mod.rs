//! Clients, resources and methods.
//!
//! A [`Component`] is a frozen declaration: its own [`Metadata`], a
//! materialised resolution chain of ancestors (nearest first) and registries
//! of child resources and methods. Components are built once through a
//! [`ComponentBuilder`] and shared as `Arc<Component>` afterwards; nothing
//! about a frozen component can change. "Changing" one means
//! [`redeclaring`](Component::redeclare) it, which yields a new value and
//! leaves every earlier reference untouched.

mod builder;
mod path;
mod registry;

pub use builder::ComponentBuilder;
pub use registry::Registry;

use path::Enclosing;

use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString};

use crate::error::{ConfigError, EngineError};
use crate::metadata::{self, Metadata};
use crate::method::RestMethod;
use crate::payload::Payload;
use crate::request::PreparedRequest;

/// The role a component plays in an API client.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ComponentKind {
    /// Root of an API client; owns the base URL.
    Client,
    /// One segment of a resource path.
    Resource,
    /// A callable operation.
    Method,
}

impl ComponentKind {
    /// Returns `true` if a component of this kind may register `child`.
    pub fn may_contain(&self, child: ComponentKind) -> bool {
        matches!(
            (self, child),
            (
                Self::Client | Self::Resource,
                Self::Resource | Self::Method
            )
        )
    }
}

/// A frozen client, resource or method declaration.
pub struct Component {
    kind: ComponentKind,
    type_name: String,
    name: String,
    metadata: Metadata,
    chain: Vec<Arc<Component>>,
    resources: Registry,
    methods: Registry,
    payload: Option<Arc<Payload>>,
    parent: Weak<Component>,
    path: String,
    outer: Enclosing,
}

impl core::fmt::Debug for Component {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Component")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .field(
                "chain",
                &self.chain.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("resources", &self.resources)
            .field("methods", &self.methods)
            .finish()
    }
}

/// Explicit `name` metadata, or the lowercased type name.
pub(crate) fn registered_name(type_name: &str, metadata: &Metadata) -> String {
    metadata
        .get(metadata::NAME)
        .and_then(Value::as_str)
        .map_or_else(|| type_name.to_lowercase(), str::to_string)
}

impl Component {
    /// The component's role.
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// The declared type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The name the component is registered under in its enclosing scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ancestors consulted by metadata lookups, nearest first.
    pub fn chain(&self) -> &[Arc<Component>] {
        &self.chain
    }

    /// The enclosing component, if it is still alive.
    pub fn parent(&self) -> Option<Arc<Component>> {
        self.parent.upgrade()
    }

    /// This component followed by its resolution chain.
    fn lineage(&self) -> impl Iterator<Item = &Component> {
        std::iter::once(self).chain(self.chain.iter().map(|ancestor| &**ancestor))
    }

    /// Resolves `key` through the component's own metadata, then its chain.
    ///
    /// ## Examples
    ///
    /// ```
    /// use schematic_engine::ComponentBuilder;
    /// use serde_json::json;
    ///
    /// let base = ComponentBuilder::client("Base")
    ///     .base_url("https://api.example.com")
    ///     .metadata("version", 1)
    ///     .build()
    ///     .unwrap();
    /// let derived = ComponentBuilder::client("Derived")
    ///     .derive_from(&base)
    ///     .metadata("version", 2)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(derived.get_metadata("version"), Some(&json!(2)));
    /// assert_eq!(derived.get_metadata("baseurl"), Some(&json!("https://api.example.com")));
    /// assert_eq!(derived.get_metadata("missing"), None);
    /// ```
    pub fn get_metadata(&self, key: &str) -> Option<&Value> {
        self.lineage().find_map(|component| component.metadata.get(key))
    }

    /// Like [`get_metadata`](Self::get_metadata), falling back to `default` on a miss.
    pub fn get_metadata_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get_metadata(key)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    /// Resolves `key` and returns it when it is a string.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.get_metadata(key).and_then(Value::as_str)
    }

    /// Resolves `key` through this component, then each enclosing component.
    ///
    /// Used for settings declared once on the client, such as `baseurl`. The
    /// enclosing scope is captured at freeze time and survives the enclosing
    /// components being dropped.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        self.get_metadata(key)
            .or_else(|| self.outer.lookup(key))
            .cloned()
    }

    /// Resources visible from this component: its own plus every ancestor's.
    ///
    /// On a name collision the entry closest to this component wins.
    pub fn resources(&self) -> Registry {
        self.merged(|component| &component.resources)
    }

    /// Methods visible from this component, merged like [`resources`](Self::resources).
    pub fn methods(&self) -> Registry {
        self.merged(|component| &component.methods)
    }

    /// Resources declared directly inside this component's own scope.
    pub fn nested_resources(&self) -> &Registry {
        &self.resources
    }

    /// Methods declared directly inside this component's own scope.
    pub fn own_methods(&self) -> &Registry {
        &self.methods
    }

    /// Looks up a visible resource by registered name.
    pub fn resource(&self, name: &str) -> Option<Arc<Component>> {
        self.find(name, |component| &component.resources)
    }

    /// Looks up a visible method by registered name.
    pub fn method(&self, name: &str) -> Option<Arc<Component>> {
        self.find(name, |component| &component.methods)
    }

    fn merged(&self, registry: impl Fn(&Component) -> &Registry) -> Registry {
        let mut merged = registry(self).clone();
        for ancestor in &self.chain {
            for (name, component) in registry(&**ancestor).iter() {
                merged.insert_missing(name, component);
            }
        }
        merged
    }

    fn find(
        &self,
        name: &str,
        registry: impl Fn(&Component) -> &Registry,
    ) -> Option<Arc<Component>> {
        self.lineage().find_map(|component| registry(component).get(name).cloned())
    }

    /// The argument schema, resolved through the chain.
    pub fn payload(&self) -> Option<&Payload> {
        self.lineage().find_map(|component| component.payload.as_deref())
    }

    /// The HTTP verb from `requestmethod` metadata, `GET` when unset.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidMetadata`] if the value is not a known verb.
    pub fn request_method(&self) -> Result<RestMethod, ConfigError> {
        match self.get_metadata(metadata::REQUEST_METHOD) {
            None => Ok(RestMethod::default()),
            Some(Value::String(verb)) => verb.parse().map_err(|_| {
                ConfigError::invalid_metadata(
                    metadata::REQUEST_METHOD,
                    format!("unknown verb '{verb}'"),
                )
            }),
            Some(other) => Err(ConfigError::invalid_metadata(
                metadata::REQUEST_METHOD,
                format!("expected a string, got {other}"),
            )),
        }
    }

    /// The path segments from the outermost resource down to this one.
    ///
    /// See [`path`] for the segment rules.
    pub fn full_path(&self) -> &str {
        &self.path
    }

    /// Maps `arguments` through this method's payload and assembles the
    /// request handed to the transport layer.
    ///
    /// ## Errors
    ///
    /// - [`ConfigError::KindMismatch`] unless called on a method.
    /// - [`ConfigError::MissingMetadata`] if no `baseurl` resolves.
    /// - [`ValidationError`](crate::ValidationError) from payload mapping or
    ///   an unfilled `{placeholder}`.
    pub fn prepare(&self, arguments: &Map<String, Value>) -> Result<PreparedRequest, EngineError> {
        if self.kind != ComponentKind::Method {
            return Err(ConfigError::KindMismatch {
                expected: ComponentKind::Method,
                actual: self.kind,
            }
            .into());
        }
        PreparedRequest::assemble(self, arguments)
    }

    /// Returns a new component with `overrides` merged into its own metadata.
    ///
    /// The resolution chain, children and payload are carried over; children
    /// are re-parented onto the new value so path composition follows the
    /// override. Existing references to `self` are unaffected, and applying
    /// the same overrides again yields an equivalent component.
    pub fn redeclare(&self, overrides: &Metadata) -> Arc<Component> {
        let mut metadata = self.metadata.clone();
        metadata.merge(overrides);
        tracing::debug!(
            kind = %self.kind,
            name = %self.name,
            keys = overrides.len(),
            "redeclared component"
        );
        self.refreeze(self.parent.clone(), &self.outer, metadata)
    }

    fn refreeze(
        &self,
        parent: Weak<Component>,
        outer: &Enclosing,
        metadata: Metadata,
    ) -> Arc<Component> {
        let name = registered_name(&self.type_name, &metadata);
        let (path, inner) = path::place(outer, self.kind, &name, &metadata, &self.chain);

        Arc::new_cyclic(|me| {
            let mut resources = Registry::new();
            for (_, child) in self.resources.iter() {
                resources.insert(child.refreeze(me.clone(), &inner, child.metadata.clone()));
            }
            let mut methods = Registry::new();
            for (_, child) in self.methods.iter() {
                methods.insert(child.refreeze(me.clone(), &inner, child.metadata.clone()));
            }

            Component {
                kind: self.kind,
                type_name: self.type_name.clone(),
                name,
                metadata,
                chain: self.chain.clone(),
                resources,
                methods,
                payload: self.payload.clone(),
                parent,
                path,
                outer: outer.clone(),
            }
        })
    }
}
