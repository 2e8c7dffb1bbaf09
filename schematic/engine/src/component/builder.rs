//! Build-then-freeze construction of component trees.

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use serde_json::Value;

use super::path::{self, Enclosing};
use super::{Component, ComponentKind, Registry, registered_name};
use crate::error::ConfigError;
use crate::metadata::{self, Metadata};
use crate::method::RestMethod;
use crate::payload::Payload;

/// Mutable declaration of a component, frozen by [`build`](Self::build).
///
/// Children are declared inside their parent's builder and are frozen
/// together with it, so every child receives a back-reference to its frozen
/// parent. Bases passed to [`derive_from`](Self::derive_from) must already
/// be frozen.
///
/// ## Examples
///
/// ```
/// use schematic_engine::{ComponentBuilder, RestMethod};
///
/// let client = ComponentBuilder::client("Shop")
///     .base_url("https://shop.example.com/api")
///     .with_resource(
///         ComponentBuilder::resource("Products")
///             .with_method(ComponentBuilder::method("List").request_method(RestMethod::Get)),
///     )
///     .build()
///     .unwrap();
///
/// let products = client.resource("products").unwrap();
/// assert_eq!(products.full_path(), "products");
/// assert!(products.method("list").is_some());
/// ```
#[derive(Debug)]
pub struct ComponentBuilder {
    kind: ComponentKind,
    type_name: String,
    metadata: Metadata,
    bases: Vec<Arc<Component>>,
    resources: Vec<ComponentBuilder>,
    methods: Vec<ComponentBuilder>,
    payload: Option<Payload>,
}

impl ComponentBuilder {
    /// Starts a declaration of `kind` named after `type_name`.
    pub fn new(kind: ComponentKind, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
            metadata: Metadata::new(),
            bases: Vec::new(),
            resources: Vec::new(),
            methods: Vec::new(),
            payload: None,
        }
    }

    /// Starts a client declaration.
    pub fn client(type_name: impl Into<String>) -> Self {
        Self::new(ComponentKind::Client, type_name)
    }

    /// Starts a resource declaration.
    pub fn resource(type_name: impl Into<String>) -> Self {
        Self::new(ComponentKind::Resource, type_name)
    }

    /// Starts a method declaration.
    pub fn method(type_name: impl Into<String>) -> Self {
        Self::new(ComponentKind::Method, type_name)
    }

    /// Writes a metadata entry, replacing any earlier value.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.set(key, value);
    }

    /// Chaining form of [`set_metadata`](Self::set_metadata).
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_metadata(key, value);
        self
    }

    /// Merges a whole metadata map, incoming values winning.
    pub fn merge_metadata(mut self, entries: &Metadata) -> Self {
        self.metadata.merge(entries);
        self
    }

    /// Registers the component under `name` instead of its lowercased type name.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.metadata(metadata::NAME, name.into())
    }

    /// Sets the path segment (resources) or suffix (methods).
    pub fn path(self, path: impl Into<String>) -> Self {
        self.metadata(metadata::PATH, path.into())
    }

    /// Sets the base URL requests are issued against.
    pub fn base_url(self, url: impl Into<String>) -> Self {
        self.metadata(metadata::BASE_URL, url.into())
    }

    /// Sets the HTTP verb.
    pub fn request_method(self, method: RestMethod) -> Self {
        self.metadata(metadata::REQUEST_METHOD, method.to_string())
    }

    /// Appends `base` to the resolution chain.
    ///
    /// Bases are consulted in the order they are added, each followed by its
    /// own chain; a component reachable twice is only consulted once.
    pub fn derive_from(mut self, base: &Arc<Component>) -> Self {
        self.bases.push(Arc::clone(base));
        self
    }

    /// Declares a nested resource.
    pub fn with_resource(mut self, resource: ComponentBuilder) -> Self {
        self.resources.push(resource);
        self
    }

    /// Declares a method.
    pub fn with_method(mut self, method: ComponentBuilder) -> Self {
        self.methods.push(method);
        self
    }

    /// Attaches the argument schema.
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Kind being declared.
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Name the component will be registered under.
    pub fn registered_name(&self) -> String {
        registered_name(&self.type_name, &self.metadata)
    }

    /// Validates the whole declaration tree and freezes it.
    ///
    /// ## Errors
    ///
    /// - [`ConfigError::DuplicateName`] if two sibling resources (or two
    ///   sibling methods) share a registered name.
    /// - [`ConfigError::InvalidNesting`] if a child is declared where its kind
    ///   is not allowed.
    /// - [`ConfigError::KindMismatch`] if a base is of a different kind.
    pub fn build(self) -> Result<Arc<Component>, ConfigError> {
        self.check()?;
        Ok(self.freeze(Weak::new(), &Enclosing::default()))
    }

    fn check(&self) -> Result<(), ConfigError> {
        if let Some(base) = self.bases.iter().find(|base| base.kind() != self.kind) {
            return Err(ConfigError::KindMismatch {
                expected: self.kind,
                actual: base.kind(),
            });
        }

        let scope = self.registered_name();
        for children in [&self.resources, &self.methods] {
            let mut seen = HashSet::new();
            for child in children {
                if !self.kind.may_contain(child.kind) {
                    return Err(ConfigError::InvalidNesting {
                        parent: self.kind,
                        child: child.kind,
                    });
                }
                let name = child.registered_name();
                if !seen.insert(name.clone()) {
                    return Err(ConfigError::DuplicateName {
                        scope,
                        kind: child.kind,
                        name,
                    });
                }
                child.check()?;
            }
        }
        Ok(())
    }

    fn freeze(self, parent: Weak<Component>, outer: &Enclosing) -> Arc<Component> {
        let name = self.registered_name();
        let chain = linearize(&self.bases);
        let (path, inner) = path::place(outer, self.kind, &name, &self.metadata, &chain);
        tracing::debug!(
            kind = %self.kind,
            name = %name,
            chain = chain.len(),
            resources = self.resources.len(),
            methods = self.methods.len(),
            "froze component"
        );

        let ComponentBuilder {
            kind,
            type_name,
            metadata,
            resources,
            methods,
            payload,
            ..
        } = self;

        Arc::new_cyclic(|me| {
            let mut resource_registry = Registry::new();
            for child in resources {
                resource_registry.insert(child.freeze(me.clone(), &inner));
            }
            let mut method_registry = Registry::new();
            for child in methods {
                method_registry.insert(child.freeze(me.clone(), &inner));
            }

            Component {
                kind,
                type_name,
                name,
                metadata,
                chain,
                resources: resource_registry,
                methods: method_registry,
                payload: payload.map(Arc::new),
                parent,
                path,
                outer: outer.clone(),
            }
        })
    }
}

/// Flattens bases into a resolution chain, nearest first, without repeats.
fn linearize(bases: &[Arc<Component>]) -> Vec<Arc<Component>> {
    let mut chain: Vec<Arc<Component>> = Vec::new();
    for base in bases {
        for candidate in std::iter::once(base).chain(base.chain()) {
            if !chain.iter().any(|known| Arc::ptr_eq(known, candidate)) {
                chain.push(Arc::clone(candidate));
            }
        }
    }
    chain
}
