//! Drivers converting declarations into frozen components.
//!
//! Each driver is a pure function of its declaration. [`Declarations`] adds
//! a named scope so client declarations can derive from clients declared
//! earlier.

use std::sync::Arc;

use indexmap::IndexMap;
use schematic_engine::{
    Component, ComponentBuilder, ComponentKind, ConfigError, Constraint, Metadata,
    NestedParameter, Parameter, ParameterNode, Payload,
};
use tracing::debug;

use crate::decl::{ClientDecl, MethodDecl, ParameterDecl, PayloadDecl, ResourceDecl};

const SCOPE: &str = "declarations";

/// Converts a parameter declaration into a schema node.
///
/// `key` is the argument key the node is registered under; it doubles as the
/// output key when the declaration names none.
pub fn declare_parameter(key: &str, decl: &ParameterDecl) -> ParameterNode {
    match decl {
        ParameterDecl::Parameter {
            output,
            required,
            default,
            accepts,
            choices,
        } => {
            let mut parameter = Parameter::new(output.as_deref().unwrap_or(key));
            if *required {
                parameter = parameter.required();
            }
            if let Some(value) = default {
                parameter = parameter.with_default(value.clone());
            }
            parameter
                .with_constraint(Constraint {
                    kind: *accepts,
                    choices: choices.clone(),
                })
                .into()
        }
        ParameterDecl::Nested { output, children } => children
            .iter()
            .fold(
                NestedParameter::new(output.as_deref().unwrap_or(key)),
                |nested, (child_key, child)| {
                    nested.child(child_key.as_str(), declare_parameter(child_key, child))
                },
            )
            .into(),
    }
}

/// Converts a payload declaration.
pub fn declare_payload(decl: &PayloadDecl) -> Payload {
    decl.parameters
        .iter()
        .fold(Payload::builder(), |builder, (key, parameter)| {
            builder.parameter(key.as_str(), declare_parameter(key, parameter))
        })
        .statics(decl.statics.clone())
        .build()
}

/// Converts a method declaration into an unfrozen builder.
pub fn method_builder(decl: &MethodDecl) -> ComponentBuilder {
    let mut builder = with_common(
        ComponentBuilder::method(&decl.type_name),
        &decl.metadata,
        decl.name.as_deref(),
    );
    if let Some(path) = &decl.path {
        builder = builder.path(path);
    }
    if let Some(method) = decl.method {
        builder = builder.request_method(method);
    }
    if let Some(payload) = &decl.payload {
        builder = builder.payload(declare_payload(payload));
    }
    builder
}

/// Converts a resource declaration, nested scope included, into an unfrozen builder.
pub fn resource_builder(decl: &ResourceDecl) -> ComponentBuilder {
    let mut builder = with_common(
        ComponentBuilder::resource(&decl.type_name),
        &decl.metadata,
        decl.name.as_deref(),
    );
    if let Some(path) = &decl.path {
        builder = builder.path(path);
    }
    if let Some(payload) = &decl.payload {
        builder = builder.payload(declare_payload(payload));
    }
    with_children(builder, &decl.resources, &decl.methods)
}

/// Converts a client declaration into an unfrozen builder.
///
/// `extends` is not resolved here; use [`Declarations::declare`] or call
/// [`ComponentBuilder::derive_from`] on the result.
pub fn client_builder(decl: &ClientDecl) -> ComponentBuilder {
    let mut builder = with_common(
        ComponentBuilder::client(&decl.type_name),
        &decl.metadata,
        decl.name.as_deref(),
    );
    if let Some(url) = &decl.base_url {
        builder = builder.base_url(url);
    }
    with_children(builder, &decl.resources, &decl.methods)
}

/// Converts and freezes a client declaration that extends nothing.
///
/// ## Errors
///
/// Returns the [`ConfigError`] raised while freezing, or
/// [`ConfigError::InvalidDeclaration`] if the declaration names bases.
pub fn declare_client(decl: &ClientDecl) -> Result<Arc<Component>, ConfigError> {
    if let Some(base) = decl.extends.first() {
        return Err(ConfigError::invalid_declaration(format!(
            "client '{}' extends '{base}', which needs a declaration scope",
            decl.type_name
        )));
    }
    client_builder(decl).build()
}

fn with_common(
    mut builder: ComponentBuilder,
    metadata: &Metadata,
    name: Option<&str>,
) -> ComponentBuilder {
    builder = builder.merge_metadata(metadata);
    if let Some(name) = name {
        builder = builder.name(name);
    }
    builder
}

fn with_children(
    builder: ComponentBuilder,
    resources: &[ResourceDecl],
    methods: &[MethodDecl],
) -> ComponentBuilder {
    let builder = resources
        .iter()
        .fold(builder, |builder, resource| builder.with_resource(resource_builder(resource)));
    methods
        .iter()
        .fold(builder, |builder, method| builder.with_method(method_builder(method)))
}

/// A named scope of declared clients.
///
/// Clients are registered under their registered name. A later declaration
/// may derive from any earlier one through `extends`.
///
/// ## Examples
///
/// ```
/// use schematic_declare::decl::{ClientDecl, ResourceDecl};
/// use schematic_declare::Declarations;
///
/// let mut scope = Declarations::new();
/// scope
///     .declare(&ClientDecl {
///         type_name: "Base".to_string(),
///         base_url: Some("https://api.example.com".to_string()),
///         resources: vec![ResourceDecl::new("Health")],
///         ..Default::default()
///     })
///     .unwrap();
///
/// let shop = scope
///     .declare(&ClientDecl {
///         type_name: "Shop".to_string(),
///         extends: vec!["base".to_string()],
///         resources: vec![ResourceDecl::new("Products")],
///         ..Default::default()
///     })
///     .unwrap();
///
/// assert_eq!(shop.resources().names(), vec!["products", "health"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    clients: IndexMap<String, Arc<Component>>,
}

impl Declarations {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts, freezes and registers a client declaration.
    ///
    /// ## Errors
    ///
    /// - [`ConfigError::InvalidDeclaration`] if an `extends` entry names no
    ///   declared client
    /// - [`ConfigError::DuplicateName`] if the registered name is taken
    /// - any error raised while freezing the tree
    pub fn declare(&mut self, decl: &ClientDecl) -> Result<Arc<Component>, ConfigError> {
        let mut builder = client_builder(decl);
        for base in &decl.extends {
            let base = self.clients.get(base).ok_or_else(|| {
                ConfigError::invalid_declaration(format!(
                    "client '{}' extends unknown client '{base}'",
                    decl.type_name
                ))
            })?;
            builder = builder.derive_from(base);
        }

        let name = builder.registered_name();
        if self.clients.contains_key(&name) {
            return Err(ConfigError::DuplicateName {
                scope: SCOPE.to_string(),
                kind: ComponentKind::Client,
                name,
            });
        }

        let client = builder.build()?;
        debug!(client = %name, bases = decl.extends.len(), "declared client");
        self.clients.insert(name, Arc::clone(&client));
        Ok(client)
    }

    /// Applies metadata overrides to a declared client.
    ///
    /// The registered entry is replaced; handles obtained earlier keep
    /// observing the previous value. Clients already derived from the old
    /// value are not rebuilt. An override of `name` moves the entry to the new
    /// registered name, keeping its position.
    ///
    /// ## Errors
    ///
    /// - [`ConfigError::InvalidDeclaration`] if no client is registered under
    ///   `name`
    /// - [`ConfigError::DuplicateName`] if the new registered name belongs to
    ///   another client
    pub fn redeclare(
        &mut self,
        name: &str,
        overrides: &Metadata,
    ) -> Result<Arc<Component>, ConfigError> {
        let index = self.clients.get_index_of(name).ok_or_else(|| {
            ConfigError::invalid_declaration(format!("no client '{name}' to redeclare"))
        })?;
        let updated = self.clients[index].redeclare(overrides);
        let renamed = updated.name().to_string();

        if renamed != name {
            if self.clients.contains_key(&renamed) {
                return Err(ConfigError::DuplicateName {
                    scope: SCOPE.to_string(),
                    kind: ComponentKind::Client,
                    name: renamed,
                });
            }
            self.clients.shift_remove_index(index);
            self.clients
                .shift_insert(index, renamed.clone(), Arc::clone(&updated));
        } else {
            self.clients[index] = Arc::clone(&updated);
        }

        debug!(client = %renamed, previous = %name, keys = overrides.len(), "redeclared client");
        Ok(updated)
    }

    /// Returns the client registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<Component>> {
        self.clients.get(name)
    }

    /// Registered names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.clients.keys().map(String::as_str).collect()
    }

    /// Number of declared clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schematic_engine::RestMethod;
    use serde_json::{Map, Value, json};

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("arguments must be an object"),
        }
    }

    fn price_decl() -> ParameterDecl {
        ParameterDecl::nested("price")
            .child("min", ParameterDecl::leaf("gte"))
            .child("max", ParameterDecl::leaf("lte"))
    }

    #[test]
    fn leaf_output_key_defaults_to_argument_key() {
        let decl = ParameterDecl::Parameter {
            output: None,
            required: false,
            default: None,
            accepts: None,
            choices: Vec::new(),
        };
        assert_eq!(declare_parameter("q", &decl).output_key(), "q");
    }

    #[test]
    fn declared_branch_maps_both_notations() {
        let payload = declare_payload(&PayloadDecl::default().parameter("price", price_decl()));

        let dotted = payload.map(&args(json!({"price.min": 1}))).unwrap();
        let nested = payload.map(&args(json!({"price": {"min": 1}}))).unwrap();
        assert_eq!(Value::Object(dotted), json!({"gte": 1}));
        assert_eq!(Value::Object(nested), json!({"price": {"gte": 1}}));
    }

    #[test]
    fn declared_constraints_are_enforced() {
        let decl = ParameterDecl::Parameter {
            output: Some("sort".into()),
            required: true,
            default: None,
            accepts: None,
            choices: vec![json!("asc"), json!("desc")],
        };
        let payload = declare_payload(&PayloadDecl::default().parameter("order", decl));

        assert!(payload.validate(&args(json!({"order": "asc"}))));
        assert!(!payload.validate(&args(json!({"order": "random"}))));
        assert!(!payload.validate(&Map::new()));
    }

    #[test]
    fn statics_are_carried_over() {
        let payload = declare_payload(&PayloadDecl::default().static_value("format", "json"));
        assert_eq!(
            Value::Object(payload.map(&Map::new()).unwrap()),
            json!({"format": "json"})
        );
    }

    #[test]
    fn explicit_fields_win_over_metadata() {
        let mut metadata = Metadata::new();
        metadata.set("path", "/ignored");
        let client = declare_client(&ClientDecl {
            type_name: "Shop".into(),
            base_url: Some("https://shop.example.com".into()),
            resources: vec![ResourceDecl {
                metadata,
                ..ResourceDecl::new("Products").with_path("/products")
            }],
            ..Default::default()
        })
        .unwrap();

        let products = client.resource("products").unwrap();
        assert_eq!(products.full_path(), "/products");
    }

    #[test]
    fn methods_keep_their_verb() {
        let client = declare_client(&ClientDecl {
            type_name: "Shop".into(),
            resources: vec![
                ResourceDecl::new("Products")
                    .with_method(MethodDecl::new("Create", RestMethod::Post)),
            ],
            ..Default::default()
        })
        .unwrap();

        let create = client.resource("products").unwrap().method("create").unwrap();
        assert_eq!(create.request_method().unwrap(), RestMethod::Post);
    }

    #[test]
    fn declare_client_rejects_bases() {
        let err = declare_client(&ClientDecl {
            type_name: "Shop".into(),
            extends: vec!["base".into()],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDeclaration(_)));
    }

    #[test]
    fn scope_rejects_unknown_base() {
        let mut scope = Declarations::new();
        let err = scope
            .declare(&ClientDecl {
                type_name: "Shop".into(),
                extends: vec!["missing".into()],
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.to_string().contains("unknown client 'missing'"));
        assert!(scope.is_empty());
    }

    #[test]
    fn scope_rejects_duplicate_client() {
        let mut scope = Declarations::new();
        let decl = ClientDecl {
            type_name: "Shop".into(),
            ..Default::default()
        };
        scope.declare(&decl).unwrap();

        let err = scope.declare(&decl).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn redeclare_replaces_entry_only() {
        let mut scope = Declarations::new();
        let original = scope
            .declare(&ClientDecl {
                type_name: "Shop".into(),
                base_url: Some("https://a.example.com".into()),
                ..Default::default()
            })
            .unwrap();

        let mut overrides = Metadata::new();
        overrides.set("baseurl", "https://b.example.com");
        let updated = scope.redeclare("shop", &overrides).unwrap();

        assert_eq!(original.metadata_str("baseurl"), Some("https://a.example.com"));
        assert_eq!(updated.metadata_str("baseurl"), Some("https://b.example.com"));
        assert!(Arc::ptr_eq(scope.get("shop").unwrap(), &updated));
    }

    #[test]
    fn redeclare_unknown_client_fails() {
        let mut scope = Declarations::new();
        assert!(scope.redeclare("ghost", &Metadata::new()).is_err());
    }

    #[test]
    fn redeclare_with_new_name_rekeys_entry() {
        let mut scope = Declarations::new();
        for type_name in ["Shop", "Blog"] {
            scope
                .declare(&ClientDecl {
                    type_name: type_name.into(),
                    ..Default::default()
                })
                .unwrap();
        }

        let mut overrides = Metadata::new();
        overrides.set("name", "store");
        let store = scope.redeclare("shop", &overrides).unwrap();

        assert_eq!(store.name(), "store");
        assert_eq!(scope.names(), vec!["store", "blog"]);
        assert!(scope.get("shop").is_none());
        assert!(Arc::ptr_eq(scope.get("store").unwrap(), &store));
    }

    #[test]
    fn redeclare_onto_taken_name_fails() {
        let mut scope = Declarations::new();
        for type_name in ["Shop", "Blog"] {
            scope
                .declare(&ClientDecl {
                    type_name: type_name.into(),
                    ..Default::default()
                })
                .unwrap();
        }

        let mut overrides = Metadata::new();
        overrides.set("name", "blog");
        let err = scope.redeclare("shop", &overrides).unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(scope.names(), vec!["shop", "blog"]);
        assert_eq!(scope.get("blog").unwrap().type_name(), "Blog");
    }
}
