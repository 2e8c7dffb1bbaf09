//! Sample product catalog API.
//!
//! A small storefront API declared with the primitives of this crate. It is
//! used in documentation and tests and doubles as a template for new
//! definitions.
//!
//! ## Resources
//!
//! | Resource | Method | Verb | Path |
//! |----------|--------|------|------|
//! | products | list | GET | /products |
//! | products | get | GET | /products/{id} |
//! | products | create | POST | /products |
//! | products/reviews | list | GET | /products/{id}/reviews |
//! | categories | list | GET | /categories |
//!
//! The same definition is bundled as YAML in [`CATALOG_YAML`].

use std::sync::Arc;

use schematic_engine::{Component, ConfigError, ParamType, RestMethod};
use serde_json::json;

use crate::decl::{ClientDecl, MethodDecl, ParameterDecl, PayloadDecl, ResourceDecl};
use crate::driver::declare_client;

/// The catalog definition as a YAML document.
pub const CATALOG_YAML: &str = include_str!("catalog.yaml");

/// Base URL of the catalog API.
pub const CATALOG_BASE_URL: &str = "https://catalog.example.com/v1";

/// Creates the catalog API declaration.
///
/// ## Examples
///
/// ```rust
/// use schematic_declare::catalog::define_catalog_api;
///
/// let api = define_catalog_api();
/// assert_eq!(api.type_name, "Catalog");
/// assert_eq!(api.resources.len(), 2);
/// ```
pub fn define_catalog_api() -> ClientDecl {
    ClientDecl {
        type_name: "Catalog".to_string(),
        base_url: Some(CATALOG_BASE_URL.to_string()),
        resources: vec![products(), categories()],
        ..Default::default()
    }
}

/// Declares and freezes the catalog client.
///
/// ## Examples
///
/// ```rust
/// use schematic_declare::catalog::catalog_client;
/// use serde_json::json;
///
/// let catalog = catalog_client().unwrap();
/// let list = catalog.resource("products").unwrap().method("list").unwrap();
///
/// let arguments = json!({"price": {"max": 25.0}, "category": "lamps"});
/// let request = list.prepare(arguments.as_object().unwrap()).unwrap();
///
/// assert_eq!(request.url.as_str(), "https://catalog.example.com/v1/products");
/// assert_eq!(request.payload["price"], json!({"lte": 25.0}));
/// ```
pub fn catalog_client() -> Result<Arc<Component>, ConfigError> {
    declare_client(&define_catalog_api())
}

fn products() -> ResourceDecl {
    ResourceDecl::new("Products")
        .with_path("/products")
        .with_method(
            MethodDecl::new("List", RestMethod::Get).with_payload(
                PayloadDecl::default()
                    .parameter("page", typed("page", ParamType::Integer, Some(json!(1))))
                    .parameter(
                        "per_page",
                        typed("limit", ParamType::Integer, Some(json!(20))),
                    )
                    .parameter("category", typed("category", ParamType::String, None))
                    .parameter("price", price_range())
                    .parameter(
                        "sort",
                        ParameterDecl::Parameter {
                            output: Some("order_by".to_string()),
                            required: false,
                            default: Some(json!("newest")),
                            accepts: None,
                            choices: vec![json!("newest"), json!("price"), json!("name")],
                        },
                    )
                    .static_value("format", "json"),
            ),
        )
        .with_method(
            MethodDecl::new("Get", RestMethod::Get)
                .with_path("/{id}")
                .with_payload(
                    PayloadDecl::default()
                        .parameter("id", required("id", ParamType::Integer))
                        .parameter("expand", typed("expand", ParamType::String, None)),
                ),
        )
        .with_method(
            MethodDecl::new("Create", RestMethod::Post).with_payload(
                PayloadDecl::default()
                    .parameter("name", required("title", ParamType::String))
                    .parameter("price", required("unit_price", ParamType::Float))
                    .parameter("category", typed("category", ParamType::String, None))
                    .static_value("status", "draft"),
            ),
        )
        .with_resource(
            ResourceDecl::new("Reviews")
                .with_path("{id}/reviews")
                .with_method(
                    MethodDecl::new("List", RestMethod::Get).with_payload(
                        PayloadDecl::default()
                            .parameter("id", required("id", ParamType::Integer))
                            .parameter(
                                "rating",
                                ParameterDecl::nested("rating")
                                    .child("min", typed("gte", ParamType::Integer, None))
                                    .child("max", typed("lte", ParamType::Integer, None)),
                            ),
                    ),
                ),
        )
}

fn categories() -> ResourceDecl {
    ResourceDecl::new("Categories")
        .with_path("/categories")
        .with_method(MethodDecl::new("List", RestMethod::Get))
}

fn price_range() -> ParameterDecl {
    ParameterDecl::nested("price")
        .child("min", typed("gte", ParamType::Float, None))
        .child("max", typed("lte", ParamType::Float, None))
}

fn typed(output: &str, kind: ParamType, default: Option<serde_json::Value>) -> ParameterDecl {
    ParameterDecl::Parameter {
        output: Some(output.to_string()),
        required: false,
        default,
        accepts: Some(kind),
        choices: Vec::new(),
    }
}

fn required(output: &str, kind: ParamType) -> ParameterDecl {
    ParameterDecl::Parameter {
        output: Some(output.to_string()),
        required: true,
        default: None,
        accepts: Some(kind),
        choices: Vec::new(),
    }
}
