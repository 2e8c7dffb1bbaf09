//! Declarative schema engine for API clients.
//!
//! This crate compiles API client declarations into frozen runtime values and
//! resolves call-time arguments into flat, wire-ready mappings. It performs no
//! I/O: transports consume the [`PreparedRequest`]s and payload mappings it
//! produces.
//!
//! ## Core Types
//!
//! ### Components
//!
//! - [`Component`] - A frozen client, resource or method with inherited metadata
//! - [`ComponentBuilder`] - Build-then-freeze declaration of a component tree
//! - [`ComponentKind`] - Client, Resource or Method
//! - [`Metadata`] - Ordered key/value configuration owned by one component
//! - [`Registry`] - Name-keyed child components
//! - [`RestMethod`] - HTTP verbs stored under `requestmethod`
//!
//! ### Parameter Schemas
//!
//! - [`Parameter`] - Leaf: one argument to one output key
//! - [`NestedParameter`] - Branch: a group addressed nested or dotted
//! - [`ParameterNode`] - Sum type over the two
//! - [`Payload`] - Dynamic nodes plus static overrides for one operation
//!
//! ## Examples
//!
//! ```
//! use schematic_engine::prelude::*;
//! use serde_json::json;
//!
//! let search = Payload::builder()
//!     .parameter("price", NestedParameter::new("price")
//!         .child("min", Parameter::new("price.gte"))
//!         .child("max", Parameter::new("price.lte")))
//!     .parameter("category", Parameter::new("cat"))
//!     .build();
//!
//! let client = ComponentBuilder::client("Shop")
//!     .base_url("https://shop.example.com")
//!     .with_resource(ComponentBuilder::resource("Products")
//!         .path("/products")
//!         .with_method(ComponentBuilder::method("Search").payload(search)))
//!     .build()
//!     .unwrap();
//!
//! let method = client.resource("products").unwrap().method("search").unwrap();
//! let args = json!({"price": {"min": 10, "max": 100}, "category": "shoes"});
//! let request = method.prepare(args.as_object().unwrap()).unwrap();
//!
//! assert_eq!(request.url.as_str(), "https://shop.example.com/products");
//! assert_eq!(
//!     json!(request.payload),
//!     json!({"price": {"price.gte": 10, "price.lte": 100}, "cat": "shoes"})
//! );
//! ```
//!
//! ## Concurrency
//!
//! Frozen components and payloads are immutable and `Send + Sync`; any number
//! of threads may map arguments through them concurrently. Every
//! [`Payload::map`] call allocates its own result.

pub mod component;
pub mod error;
pub mod metadata;
pub mod method;
pub mod parameter;
pub mod payload;
pub mod prelude;
pub mod request;

// Re-export main types at crate root
pub use component::{Component, ComponentBuilder, ComponentKind, Registry};
pub use error::{ConfigError, EngineError, ValidationError};
pub use metadata::Metadata;
pub use method::RestMethod;
pub use parameter::{Constraint, NestedParameter, ParamType, Parameter, ParameterNode};
pub use payload::{Payload, PayloadBuilder};
pub use request::PreparedRequest;
