//! Schematic Declarations
//!
//! Plain, serializable declarations of API clients and the drivers that turn
//! them into frozen [`schematic_engine`] components.
//!
//! A declaration carries no behaviour of its own. Drivers convert it into a
//! [`ComponentBuilder`](schematic_engine::ComponentBuilder), freeze the tree,
//! and register it in a [`Declarations`] scope where later clients can
//! extend earlier ones by name.
//!
//! ## Modules
//!
//! - [`decl`] - declaration types, loadable from YAML or JSON
//! - [`driver`] - conversion into components and payload schemas
//! - [`load`] - document loading
//! - [`catalog`] - a sample storefront API
//!
//! ## Examples
//!
//! ```
//! use schematic_declare::Declarations;
//!
//! let mut scope = Declarations::new();
//! scope
//!     .load_yaml(
//!         r#"
//! clients:
//!   - type: Notes
//!     base_url: https://notes.example.com
//!     resources:
//!       - type: Notes
//!         path: /notes
//!         methods:
//!           - type: Search
//!             payload:
//!               parameters:
//!                 q: { type: parameter, output: query, required: true }
//! "#,
//!     )
//!     .unwrap();
//!
//! let notes = scope.get("notes").unwrap().resource("notes").unwrap();
//! let search = notes.method("search").unwrap();
//! let arguments = serde_json::json!({"q": "todo"});
//! assert!(search.payload().unwrap().validate(arguments.as_object().unwrap()));
//! ```

pub mod catalog;
pub mod decl;
pub mod driver;
pub mod load;
pub mod prelude;

pub use decl::{
    ClientDecl, DeclarationDocument, MethodDecl, ParameterDecl, PayloadDecl, ResourceDecl,
};
pub use driver::{
    Declarations, client_builder, declare_client, declare_parameter, declare_payload,
    method_builder, resource_builder,
};
pub use load::{LoadError, load_client_json, load_client_yaml, parse_json, parse_yaml};
