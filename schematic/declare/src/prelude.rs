//! Convenience re-exports for declaring API clients.
//!
//! ```
//! use schematic_declare::prelude::*;
//!
//! let client = declare_client(&ClientDecl {
//!     type_name: "Status".to_string(),
//!     resources: vec![ResourceDecl::new("Health").with_path("/health")],
//!     ..Default::default()
//! })
//! .unwrap();
//! assert_eq!(client.resource("health").unwrap().full_path(), "/health");
//! ```

pub use crate::decl::{ClientDecl, MethodDecl, ParameterDecl, PayloadDecl, ResourceDecl};
pub use crate::driver::{Declarations, declare_client, declare_payload};
pub use crate::load::LoadError;
pub use schematic_engine::prelude::*;
