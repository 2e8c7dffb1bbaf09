//! Convenient re-exports for declaring and calling API clients.
//!
//! ```
//! use schematic_engine::prelude::*;
//!
//! let method = ComponentBuilder::method("List").request_method(RestMethod::Get);
//! assert_eq!(method.registered_name(), "list");
//! ```

pub use crate::component::{Component, ComponentBuilder, ComponentKind, Registry};
pub use crate::error::{ConfigError, EngineError, ValidationError};
pub use crate::metadata::Metadata;
pub use crate::method::RestMethod;
pub use crate::parameter::{Constraint, NestedParameter, ParamType, Parameter, ParameterNode};
pub use crate::payload::{Payload, PayloadBuilder};
pub use crate::request::PreparedRequest;
