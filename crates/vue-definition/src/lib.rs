//! Definition model for Vue components.
//!
//! A definition (`definition.json`) lists a component's params,
//! variables, lifecycle bindings and logic trees. This crate reads it into
//! typed entries that keep every unknown field, walks logic trees by node
//! kind, and merges one definition into another.
//!
//! # Example
//!
//! ```
//! use vue_common::RenameCategory;
//! use vue_definition::DefinitionModel;
//!
//! let mut host = DefinitionModel::parse(r#"{ "params": [{ "name": "value" }] }"#)
//!     .expect("valid definition");
//! let fragment = DefinitionModel::parse(r#"{ "variables": [{ "name": "value" }] }"#)
//!     .expect("valid definition");
//! let renames = host.merge(fragment);
//! assert_eq!(
//!     renames.get(RenameCategory::DefinitionData).and_then(|m| m.get("value")),
//!     Some("value1")
//! );
//! ```

mod error;
mod logic;
mod merge;
mod model;

pub use error::DefinitionError;
pub use logic::{LogicNode, LogicObject, NodeKind};
pub use model::{Definition, DefinitionModel, NamedEntry};
