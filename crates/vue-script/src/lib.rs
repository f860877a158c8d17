//! Script model for Vue components.
//!
//! This crate provides:
//! - Parsing and printing of component scripts through `swc`, comments kept
//! - Handles for the options object, imports, re-exports and variables
//! - The canonical order of component options
//! - Merging one component script into another with collision renames
//!
//! # Example
//!
//! ```
//! use vue_script::ScriptModel;
//!
//! let mut host = ScriptModel::parse("export default { data() { return { a: 1 }; } };\n")
//!     .expect("valid script");
//! let fragment = ScriptModel::parse("export default { data() { return { a: 2 }; } };\n")
//!     .expect("valid script");
//! let merge = host.merge(fragment);
//! assert_eq!(
//!     merge.renames.get(vue_common::RenameCategory::Data).and_then(|m| m.get("a")),
//!     Some("a1")
//! );
//! ```

mod declarations;
mod error;
mod merge;
mod model;
mod order;
mod rename;

pub use declarations::{
    prop_key, prop_name_text, property_value, ExportsHandle, FromsHandle, ImportsHandle,
    ObjectHandle, StatementList,
};
pub use error::ScriptError;
pub use merge::ScriptMerge;
pub use model::{ScriptModel, ScriptSyntax};
pub use order::{is_lifecycle_hook, option_rank, LIFECYCLE_HOOKS, OBJECT_OPTIONS};
