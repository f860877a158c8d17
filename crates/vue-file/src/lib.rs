//! Vue component files.
//!
//! This crate provides:
//! - [`ComponentFile`], which loads a component's sections and parses them
//!   into template, script, style and definition models on demand
//! - [`SectionStore`] with a file system and an in-memory implementation,
//!   covering single `.vue` files and `.vue` directories
//! - [`merge`], which grafts one component into another
//!
//! # Example
//!
//! ```
//! use vue_common::RenameCategory;
//! use vue_file::{ComponentFile, MergeTarget};
//!
//! let mut host = ComponentFile::from_source(
//!     "<template>\n    <div></div>\n</template>\n\n<script>\nexport default { data() { return { a: 1 }; } };\n</script>\n",
//! );
//! let fragment = ComponentFile::from_source(
//!     "<template>\n    <p>{{ a }}</p>\n</template>\n\n<script>\nexport default { data() { return { a: 2 }; } };\n</script>\n",
//! );
//! let outcome = vue_file::merge(&mut host, fragment, &MergeTarget::root()).expect("merge");
//! assert_eq!(
//!     outcome.renames.get(RenameCategory::Data).and_then(|m| m.get("a")),
//!     Some("a1")
//! );
//! assert!(host.generate().contains("{{ a1 }}"));
//! ```

mod error;
mod file;
mod merge;
mod section;
mod store;
mod tag;
mod target;

pub use error::{FileError, StoreError};
pub use file::{ComponentFile, FileState};
pub use merge::{merge, MergeOutcome};
pub use section::{compose, extract_block, SectionKind};
pub use store::{FsStore, Layout, MemoryStore, SectionStore};
pub use tag::resolve_tag_name;
pub use target::MergeTarget;
