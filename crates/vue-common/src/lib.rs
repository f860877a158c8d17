//! Shared building blocks for the Vue component kit.
//!
//! - [`unique_name`] and [`NameScope`] for collision-free renaming
//! - [`RenameMap`] / [`RenameBundle`] for reporting renames per namespace
//! - [`MergeWarning`] for non-fatal merge outcomes
//! - [`Span`], [`Position`] and [`LineIndex`] for source locations

mod case;
mod naming;
mod position;
mod rename;
mod span;
mod warning;

pub use case::{camel_to_kebab, kebab_to_camel};
pub use naming::{unique_name, NameScope, NameSet};
pub use position::{LineIndex, Position};
pub use rename::{
    RenameBundle, RenameCategory, RenameMap, INSTANCE_CATEGORIES, TEMPLATE_CATEGORIES,
};
pub use span::{ByteOffset, Span};
pub use warning::MergeWarning;
