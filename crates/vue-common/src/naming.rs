//! Collision-free name allocation.
//!
//! Every merge phase renames a fragment identifier only when it collides
//! with a name the host already uses. The replacement keeps the original
//! stem and bumps (or appends) a trailing decimal counter:
//!
//! | candidate | taken             | result  |
//! |-----------|-------------------|---------|
//! | `a`       | `{}`              | `a`     |
//! | `a`       | `{a}`             | `a1`    |
//! | `a`       | `{a, a1}`         | `a2`    |
//! | `item9`   | `{item9}`         | `item10`|

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;
use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;

/// Anything that can answer "is this name already used?".
pub trait NameSet {
    /// Returns true if `name` is already taken.
    fn contains_name(&self, name: &str) -> bool;
}

impl<S: BuildHasher> NameSet for HashSet<String, S> {
    fn contains_name(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl NameSet for BTreeSet<String> {
    fn contains_name(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<S: BuildHasher> NameSet for IndexSet<String, S> {
    fn contains_name(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<V, S: BuildHasher> NameSet for IndexMap<String, V, S> {
    fn contains_name(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl NameSet for [&str] {
    fn contains_name(&self, name: &str) -> bool {
        self.iter().any(|n| *n == name)
    }
}

/// Returns `candidate` if it is free in `taken`, otherwise the first
/// counter-suffixed variant of it that is free.
pub fn unique_name<S: NameSet + ?Sized>(candidate: &str, taken: &S) -> String {
    let mut name = candidate.to_string();
    while taken.contains_name(&name) {
        name = bump_suffix(&name);
    }
    name
}

/// Increments the trailing decimal run of `name`, or appends `1`.
fn bump_suffix(name: &str) -> String {
    let stem_len = name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (stem, digits) = name.split_at(stem_len);
    if digits.is_empty() {
        return format!("{stem}1");
    }
    format!("{stem}{}", increment_decimal(digits.trim_start_matches('0')))
}

/// Adds one to a decimal string of any length.
fn increment_decimal(digits: &str) -> String {
    let mut out: Vec<u8> = digits.bytes().collect();
    let mut i = out.len();
    loop {
        if i == 0 {
            out.insert(0, b'1');
            break;
        }
        i -= 1;
        if out[i] == b'9' {
            out[i] = b'0';
        } else {
            out[i] += 1;
            break;
        }
    }
    // Only ASCII digits were written.
    String::from_utf8(out).unwrap_or_default()
}

/// A growing set of used names that allocates and reserves in one step.
///
/// Merges seed a scope with the host's names plus the fragment's own
/// names, so a renamed fragment entry can never land on a sibling that
/// the fragment brings along.
#[derive(Debug, Clone, Default)]
pub struct NameScope {
    used: FxHashSet<String>,
}

impl NameScope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `name`. Returns false if it was already reserved.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.used.insert(name.into())
    }

    /// Returns true if `name` is reserved.
    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Allocates a free name derived from `candidate` and reserves it.
    pub fn allocate(&mut self, candidate: &str) -> String {
        let name = unique_name(candidate, &self.used);
        self.used.insert(name.clone());
        name
    }

    /// Returns the number of reserved names.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Returns true if nothing is reserved.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

impl NameSet for NameScope {
    fn contains_name(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<T: Into<String>> FromIterator<T> for NameScope {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            used: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<T: Into<String>> Extend<T> for NameScope {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.used.extend(iter.into_iter().map(Into::into));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(names: &[&str]) -> FxHashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_free_name_is_kept() {
        assert_eq!(unique_name("title", &set(&["name"])), "title");
    }

    #[test]
    fn test_appends_counter() {
        assert_eq!(unique_name("a", &set(&["a"])), "a1");
        assert_eq!(unique_name("a", &set(&["a", "a1"])), "a2");
    }

    #[test]
    fn test_bumps_existing_counter() {
        assert_eq!(unique_name("item9", &set(&["item9"])), "item10");
        assert_eq!(unique_name("var1", &set(&["var1", "var2"])), "var3");
    }

    #[test]
    fn test_leading_zeros_are_dropped() {
        assert_eq!(unique_name("a007", &set(&["a007"])), "a8");
        assert_eq!(unique_name("a0", &set(&["a0"])), "a1");
    }

    #[test]
    fn test_long_suffix_does_not_overflow() {
        let name = "x99999999999999999999999999";
        assert_eq!(
            unique_name(name, &set(&[name])),
            "x100000000000000000000000000"
        );
    }

    #[test]
    fn test_class_candidate_with_dot() {
        assert_eq!(unique_name(".title", &set(&[".title"])), ".title1");
    }

    #[test]
    fn test_scope_reserves_allocations() {
        let mut scope: NameScope = ["a", "a1"].into_iter().collect();
        assert_eq!(scope.allocate("a"), "a2");
        assert_eq!(scope.allocate("a"), "a3");
        assert!(scope.contains("a3"));
    }
}
