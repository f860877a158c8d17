//! Rename maps produced by the merge phases.

use indexmap::IndexMap;
use std::fmt;

/// An ordered `old -> new` identifier map for one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RenameMap {
    entries: IndexMap<String, String>,
}

impl RenameMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `old -> new`. Identity renames are ignored.
    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
        let (old, new) = (old.into(), new.into());
        if old != new {
            self.entries.insert(old, new);
        }
    }

    /// Returns the new name for `old`, if it was renamed.
    pub fn get(&self, old: &str) -> Option<&str> {
        self.entries.get(old).map(String::as_str)
    }

    /// Returns the new name for `old`, or `old` itself.
    pub fn resolve<'a>(&'a self, old: &'a str) -> &'a str {
        self.get(old).unwrap_or(old)
    }

    /// Returns true if `old` was renamed.
    pub fn contains(&self, old: &str) -> bool {
        self.entries.contains_key(old)
    }

    /// Iterates over `(old, new)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(old, new)| (old.as_str(), new.as_str()))
    }

    /// Returns the number of renames.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was renamed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies every entry of `other` into this map. Later maps win.
    pub fn extend_from(&mut self, other: &RenameMap) {
        for (old, new) in other.iter() {
            self.insert(old, new);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenameMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = RenameMap::new();
        for (old, new) in iter {
            map.insert(old, new);
        }
        map
    }
}

/// The namespaces a rename can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum RenameCategory {
    /// Top-level script variables.
    Variables,
    /// `props` keys.
    Props,
    /// `propsData` keys.
    PropsData,
    /// Keys of the object returned by `data()`.
    Data,
    /// `computed` keys.
    Computed,
    /// `watch` keys.
    Watch,
    /// `methods` keys.
    Methods,
    /// Locally registered components.
    Components,
    /// Locally registered directives.
    Directives,
    /// Locally registered filters.
    Filters,
    /// `mixins` (never renamed, kept for completeness of the bundle).
    Mixins,
    /// CSS-module class names, without the leading dot.
    Class,
    /// Template `ref` names.
    Ref,
    /// Definition params and variables.
    DefinitionData,
    /// Definition logic names.
    Logic,
}

impl RenameCategory {
    /// Returns the script option key this category is merged from, if any.
    pub fn from_option_key(key: &str) -> Option<Self> {
        Some(match key {
            "props" => Self::Props,
            "propsData" => Self::PropsData,
            "data" => Self::Data,
            "computed" => Self::Computed,
            "watch" => Self::Watch,
            "methods" => Self::Methods,
            "components" => Self::Components,
            "directives" => Self::Directives,
            "filters" => Self::Filters,
            "mixins" => Self::Mixins,
            _ => return None,
        })
    }

    /// The name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Variables => "variables",
            Self::Props => "props",
            Self::PropsData => "propsData",
            Self::Data => "data",
            Self::Computed => "computed",
            Self::Watch => "watch",
            Self::Methods => "methods",
            Self::Components => "components",
            Self::Directives => "directives",
            Self::Filters => "filters",
            Self::Mixins => "mixins",
            Self::Class => "class",
            Self::Ref => "ref",
            Self::DefinitionData => "definitionData",
            Self::Logic => "logic",
        }
    }
}

impl fmt::Display for RenameCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories whose names are reachable as `this.<name>` on a component
/// instance.
pub const INSTANCE_CATEGORIES: &[RenameCategory] = &[
    RenameCategory::Props,
    RenameCategory::PropsData,
    RenameCategory::Data,
    RenameCategory::Computed,
    RenameCategory::Methods,
];

/// Categories whose names a template expression may reference directly.
pub const TEMPLATE_CATEGORIES: &[RenameCategory] = &[
    RenameCategory::Props,
    RenameCategory::PropsData,
    RenameCategory::Data,
    RenameCategory::Computed,
    RenameCategory::Methods,
    RenameCategory::DefinitionData,
    RenameCategory::Logic,
];

/// Rename maps keyed by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RenameBundle {
    maps: IndexMap<RenameCategory, RenameMap>,
}

impl RenameBundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the map for `category`, if one was recorded.
    pub fn get(&self, category: RenameCategory) -> Option<&RenameMap> {
        self.maps.get(&category)
    }

    /// Returns the map for `category`, creating it if needed.
    pub fn entry(&mut self, category: RenameCategory) -> &mut RenameMap {
        self.maps.entry(category).or_default()
    }

    /// Replaces the map for `category`.
    pub fn set(&mut self, category: RenameCategory, map: RenameMap) {
        self.maps.insert(category, map);
    }

    /// Resolves `old` within `category`.
    pub fn resolve<'a>(&'a self, category: RenameCategory, old: &'a str) -> &'a str {
        self.get(category).map_or(old, |map| map.resolve(old))
    }

    /// Merges every map of `other` into this bundle.
    pub fn absorb(&mut self, other: RenameBundle) {
        for (category, map) in other.maps {
            self.entry(category).extend_from(&map);
        }
    }

    /// Flattens the given categories into one map. Later categories win.
    pub fn combined(&self, categories: &[RenameCategory]) -> RenameMap {
        let mut out = RenameMap::new();
        for category in categories {
            if let Some(map) = self.get(*category) {
                out.extend_from(map);
            }
        }
        out
    }

    /// Iterates over non-empty maps.
    pub fn iter(&self) -> impl Iterator<Item = (RenameCategory, &RenameMap)> {
        self.maps
            .iter()
            .filter(|(_, map)| !map.is_empty())
            .map(|(category, map)| (*category, map))
    }

    /// Returns true if no category holds a rename.
    pub fn is_empty(&self) -> bool {
        self.maps.values().all(RenameMap::is_empty)
    }
}
