//! Canonical order of component options.

/// Lifecycle hooks in firing order.
pub const LIFECYCLE_HOOKS: &[&str] = &[
    "beforeCreate",
    "created",
    "beforeMount",
    "mounted",
    "beforeUpdate",
    "updated",
    "activated",
    "deactivated",
    "beforeDestroy",
    "destroyed",
];

/// Option groups in their conventional order. Keys in one group share a rank.
const ORDER_IN_COMPONENTS: &[&[&str]] = &[
    &["el"],
    &["name"],
    &["parent"],
    &["functional"],
    &["delimiters", "comments"],
    &["components", "directives", "filters"],
    &["extends"],
    &["mixins"],
    &["inheritAttrs"],
    &["model"],
    &["props", "propsData"],
    &["fetch"],
    &["asyncData"],
    &["data"],
    &["computed"],
    &["watch"],
    &["beforeCreate"],
    &["created"],
    &["beforeMount"],
    &["mounted"],
    &["beforeUpdate"],
    &["updated"],
    &["activated"],
    &["deactivated"],
    &["beforeDestroy"],
    &["destroyed"],
    &["methods"],
    &["head"],
    &["template", "render"],
    &["renderError"],
];

/// Options whose values are property bags merged key by key.
pub const OBJECT_OPTIONS: &[&str] = &[
    "components",
    "directives",
    "filters",
    "props",
    "propsData",
    "computed",
    "watch",
    "methods",
];

/// Returns the rank of a known option key.
pub fn option_rank(key: &str) -> Option<usize> {
    ORDER_IN_COMPONENTS
        .iter()
        .position(|group| group.contains(&key))
}

/// Returns true if `key` is a lifecycle hook.
pub fn is_lifecycle_hook(key: &str) -> bool {
    LIFECYCLE_HOOKS.contains(&key)
}

/// Tracks ranks along a key sequence. Unknown keys take the rank of the
/// key before them.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RankCursor {
    last: Option<usize>,
}

impl RankCursor {
    pub(crate) fn new() -> Self {
        Self { last: None }
    }

    pub(crate) fn rank(&mut self, key: &str) -> Option<usize> {
        if let Some(rank) = option_rank(key) {
            self.last = Some(rank);
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_keys_share_rank() {
        assert_eq!(option_rank("props"), option_rank("propsData"));
        assert_eq!(option_rank("template"), option_rank("render"));
        assert!(option_rank("data") < option_rank("computed"));
        assert!(option_rank("mounted") < option_rank("methods"));
        assert_eq!(option_rank("unknown"), None);
    }

    #[test]
    fn test_hooks_rank_in_firing_order() {
        let ranks: Vec<_> = LIFECYCLE_HOOKS.iter().map(|hook| option_rank(hook)).collect();
        assert!(ranks.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_unknown_keys_inherit_rank() {
        let mut cursor = RankCursor::new();
        assert_eq!(cursor.rank("custom"), None);
        let data = cursor.rank("data");
        assert_eq!(cursor.rank("custom"), data);
    }
}
