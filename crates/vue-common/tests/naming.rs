use pretty_assertions::assert_eq;
use vue_common::{
    camel_to_kebab, kebab_to_camel, unique_name, NameScope, RenameBundle, RenameCategory, RenameMap,
};

/// Renames `incoming` against `host` the way a merge phase does.
fn rename_all(host: &[&str], incoming: &[&str]) -> RenameMap {
    let mut scope: NameScope = host.iter().chain(incoming).copied().collect();
    let mut renames = RenameMap::new();
    for name in incoming {
        if host.contains(name) && !renames.contains(name) {
            renames.insert(*name, scope.allocate(name));
        }
    }
    renames
}

#[test]
fn test_renamed_names_avoid_host_and_fragment_siblings() {
    let renames = rename_all(&["a", "b"], &["a", "a1", "b"]);
    assert_eq!(renames.get("a"), Some("a2"));
    assert_eq!(renames.get("b"), Some("b1"));
    assert_eq!(renames.get("a1"), None);
}

#[test]
fn test_bundle_collects_per_category() {
    let mut bundle = RenameBundle::new();
    bundle.set(RenameCategory::Data, rename_all(&["count"], &["count"]));
    bundle.set(RenameCategory::Methods, rename_all(&["load"], &["save"]));

    let categories: Vec<_> = bundle.iter().map(|(category, _)| category).collect();
    assert_eq!(categories, vec![RenameCategory::Data]);
    assert_eq!(bundle.resolve(RenameCategory::Data, "count"), "count1");
    assert_eq!(bundle.resolve(RenameCategory::Methods, "save"), "save");
}

#[test]
fn test_slice_name_set_and_case_helpers() {
    let taken: &[&str] = &["u-button", "u-button1"];
    assert_eq!(unique_name("u-button", taken), "u-button2");
    assert_eq!(kebab_to_camel("u-button"), "UButton");
    assert_eq!(camel_to_kebab("UButton"), "u-button");
}
