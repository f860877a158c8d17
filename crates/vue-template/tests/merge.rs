use pretty_assertions::assert_eq;
use vue_common::{MergeWarning, Position, RenameBundle, RenameCategory};
use vue_template::{InsertTarget, TemplateError, TemplateModel, TemplateOptions};

const HOST: &str = r#"<div :class="$style.root">
    <u-linear-layout>
        <u-button ref="submit" @click="save">Save</u-button>
    </u-linear-layout>
</div>
"#;

#[test]
fn test_merge_by_position_appends_to_deepest_element() {
    let mut host = TemplateModel::parse(HOST).unwrap();
    let fragment = TemplateModel::parse(r#"<u-button ref="submit" @click="cancel">Cancel</u-button>"#)
        .unwrap();
    let mut renames = RenameBundle::new();
    renames.entry(RenameCategory::Methods).insert("cancel", "cancel1");

    let merge = host
        .merge(fragment, &InsertTarget::Position(Position::new(2, 8)), &renames)
        .unwrap();

    assert_eq!(merge.refs.get("submit"), Some("submit1"));
    insta::assert_snapshot!(host.generate().trim_end(), @r###"
    <div :class="$style.root">
        <u-linear-layout>
            <u-button ref="submit" @click="save">Save</u-button>
            <u-button ref="submit1" @click="cancel1">Cancel</u-button>
        </u-linear-layout>
    </div>
    "###);
}

#[test]
fn test_merge_scoped_slot_and_branches() {
    let mut host = TemplateModel::parse("<u-table></u-table>").unwrap();
    let fragment = TemplateModel::parse(
        r#"<template #cell="{ item }"><span v-if="item.done">{{ doneText }}</span><span v-else>{{ todoText }}</span></template>"#,
    )
    .unwrap();
    let mut renames = RenameBundle::new();
    renames.entry(RenameCategory::Data).insert("todoText", "todoText1");

    host.merge(fragment, &InsertTarget::root(), &renames).unwrap();

    let root = host.root().unwrap();
    assert!(root.children.is_empty());
    assert!(root.slots.contains_key("cell"));
    let output = host.generate();
    assert!(output.contains("{{ todoText1 }}"), "{output}");
    assert!(output.contains("{{ doneText }}"), "{output}");
}

#[test]
fn test_merge_reports_unparsable_expression() {
    let mut host = TemplateModel::parse("<div></div>").unwrap();
    let fragment = TemplateModel::parse(r#"<p :title="count +">x</p>"#).unwrap();
    let mut renames = RenameBundle::new();
    renames.entry(RenameCategory::Data).insert("count", "count1");

    let merge = host.merge(fragment, &InsertTarget::root(), &renames).unwrap();

    assert!(matches!(
        merge.warnings.as_slice(),
        [MergeWarning::UnparsableExpression { expression, .. }] if expression == "count +"
    ));
    assert_eq!(host.generate(), "<div>\n    <p :title=\"count +\">x</p>\n</div>\n");
}

#[test]
fn test_merge_into_missing_path_fails() {
    let mut host = TemplateModel::parse("<div></div>").unwrap();
    let fragment = TemplateModel::parse("<p></p>").unwrap();
    let err = host
        .merge(fragment, &"/4/".parse().unwrap(), &RenameBundle::new())
        .unwrap_err();
    assert!(matches!(err, TemplateError::PathOutOfRange { .. }));
}

#[test]
fn test_single_file_indentation_round_trip() {
    let options = TemplateOptions {
        tab_length: 4,
        start_level: 1,
    };
    let source = "    <div>\n        <p>{{ a }}</p>\n    </div>\n";
    let model = TemplateModel::parse_with_options(source, options).unwrap();
    assert_eq!(model.generate(), source);
}
