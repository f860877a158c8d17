use pretty_assertions::assert_eq;
use vue_common::{MergeWarning, RenameCategory};
use vue_script::{prop_key, ScriptMerge, ScriptModel};

fn merge(host: &str, fragment: &str) -> (String, ScriptMerge) {
    let mut host = ScriptModel::parse(host).unwrap();
    let fragment = ScriptModel::parse(fragment).unwrap();
    let merge = host.merge(fragment);
    (host.generate(), merge)
}

fn position(code: &str, needle: &str) -> usize {
    code.find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in:\n{code}"))
}

#[test]
fn test_data_collision_rewrites_fragment_instance_references() {
    let (code, merge) = merge(
        r#"export default {
    data() {
        return { a: 1 };
    },
    methods: {
        show() { return this.a; },
    },
};
"#,
        r#"export default {
    data() {
        return { a: 2 };
    },
    methods: {
        inc() { this.a++; },
    },
};
"#,
    );

    assert!(merge.warnings.is_empty());
    assert_eq!(
        merge.renames.get(RenameCategory::Data).unwrap().get("a"),
        Some("a1")
    );
    assert!(merge.renames.get(RenameCategory::Methods).is_none());
    assert!(code.contains("a1: 2"), "{code}");
    assert!(code.contains("this.a1++"), "{code}");
    assert!(code.contains("return this.a;"), "{code}");
}

#[test]
fn test_top_level_variables_are_renamed() {
    let (code, merge) = merge(
        "const size = 'a';\nexport default {\n    computed: {\n        s() { return size; },\n    },\n};\n",
        "import X from './x';\nconst size = 'b';\nexport default {\n    computed: {\n        t() { return size; },\n    },\n};\n",
    );

    assert_eq!(
        merge.renames.get(RenameCategory::Variables).unwrap().get("size"),
        Some("size1")
    );
    assert!(code.starts_with("import X from './x'"), "{code}");
    assert!(code.contains("return size;"), "{code}");
    assert!(code.contains("return size1;"), "{code}");
    assert!(position(&code, "const size1 = 'b'") < position(&code, "export default"));
}

#[test]
fn test_mixins_skip_known_entries() {
    let (code, merge) = merge(
        "export default { mixins: [MixinA, MixinB] };\n",
        "export default { mixins: [MixinB, MixinC] };\n",
    );
    assert!(merge.warnings.is_empty());
    assert_eq!(code.matches("MixinB").count(), 1, "{code}");
    assert!(position(&code, "MixinA") < position(&code, "MixinC"));
}

#[test]
fn test_hooks_keep_statement_order_and_rename_locals() {
    let (code, merge) = merge(
        "export default {\n    mounted() {\n        const el = this.$el;\n        init(el);\n    },\n};\n",
        "export default {\n    mounted() {\n        const el = 1;\n        use(el);\n    },\n};\n",
    );
    assert!(merge.warnings.is_empty());
    assert!(code.contains("init(el)"), "{code}");
    assert!(code.contains("const el1 = 1"), "{code}");
    assert!(position(&code, "init(el)") < position(&code, "use(el1)"));
}

#[test]
fn test_absent_hook_is_placed_in_canonical_order() {
    let mut host =
        ScriptModel::parse("export default {\n    data() { return {}; },\n    methods: {},\n};\n")
            .unwrap();
    let fragment = ScriptModel::parse("export default {\n    created() {},\n};\n").unwrap();
    host.merge(fragment);
    let keys: Vec<String> = host
        .component_object()
        .unwrap()
        .props
        .iter()
        .filter_map(prop_key)
        .collect();
    assert_eq!(keys, vec!["data", "created", "methods"]);
}

#[test]
fn test_fragment_comments_survive() {
    let (code, _) = merge(
        "export default {};\n",
        "// shared helper\nconst helper = 1;\nexport default {};\n",
    );
    assert!(code.contains("// shared helper"), "{code}");
    assert!(position(&code, "const helper") < position(&code, "export default"));
}

#[test]
fn test_identifier_exported_fragment() {
    let (code, merge) = merge(
        "export default {\n    methods: {\n        stop() {},\n    },\n};\n",
        "const Comp = {\n    methods: {\n        go() {},\n    },\n};\nexport default Comp;\n",
    );
    assert!(merge.warnings.is_empty());
    let mut printed = ScriptModel::parse(&code).unwrap();
    let mut object = printed.component_object_mut().unwrap();
    assert_eq!(object.nested("methods").unwrap().keys(), vec!["stop", "go"]);
    assert!(!code.contains("Comp"), "{code}");
    assert_eq!(code.matches("export default").count(), 1, "{code}");
}

#[test]
fn test_non_object_host_export_warns() {
    let (code, merge) = merge(
        "export default create();\n",
        "export default { name: 'x' };\n",
    );
    assert_eq!(merge.warnings, vec![MergeWarning::NonObjectDefaultExport]);
    assert!(code.contains("name: 'x'"), "{code}");
    assert!(code.contains("export default create()"), "{code}");
}

#[test]
fn test_imports_are_deduplicated_and_replaced() {
    let (code, _) = merge(
        "import A from './a';\nimport B from './b';\nexport default {};\n",
        "import A from './a';\nimport { B2 } from './b';\nimport C from './c';\nexport default {};\n",
    );
    assert_eq!(code.matches("'./a'").count(), 1, "{code}");
    assert!(code.contains("import { B2 } from './b'"), "{code}");
    assert!(!code.contains("import B from"), "{code}");
    assert!(position(&code, "'./b'") < position(&code, "'./c'"));
    assert!(position(&code, "'./c'") < position(&code, "export default"));
}

#[test]
fn test_fragment_code_precedes_host_options_binding() {
    let (code, merge) = merge(
        "const Comp = { name: 'host' };\nexport default Comp;\n",
        "const Child = { name: 'child' };\nexport default { components: { Child } };\n",
    );
    assert!(merge.warnings.is_empty());
    assert!(position(&code, "const Child") < position(&code, "const Comp"), "{code}");
    assert!(position(&code, "const Comp") < position(&code, "export default Comp"));
    let mut printed = ScriptModel::parse(&code).unwrap();
    let mut object = printed.component_object_mut().unwrap();
    assert!(object.nested("components").unwrap().has("Child"), "{code}");
}

#[test]
fn test_import_binding_clash_warns() {
    let (code, merge) = merge(
        "import A from './a';\nexport default {};\n",
        "import A from './b';\nimport C from './c';\nexport default {};\n",
    );
    assert_eq!(
        merge.warnings,
        vec![MergeWarning::DuplicateImport {
            name: "A".to_string()
        }]
    );
    assert!(code.contains("'./b'"), "{code}");
    assert!(code.contains("'./c'"), "{code}");
}

fn summary(merge: &ScriptMerge) -> String {
    let mut lines = Vec::new();
    for (category, map) in merge.renames.iter() {
        for (old, new) in map.iter() {
            lines.push(format!("{category}: {old} -> {new}"));
        }
    }
    for warning in &merge.warnings {
        lines.push(format!("warning: {warning}"));
    }
    lines.join("\n")
}

#[test]
fn test_merge_summary() {
    let (code, merge) = merge(
        "import A from './a';\nconst size = 1;\nexport default {\n    name: 'host',\n    data() {\n        return { a: 1 };\n    },\n};\n",
        "import A from './b';\nconst size = 2;\nexport default {\n    name: 'part',\n    data() {\n        return { a: 2, size };\n    },\n};\n",
    );
    insta::assert_snapshot!(summary(&merge), @r###"
    variables: size -> size1
    data: a -> a1
    warning: import of `A` duplicates a host binding; rename one of them
    warning: option `name` exists in both components with different values; kept both
    "###);
    assert!(code.contains("const size1 = 2"), "{code}");
}
