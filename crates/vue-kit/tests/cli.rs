//! Integration tests that run the vue-kit binary on temporary workspaces.

use camino::Utf8PathBuf;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

const HOST: &str = "<template>\n    <div>\n        <span>{{ a }}</span>\n    </div>\n</template>\n\n<script>\nexport default {\n    data() {\n        return { a: 1 };\n    },\n};\n</script>\n";

const FRAGMENT: &str = "<template>\n    <p>{{ a }}</p>\n</template>\n\n<script>\nexport default {\n    data() {\n        return { a: 2 };\n    },\n};\n</script>\n";

fn workspace() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, root)
}

fn vue_kit(root: &Utf8PathBuf, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vue-kit"))
        .current_dir(root)
        .env_remove("VUE_KIT_LOG")
        .args(args)
        .output()
        .expect("failed to run vue-kit")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_merge_dry_run_leaves_host_untouched() {
    let (_dir, root) = workspace();
    fs::write(root.join("host.vue"), HOST).unwrap();
    fs::write(root.join("part.vue"), FRAGMENT).unwrap();

    let output = vue_kit(&root, &["merge", "host.vue", "part.vue", "--dry-run"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let merged = stdout(&output);
    assert!(merged.contains("<p>{{ a1 }}</p>"), "{merged}");
    assert!(merged.contains("a1: 2"), "{merged}");
    assert!(stderr(&output).contains("data: a -> a1"));
    assert_eq!(fs::read_to_string(root.join("host.vue")).unwrap(), HOST);
}

#[test]
fn test_merge_saves_host_and_prints_json() {
    let (_dir, root) = workspace();
    fs::write(root.join("host.vue"), HOST).unwrap();
    fs::write(root.join("part.vue"), FRAGMENT).unwrap();

    let output = vue_kit(
        &root,
        &["merge", "host.vue", "part.vue", "--at", "/", "--output", "json"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["renames"]["data"]["a"], "a1");
    assert_eq!(report["warnings"], serde_json::json!([]));

    let saved = fs::read_to_string(root.join("host.vue")).unwrap();
    assert!(saved.contains("<p>{{ a1 }}</p>"), "{saved}");
    assert!(saved.contains("<span>{{ a }}</span>"), "{saved}");
}

#[test]
fn test_merge_rejects_bad_target() {
    let (_dir, root) = workspace();
    fs::write(root.join("host.vue"), HOST).unwrap();
    fs::write(root.join("part.vue"), FRAGMENT).unwrap();

    let output = vue_kit(&root, &["merge", "host.vue", "part.vue", "--position", "x:1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error:"), "{}", stderr(&output));
    assert_eq!(fs::read_to_string(root.join("host.vue")).unwrap(), HOST);
}

#[test]
fn test_merge_missing_host() {
    let (_dir, root) = workspace();
    fs::write(root.join("part.vue"), FRAGMENT).unwrap();

    let output = vue_kit(&root, &["merge", "nope.vue", "part.vue"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("nope.vue"), "{}", stderr(&output));
}

#[test]
fn test_format_check_then_write() {
    let (_dir, root) = workspace();
    fs::write(
        root.join("u-box.vue"),
        "<template>\n<div><p>x</p></div>\n</template>\n",
    )
    .unwrap();

    let output = vue_kit(&root, &["format", "u-box.vue", "--check"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("Would reformat u-box.vue"));

    let output = vue_kit(&root, &["format", "u-box.vue"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let saved = fs::read_to_string(root.join("u-box.vue")).unwrap();
    assert!(
        saved.starts_with("<template>\n    <div>\n        <p>x</p>\n    </div>\n</template>"),
        "{saved}"
    );

    let output = vue_kit(&root, &["format", "u-box.vue", "--check"]);
    assert!(output.status.success(), "{}", stdout(&output));
}

#[test]
fn test_check_reports_broken_components() {
    let (_dir, root) = workspace();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/ok.vue"), HOST).unwrap();
    fs::write(
        root.join("src/broken.vue"),
        "<script>\nexport default {\n</script>\n",
    )
    .unwrap();

    let output = vue_kit(&root, &["check"]);
    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("broken.vue"), "{text}");
    assert!(!text.contains("ok.vue\nError"), "{text}");
    assert!(text.contains("vue-kit found 1 error in 2 components"), "{text}");
}

#[test]
fn test_check_honors_config_ignore() {
    let (_dir, root) = workspace();
    fs::create_dir_all(root.join("legacy")).unwrap();
    fs::write(root.join("ok.vue"), HOST).unwrap();
    fs::write(root.join("legacy/broken.vue"), "<script>\nexport default {\n</script>\n").unwrap();
    fs::write(
        root.join("vuekit.config.json"),
        r#"{ "ignore": ["legacy/**"] }"#,
    )
    .unwrap();

    let output = vue_kit(&root, &["check"]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("vue-kit found 0 errors in 1 component"));
}
