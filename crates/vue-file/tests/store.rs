use camino::Utf8PathBuf;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use vue_file::{ComponentFile, FileError, Layout, SectionKind, StoreError};

const SFC: &str = "<template>\n    <div></div>\n</template>\n\n<script>\nexport default {};\n</script>\n\n<style module>\n.root {}\n</style>\n";

fn workspace() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, root)
}

#[tokio::test]
async fn test_single_file_round_trip() {
    let (_dir, root) = workspace();
    let path = root.join("u-card.vue");
    std::fs::write(&path, SFC).unwrap();

    let mut file = ComponentFile::new(path.clone()).unwrap();
    file.open().await.unwrap();
    assert_eq!(file.layout(), Layout::Single);
    assert_eq!(file.tag_name(), "u-card");
    assert!(!file.has_script(true));
    assert!(!file.has_style(true));

    file.set_section(SectionKind::Style, Some(".root { color: red; }\n".to_string()));
    file.save().await.unwrap();
    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("<style module>\n.root { color: red; }\n</style>"), "{saved}");
    assert!(saved.starts_with("<template>\n    <div></div>\n</template>"), "{saved}");
}

#[tokio::test]
async fn test_composed_directory() {
    let (_dir, root) = workspace();
    let path = root.join("u-list.vue");
    std::fs::create_dir_all(&path).unwrap();
    std::fs::write(path.join("index.vue"), SFC).unwrap();
    std::fs::write(path.join("item.vue"), SFC).unwrap();
    std::fs::write(path.join("api.yaml"), "- name: u-list\n").unwrap();

    let mut file = ComponentFile::new(path.clone()).unwrap();
    file.pre_open().await.unwrap();
    assert_eq!(file.layout(), Layout::Composed);
    assert_eq!(file.children(), ["item.vue".to_string()]);

    file.open().await.unwrap();
    assert_eq!(file.section(SectionKind::Script), Some("export default {};\n"));
    assert_eq!(file.section(SectionKind::Api), Some("- name: u-list\n"));

    file.save().await.unwrap();
    assert!(path.join("index.vue").is_file());
    assert!(path.join("item.vue").is_file());
}

#[tokio::test]
async fn test_decomposed_directory() {
    let (_dir, root) = workspace();
    let path = root.join("u-tabs.vue");
    std::fs::create_dir_all(&path).unwrap();
    std::fs::write(path.join("index.html"), "<div></div>\n").unwrap();
    std::fs::write(path.join("index.js"), "export default {};\n").unwrap();
    std::fs::write(path.join("module.css"), ".root {}\n").unwrap();
    std::fs::write(path.join("package.json"), "{ \"name\": \"u-tabs\" }\n").unwrap();

    let mut file = ComponentFile::new(path.clone()).unwrap();
    file.open().await.unwrap();
    assert_eq!(file.layout(), Layout::Decomposed);
    assert_eq!(file.section(SectionKind::Template), Some("<div></div>\n"));

    file.parse_style().unwrap().rename_class("root", "main");
    file.save().await.unwrap();
    assert_eq!(
        std::fs::read_to_string(path.join("module.css")).unwrap(),
        ".main {}\n"
    );
    assert_eq!(
        std::fs::read_to_string(path.join("package.json")).unwrap(),
        "{ \"name\": \"u-tabs\" }\n"
    );
    assert!(!path.join("index.vue").exists());
}

#[tokio::test]
async fn test_decomposed_without_script_fails() {
    let (_dir, root) = workspace();
    let path = root.join("u-empty.vue");
    std::fs::create_dir_all(&path).unwrap();
    std::fs::write(path.join("index.html"), "<div></div>\n").unwrap();

    let mut file = ComponentFile::new(path).unwrap();
    let error = file.open().await.unwrap_err();
    assert!(matches!(error, FileError::Store(StoreError::MissingScript(_))));
}

#[tokio::test]
async fn test_missing_component() {
    let (_dir, root) = workspace();
    let mut file = ComponentFile::new(root.join("u-none.vue")).unwrap();
    let error = file.open().await.unwrap_err();
    assert!(matches!(error, FileError::Store(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_save_as_changes_layout_and_refuses_overwrite() {
    let (_dir, root) = workspace();
    let path = root.join("u-card.vue");
    std::fs::write(&path, SFC).unwrap();

    let mut file = ComponentFile::new(path.clone()).unwrap();
    file.open().await.unwrap();
    file.set_layout(Layout::Decomposed);
    let copy = file.save_as(root.join("u-copy.vue")).await.unwrap();
    assert_eq!(copy.tag_name(), "u-copy");
    assert_eq!(
        std::fs::read_to_string(root.join("u-copy.vue/index.js")).unwrap(),
        "export default {};\n"
    );
    assert_eq!(
        std::fs::read_to_string(root.join("u-copy.vue/index.html")).unwrap(),
        "    <div></div>\n"
    );

    let error = file.save_as(path).await.unwrap_err();
    assert!(matches!(error, FileError::Exists(_)));
}
