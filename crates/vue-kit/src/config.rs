//! Configuration loading.

use camino::Utf8Path;
use serde::Deserialize;
use std::fs;

/// The configuration file looked up in the workspace root.
pub const CONFIG_FILE: &str = "vuekit.config.json";

/// Workspace configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KitConfig {
    /// Spaces per indentation level in generated markup.
    pub tab_length: usize,

    /// Glob patterns skipped by `check`.
    pub ignore: Vec<String>,

    /// File and directory extensions treated as components.
    pub extensions: Vec<String>,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            tab_length: 4,
            ignore: Vec::new(),
            extensions: vec![".vue".to_string()],
        }
    }
}

impl KitConfig {
    /// Loads `vuekit.config.json` from the workspace root.
    pub fn load(workspace: &Utf8Path) -> Self {
        let config_path = workspace.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }

        match Self::parse_config(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: Failed to parse {}: {}", config_path, e);
                Self::default()
            }
        }
    }

    fn parse_config(path: &Utf8Path) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }

    /// Returns true if `name` ends with one of the component extensions.
    pub fn is_component_name(&self, name: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| name.len() > ext.len() && name.ends_with(ext.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn workspace(config: Option<&str>) -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        if let Some(config) = config {
            fs::write(root.join(CONFIG_FILE), config).unwrap();
        }
        (dir, root)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let (_dir, root) = workspace(None);
        assert_eq!(KitConfig::load(&root), KitConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let (_dir, root) = workspace(Some(r#"{ "tabLength": 2, "ignore": ["legacy/**"] }"#));
        let config = KitConfig::load(&root);
        assert_eq!(config.tab_length, 2);
        assert_eq!(config.ignore, vec!["legacy/**"]);
        assert_eq!(config.extensions, vec![".vue"]);
    }

    #[test]
    fn test_broken_config_gives_defaults() {
        let (_dir, root) = workspace(Some("{ tabLength: "));
        assert_eq!(KitConfig::load(&root), KitConfig::default());
    }

    #[test]
    fn test_component_names() {
        let config = KitConfig::default();
        assert!(config.is_component_name("u-button.vue"));
        assert!(!config.is_component_name(".vue"));
        assert!(!config.is_component_name("index.js"));
    }
}
