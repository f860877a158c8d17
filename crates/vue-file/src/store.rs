//! Where component sections live.
//!
//! A component is stored in one of three layouts. [`SectionStore`]
//! hides the layout from [`ComponentFile`](crate::ComponentFile): the
//! file asks for sections by kind and the store decides which file, if
//! any, holds them.

use crate::error::StoreError;
use crate::section::SectionKind;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::io::ErrorKind;

/// How a component is laid out in storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// One `.vue` file.
    #[default]
    Single,
    /// A `.vue` directory whose `index.vue` holds the blocks.
    Composed,
    /// A `.vue` directory with `index.html`, `index.js`, `module.css`, ...
    Decomposed,
}

impl Layout {
    /// Returns true for the directory layouts.
    pub fn is_directory(self) -> bool {
        !matches!(self, Layout::Single)
    }

    /// Returns true if template, script and style are blocks of one text.
    pub fn is_composed(self) -> bool {
        !matches!(self, Layout::Decomposed)
    }
}

/// Storage of a component's sections.
#[allow(async_fn_in_trait)]
pub trait SectionStore {
    /// Detects the layout of the stored component.
    async fn inspect(&mut self) -> Result<Layout, StoreError>;

    /// Reads a section. Missing sections are `None`.
    async fn read_section(&self, kind: SectionKind) -> Result<Option<String>, StoreError>;

    /// Writes a section. Sections the layout has no place for are skipped.
    async fn write_section(&mut self, kind: SectionKind, text: &str) -> Result<(), StoreError>;

    /// Switches to `layout` before sections are written.
    async fn prepare(&mut self, layout: Layout) -> Result<(), StoreError>;

    /// File names of nested components, sorted.
    async fn children(&self) -> Result<Vec<String>, StoreError> {
        Ok(Vec::new())
    }
}

/// Sections on the file system.
#[derive(Debug, Clone)]
pub struct FsStore {
    path: Utf8PathBuf,
    layout: Layout,
}

impl FsStore {
    /// A store for the component at `path`, assumed to be a single file
    /// until [`SectionStore::inspect`] looks.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self::with_layout(path, Layout::Single)
    }

    /// A store with a known layout.
    pub fn with_layout(path: impl Into<Utf8PathBuf>, layout: Layout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }

    /// The component path.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The current layout.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    fn section_path(&self, kind: SectionKind) -> Option<Utf8PathBuf> {
        match (self.layout, kind) {
            (Layout::Single, SectionKind::Content) => Some(self.path.clone()),
            (Layout::Single, _) => None,
            (Layout::Composed, SectionKind::Content) => Some(self.path.join("index.vue")),
            (Layout::Decomposed, SectionKind::Content) => None,
            (Layout::Composed, SectionKind::Template | SectionKind::Script | SectionKind::Style) => {
                None
            }
            (_, SectionKind::Examples) => Some(self.path.join("docs").join("blocks.md")),
            (_, kind) => kind.file_name().map(|name| self.path.join(name)),
        }
    }
}

async fn read_optional(path: &Utf8Path) -> Result<Option<String>, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io("read", path)(e)),
    }
}

impl SectionStore for FsStore {
    async fn inspect(&mut self) -> Result<Layout, StoreError> {
        let metadata = match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.clone()))
            }
            Err(e) => return Err(StoreError::io("inspect", &self.path)(e)),
        };
        self.layout = if !metadata.is_dir() {
            Layout::Single
        } else if tokio::fs::try_exists(self.path.join("index.vue"))
            .await
            .map_err(StoreError::io("inspect", &self.path))?
        {
            Layout::Composed
        } else {
            Layout::Decomposed
        };
        tracing::debug!(path = %self.path, layout = ?self.layout, "inspected component");
        Ok(self.layout)
    }

    async fn read_section(&self, kind: SectionKind) -> Result<Option<String>, StoreError> {
        if kind == SectionKind::Examples && self.layout.is_directory() {
            let docs = self.path.join("docs");
            if let Some(text) = read_optional(&docs.join("blocks.md")).await? {
                return Ok(Some(text));
            }
            return read_optional(&docs.join("examples.md")).await;
        }
        match self.section_path(kind) {
            Some(path) => read_optional(&path).await,
            None => Ok(None),
        }
    }

    async fn write_section(&mut self, kind: SectionKind, text: &str) -> Result<(), StoreError> {
        let Some(path) = self.section_path(kind) else {
            tracing::debug!(%kind, layout = ?self.layout, "section has no file in this layout");
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StoreError::io("create", parent))?;
        }
        tokio::fs::write(&path, text)
            .await
            .map_err(StoreError::io("write", &path))
    }

    async fn prepare(&mut self, layout: Layout) -> Result<(), StoreError> {
        // Only a layout change removes what is there, so extra files in a
        // component directory survive a save.
        if let Ok(metadata) = tokio::fs::metadata(&self.path).await {
            if metadata.is_dir() != layout.is_directory() {
                tracing::debug!(path = %self.path, "replacing component of another layout");
                let removed = if metadata.is_dir() {
                    tokio::fs::remove_dir_all(&self.path).await
                } else {
                    tokio::fs::remove_file(&self.path).await
                };
                removed.map_err(StoreError::io("remove", &self.path))?;
            }
        }
        if layout.is_directory() {
            tokio::fs::create_dir_all(&self.path)
                .await
                .map_err(StoreError::io("create", &self.path))?;
        }
        self.layout = layout;
        Ok(())
    }

    async fn children(&self) -> Result<Vec<String>, StoreError> {
        if !self.layout.is_directory() {
            return Ok(Vec::new());
        }
        let mut entries = tokio::fs::read_dir(&self.path)
            .await
            .map_err(StoreError::io("list", &self.path))?;
        let mut children = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(StoreError::io("list", &self.path))?
        {
            if let Ok(name) = entry.file_name().into_string() {
                if name.ends_with(".vue") && name != "index.vue" {
                    children.push(name);
                }
            }
        }
        children.sort();
        Ok(children)
    }
}

/// Sections held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    layout: Layout,
    sections: IndexMap<SectionKind, String>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            sections: IndexMap::new(),
        }
    }

    /// Adds a section.
    pub fn with_section(mut self, kind: SectionKind, text: impl Into<String>) -> Self {
        self.sections.insert(kind, text.into());
        self
    }

    /// Returns a stored section.
    pub fn section(&self, kind: SectionKind) -> Option<&str> {
        self.sections.get(&kind).map(String::as_str)
    }
}

impl SectionStore for MemoryStore {
    async fn inspect(&mut self) -> Result<Layout, StoreError> {
        Ok(self.layout)
    }

    async fn read_section(&self, kind: SectionKind) -> Result<Option<String>, StoreError> {
        Ok(self.sections.get(&kind).cloned())
    }

    async fn write_section(&mut self, kind: SectionKind, text: &str) -> Result<(), StoreError> {
        self.sections.insert(kind, text.to_string());
        Ok(())
    }

    async fn prepare(&mut self, layout: Layout) -> Result<(), StoreError> {
        if layout != self.layout {
            self.sections.clear();
            self.layout = layout;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_section_paths() {
        let single = FsStore::new("a/u-button.vue");
        assert_eq!(
            single.section_path(SectionKind::Content),
            Some(Utf8PathBuf::from("a/u-button.vue"))
        );
        assert_eq!(single.section_path(SectionKind::Script), None);

        let composed = FsStore::with_layout("u-list.vue", Layout::Composed);
        assert_eq!(
            composed.section_path(SectionKind::Content),
            Some(Utf8PathBuf::from("u-list.vue/index.vue"))
        );
        assert_eq!(
            composed.section_path(SectionKind::Definition),
            Some(Utf8PathBuf::from("u-list.vue/definition.json"))
        );
        assert_eq!(composed.section_path(SectionKind::Template), None);

        let decomposed = FsStore::with_layout("u-list.vue", Layout::Decomposed);
        assert_eq!(
            decomposed.section_path(SectionKind::Style),
            Some(Utf8PathBuf::from("u-list.vue/module.css"))
        );
        assert_eq!(decomposed.section_path(SectionKind::Content), None);
    }

    #[tokio::test]
    async fn test_memory_store_clears_on_layout_change() {
        let mut store = MemoryStore::new(Layout::Single).with_section(SectionKind::Content, "x");
        store.prepare(Layout::Single).await.unwrap();
        assert_eq!(store.section(SectionKind::Content), Some("x"));
        store.prepare(Layout::Decomposed).await.unwrap();
        assert_eq!(store.section(SectionKind::Content), None);
    }
}
