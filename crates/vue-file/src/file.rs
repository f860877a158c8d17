//! The component file facade and its lifecycle.

use crate::error::{FileError, StoreError};
use crate::section::{compose, extract_block, SectionKind};
use crate::store::{FsStore, Layout, MemoryStore, SectionStore};
use crate::tag::resolve_tag_name;
use camino::{Utf8Path, Utf8PathBuf};
use vue_common::kebab_to_camel;
use vue_definition::DefinitionModel;
use vue_script::ScriptModel;
use vue_style::StyleModel;
use vue_template::{TemplateModel, TemplateOptions};

/// Lifecycle state of a [`ComponentFile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileState {
    /// Nothing is loaded.
    #[default]
    Closed,
    /// The layout and nested components are known.
    Previewed,
    /// Sections are loaded and models can be parsed.
    Open,
}

/// Raw section texts. `None` means the section is absent.
#[derive(Debug, Clone, Default)]
struct Sections {
    content: Option<String>,
    template: Option<String>,
    script: Option<String>,
    style: Option<String>,
    definition: Option<String>,
    api: Option<String>,
    examples: Option<String>,
    package: Option<String>,
}

impl Sections {
    fn get(&self, kind: SectionKind) -> Option<&String> {
        match kind {
            SectionKind::Content => self.content.as_ref(),
            SectionKind::Template => self.template.as_ref(),
            SectionKind::Script => self.script.as_ref(),
            SectionKind::Style => self.style.as_ref(),
            SectionKind::Definition => self.definition.as_ref(),
            SectionKind::Api => self.api.as_ref(),
            SectionKind::Examples => self.examples.as_ref(),
            SectionKind::Package => self.package.as_ref(),
        }
    }

    fn slot(&mut self, kind: SectionKind) -> &mut Option<String> {
        match kind {
            SectionKind::Content => &mut self.content,
            SectionKind::Template => &mut self.template,
            SectionKind::Script => &mut self.script,
            SectionKind::Style => &mut self.style,
            SectionKind::Definition => &mut self.definition,
            SectionKind::Api => &mut self.api,
            SectionKind::Examples => &mut self.examples,
            SectionKind::Package => &mut self.package,
        }
    }
}

/// Finds a section inside single-file text.
fn extract_section(content: &str, kind: SectionKind) -> Option<String> {
    let tag = kind.block_tag()?;
    if kind == SectionKind::Examples {
        return extract_block(content, tag, Some("name=\"blocks.md\""))
            .or_else(|| extract_block(content, tag, Some("name=\"examples.md\"")));
    }
    extract_block(content, tag, None)
}

/// Collapses whitespace runs and empty braces, for the `simplify` checks.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("{ }", "{}")
}

/// A Vue component: its storage, raw sections and parsed models.
///
/// ```text
/// Closed --pre_open--> Previewed --open--> Open --save--> Open
///    ^                                       |
///    +------------------close----------------+
/// ```
///
/// Models are parsed on first use and cached until [`close`] or
/// [`set_section`]. [`generate`] prints the cached models back into the
/// section texts.
///
/// [`close`]: ComponentFile::close
/// [`set_section`]: ComponentFile::set_section
/// [`generate`]: ComponentFile::generate
#[derive(Debug)]
pub struct ComponentFile<S = FsStore> {
    path: Utf8PathBuf,
    tag_name: String,
    component_name: String,
    store: S,
    state: FileState,
    layout: Layout,
    children: Vec<String>,
    sections: Sections,
    template: Option<TemplateModel>,
    script: Option<ScriptModel>,
    style: Option<StyleModel>,
    definition: Option<DefinitionModel>,
    tab_length: usize,
    dirty: bool,
}

impl ComponentFile<FsStore> {
    /// A closed component at `path` on the file system.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Result<Self, FileError> {
        let path = path.into();
        let store = FsStore::new(path.clone());
        Self::with_store(path, store)
    }
}

impl ComponentFile<MemoryStore> {
    /// An open, single-file component built from source text. The path is
    /// virtual (`temp.vue`).
    pub fn from_source(code: &str) -> Self {
        let store = MemoryStore::new(Layout::Single).with_section(SectionKind::Content, code);
        let mut file = Self::unchecked(Utf8PathBuf::from("temp.vue"), store);
        file.state = FileState::Open;
        for kind in SectionKind::ALL {
            if kind != SectionKind::Content {
                *file.sections.slot(kind) = extract_section(code, kind);
            }
        }
        file.sections.content = Some(code.to_string());
        file
    }
}

impl<S: SectionStore> ComponentFile<S> {
    /// A closed component at `path` backed by `store`.
    pub fn with_store(path: impl Into<Utf8PathBuf>, store: S) -> Result<Self, FileError> {
        let path = path.into();
        if path.extension() != Some("vue") {
            return Err(FileError::NotVue(path));
        }
        Ok(Self::unchecked(path, store))
    }

    fn unchecked(path: Utf8PathBuf, store: S) -> Self {
        let tag_name = resolve_tag_name(&path);
        let component_name = kebab_to_camel(&tag_name);
        Self {
            path,
            tag_name,
            component_name,
            store,
            state: FileState::Closed,
            layout: Layout::default(),
            children: Vec::new(),
            sections: Sections::default(),
            template: None,
            script: None,
            style: None,
            definition: None,
            tab_length: 4,
            dirty: false,
        }
    }

    /// The component path.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The kebab-case tag name, e.g. `u-button`.
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// The PascalCase component name, e.g. `UButton`.
    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    /// The lifecycle state.
    pub fn state(&self) -> FileState {
        self.state
    }

    /// Returns true once sections are loaded.
    pub fn is_open(&self) -> bool {
        self.state == FileState::Open
    }

    /// Returns true if [`generate`](Self::generate) ran since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The storage layout, known after [`pre_open`](Self::pre_open).
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Changes the layout used by the next save.
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    /// File names of nested components.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Sets the indentation width for generated markup.
    pub fn set_tab_length(&mut self, tab_length: usize) {
        self.tab_length = tab_length;
        if let Some(template) = &mut self.template {
            let mut options = template.options();
            options.tab_length = tab_length;
            template.set_options(options);
        }
    }

    /// Detects the layout and the nested components.
    pub async fn pre_open(&mut self) -> Result<(), FileError> {
        self.layout = self.store.inspect().await?;
        self.children = self.store.children().await?;
        if self.state == FileState::Closed {
            self.state = FileState::Previewed;
        }
        Ok(())
    }

    /// Loads every section. Does nothing if the file is already open.
    pub async fn open(&mut self) -> Result<(), FileError> {
        if self.state == FileState::Open {
            return Ok(());
        }
        if self.state == FileState::Closed {
            self.pre_open().await?;
        }
        self.load().await?;
        self.state = FileState::Open;
        Ok(())
    }

    /// Drops everything loaded and opens again.
    pub async fn force_open(&mut self) -> Result<(), FileError> {
        self.close();
        self.pre_open().await?;
        self.load().await?;
        self.state = FileState::Open;
        Ok(())
    }

    /// Drops every cached text and model.
    pub fn close(&mut self) {
        self.state = FileState::Closed;
        self.layout = Layout::default();
        self.children.clear();
        self.sections = Sections::default();
        self.template = None;
        self.script = None;
        self.style = None;
        self.definition = None;
        self.dirty = false;
    }

    async fn load(&mut self) -> Result<(), FileError> {
        let content = if self.layout.is_composed() {
            let content = self.store.read_section(SectionKind::Content).await?;
            Some(content.ok_or_else(|| StoreError::NotFound(self.path.clone()))?)
        } else {
            None
        };
        for kind in SectionKind::ALL {
            if kind == SectionKind::Content {
                continue;
            }
            let mut text = content
                .as_deref()
                .and_then(|content| extract_section(content, kind));
            if text.is_none() {
                text = self.store.read_section(kind).await?;
            }
            *self.sections.slot(kind) = text;
        }
        if self.layout == Layout::Decomposed && self.sections.script.is_none() {
            return Err(StoreError::MissingScript(self.path.clone()).into());
        }
        self.sections.content = content;
        tracing::debug!(path = %self.path, layout = ?self.layout, "opened component");
        Ok(())
    }

    fn require_open(&self) -> Result<(), FileError> {
        if self.state == FileState::Open {
            Ok(())
        } else {
            Err(FileError::NotOpen(self.path.clone()))
        }
    }

    /// Returns the raw text of a section.
    pub fn section(&self, kind: SectionKind) -> Option<&str> {
        self.sections.get(kind).map(String::as_str)
    }

    /// Replaces the raw text of a section and drops its parsed model.
    pub fn set_section(&mut self, kind: SectionKind, text: Option<String>) {
        match kind {
            SectionKind::Template => self.template = None,
            SectionKind::Script => self.script = None,
            SectionKind::Style => self.style = None,
            SectionKind::Definition => self.definition = None,
            _ => {}
        }
        *self.sections.slot(kind) = text;
    }

    fn template_options(&self) -> TemplateOptions {
        TemplateOptions {
            tab_length: self.tab_length,
            start_level: usize::from(self.layout.is_composed()),
        }
    }

    /// Parses the template, or returns the cached model.
    pub fn parse_template(&mut self) -> Result<&mut TemplateModel, FileError> {
        self.require_open()?;
        let model = match self.template.take() {
            Some(model) => model,
            None => TemplateModel::parse_with_options(
                self.sections.template.as_deref().unwrap_or_default(),
                self.template_options(),
            )?,
        };
        Ok(self.template.insert(model))
    }

    /// Parses the script, or returns the cached model.
    pub fn parse_script(&mut self) -> Result<&mut ScriptModel, FileError> {
        self.require_open()?;
        let model = match self.script.take() {
            Some(model) => model,
            None => ScriptModel::parse(self.sections.script.as_deref().unwrap_or_default())?,
        };
        Ok(self.script.insert(model))
    }

    /// Parses the style, or returns the cached model.
    pub fn parse_style(&mut self) -> Result<&mut StyleModel, FileError> {
        self.require_open()?;
        let model = match self.style.take() {
            Some(model) => model,
            None => StyleModel::parse(self.sections.style.as_deref().unwrap_or_default())?,
        };
        Ok(self.style.insert(model))
    }

    /// Parses the definition, or returns the cached model.
    pub fn parse_definition(&mut self) -> Result<&mut DefinitionModel, FileError> {
        self.require_open()?;
        let model = match self.definition.take() {
            Some(model) => model,
            None => DefinitionModel::parse(self.sections.definition.as_deref().unwrap_or_default())?,
        };
        Ok(self.definition.insert(model))
    }

    /// Parses every model.
    pub fn parse_all(&mut self) -> Result<(), FileError> {
        self.parse_template()?;
        self.parse_script()?;
        self.parse_style()?;
        self.parse_definition()?;
        Ok(())
    }

    /// Moves the parsed models out, parsing them first.
    pub(crate) fn take_models(
        &mut self,
    ) -> Result<(TemplateModel, ScriptModel, StyleModel, DefinitionModel), FileError> {
        self.parse_all()?;
        Ok((
            self.template.take().unwrap_or_default(),
            self.script
                .take()
                .map_or_else(|| ScriptModel::parse(""), Ok)?,
            self.style.take().unwrap_or_default(),
            self.definition.take().unwrap_or_default(),
        ))
    }

    /// Prints every parsed model back into its section and rebuilds the
    /// single-file content, which is returned.
    pub fn generate(&mut self) -> String {
        if let Some(template) = &self.template {
            self.sections.template = Some(template.generate());
        }
        if let Some(script) = &self.script {
            self.sections.script = Some(script.generate());
        }
        if let Some(style) = &self.style {
            self.sections.style = Some(style.generate());
        }
        if let Some(definition) = &self.definition {
            self.sections.definition = (!definition.is_empty()).then(|| definition.generate());
        }
        let content = compose(
            self.sections.template.as_deref(),
            self.sections.script.as_deref(),
            self.sections.style.as_deref(),
            self.sections.definition.as_deref(),
        );
        self.sections.content = Some(content.clone());
        self.dirty = true;
        content
    }

    /// Returns true if there is markup. With `simplify`, a bare
    /// `<div></div>` does not count.
    pub fn has_template(&self, simplify: bool) -> bool {
        match self.sections.template.as_deref() {
            Some(text) if !text.is_empty() => !simplify || text.trim() != "<div></div>",
            _ => false,
        }
    }

    /// Returns true if there is a script. With `simplify`, an empty
    /// `export default {};` does not count.
    pub fn has_script(&self, simplify: bool) -> bool {
        match self.sections.script.as_deref() {
            Some(text) if !text.is_empty() => !simplify || normalize(text) != "export default {};",
            _ => false,
        }
    }

    /// Returns true if there is a style. With `simplify`, an empty
    /// `.root {}` does not count.
    pub fn has_style(&self, simplify: bool) -> bool {
        match self.sections.style.as_deref() {
            Some(text) if !text.is_empty() => !simplify || normalize(text) != ".root {}",
            _ => false,
        }
    }

    /// Generates and writes every section to the store.
    pub async fn save(&mut self) -> Result<(), FileError> {
        self.require_open()?;
        self.generate();
        self.store.prepare(self.layout).await?;
        if self.layout.is_composed() {
            let content = self.sections.content.as_deref().unwrap_or_default();
            self.store.write_section(SectionKind::Content, content).await?;
        } else {
            for kind in [
                SectionKind::Template,
                SectionKind::Script,
                SectionKind::Style,
                SectionKind::Definition,
                SectionKind::Package,
            ] {
                if let Some(text) = self.sections.get(kind).filter(|text| !text.is_empty()) {
                    self.store.write_section(kind, text).await?;
                }
            }
        }
        self.dirty = false;
        tracing::debug!(path = %self.path, layout = ?self.layout, "saved component");
        Ok(())
    }

    /// Saves a copy at `path`, which must not exist yet. The copy keeps
    /// this file's layout and section texts, and is returned open.
    pub async fn save_as(
        &mut self,
        path: impl Into<Utf8PathBuf>,
    ) -> Result<ComponentFile<FsStore>, FileError> {
        self.require_open()?;
        let path = path.into();
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(StoreError::io("inspect", &path))?;
        if exists {
            return Err(FileError::Exists(path));
        }
        self.generate();

        let store = FsStore::with_layout(path.clone(), self.layout);
        let mut copy = ComponentFile::with_store(path, store)?;
        copy.layout = self.layout;
        copy.children = self.children.clone();
        copy.sections = self.sections.clone();
        copy.tab_length = self.tab_length;
        copy.state = FileState::Open;
        copy.save().await?;
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SFC: &str = "<template>\n    <div :class=\"$style.root\">\n        <span>{{ title }}</span>\n    </div>\n</template>\n\n<script>\nexport default {\n    data() {\n        return { title: 'a' };\n    },\n};\n</script>\n\n<style module>\n.root {\n    color: red;\n}\n</style>\n";

    #[test]
    fn test_from_source_is_open() {
        let file = ComponentFile::from_source(SFC);
        assert!(file.is_open());
        assert_eq!(file.tag_name(), "temp");
        assert_eq!(file.component_name(), "Temp");
        assert_eq!(file.section(SectionKind::Style), Some(".root {\n    color: red;\n}\n"));
        assert!(file.has_template(true));
        assert!(file.has_script(true));
        assert!(file.has_style(true));
        assert!(file.section(SectionKind::Definition).is_none());
    }

    #[test]
    fn test_simplify_checks() {
        let file = ComponentFile::from_source(
            "<template>\n<div></div>\n</template>\n<script>\nexport default {\n};\n</script>\n<style module>\n.root {  }\n</style>\n",
        );
        assert!(file.has_template(false));
        assert!(!file.has_template(true));
        assert!(!file.has_script(true));
        assert!(!file.has_style(true));
    }

    #[test]
    fn test_generate_recomposes_blocks() {
        let mut file = ComponentFile::from_source(SFC);
        file.parse_all().unwrap();
        assert!(!file.is_dirty());
        let content = file.generate();
        assert!(file.is_dirty());
        assert!(
            content.starts_with(
                "<template>\n    <div :class=\"$style.root\">\n        <span>{{ title }}</span>\n    </div>\n</template>\n\n<script>\n"
            ),
            "{content}"
        );
        assert!(
            content.ends_with("</script>\n\n<style module>\n.root {\n    color: red;\n}\n</style>\n"),
            "{content}"
        );
        assert_eq!(file.section(SectionKind::Content), Some(content.as_str()));
    }

    #[test]
    fn test_set_section_drops_model() {
        let mut file = ComponentFile::from_source(SFC);
        file.parse_style().unwrap();
        file.set_section(SectionKind::Style, Some(".a {}\n".to_string()));
        assert!(file.parse_style().unwrap().classes().contains("a"));
    }

    #[test]
    fn test_closed_file_cannot_parse() {
        let mut file = ComponentFile::new("u-button.vue").unwrap();
        assert!(matches!(file.parse_script(), Err(FileError::NotOpen(_))));
        assert!(matches!(
            ComponentFile::new("u-button.js"),
            Err(FileError::NotVue(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_lifecycle() {
        let store = MemoryStore::new(Layout::Decomposed)
            .with_section(SectionKind::Template, "<div></div>\n")
            .with_section(SectionKind::Script, "export default {};\n");
        let mut file = ComponentFile::with_store("u-list.vue/item.vue", store).unwrap();
        assert_eq!(file.tag_name(), "u-list-item");
        assert_eq!(file.state(), FileState::Closed);

        file.pre_open().await.unwrap();
        assert_eq!(file.state(), FileState::Previewed);
        assert_eq!(file.layout(), Layout::Decomposed);

        file.open().await.unwrap();
        assert!(file.is_open());
        assert_eq!(file.section(SectionKind::Script), Some("export default {};\n"));

        file.parse_template()
            .unwrap()
            .root_mut()
            .unwrap()
            .set_attribute("class", Some("x".to_string()));
        file.save().await.unwrap();
        assert!(!file.is_dirty());
        assert_eq!(
            file.store().section(SectionKind::Template),
            Some("<div class=\"x\"></div>\n")
        );

        file.close();
        assert_eq!(file.state(), FileState::Closed);
        assert!(file.section(SectionKind::Template).is_none());
        file.force_open().await.unwrap();
        assert_eq!(
            file.section(SectionKind::Template),
            Some("<div class=\"x\"></div>\n")
        );
    }

    #[tokio::test]
    async fn test_decomposed_without_script() {
        let store = MemoryStore::new(Layout::Decomposed)
            .with_section(SectionKind::Template, "<div></div>\n");
        let mut file = ComponentFile::with_store("u-a.vue", store).unwrap();
        let error = file.open().await.unwrap_err();
        assert!(matches!(error, FileError::Store(StoreError::MissingScript(_))));
    }
}
