//! Component file error types.

use camino::Utf8PathBuf;
use thiserror::Error;
use vue_definition::DefinitionError;
use vue_script::ScriptError;
use vue_style::StyleError;
use vue_template::TemplateError;

/// An error raised by a section store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Nothing exists at the component path.
    #[error("cannot find component at: {0}")]
    NotFound(Utf8PathBuf),

    /// A decomposed component without `index.js`.
    #[error("cannot find 'index.js' in decomposed component {0}")]
    MissingScript(Utf8PathBuf),

    /// A file system operation failed.
    #[error("failed to {action} {path}: {source}")]
    Io {
        /// What was being done.
        action: &'static str,
        /// The file involved.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<Utf8PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| StoreError::Io {
            action,
            path,
            source,
        }
    }
}

/// An error raised by a component file operation.
#[derive(Debug, Error)]
pub enum FileError {
    /// The path does not name a `.vue` component.
    #[error("not a vue file: {0}")]
    NotVue(Utf8PathBuf),

    /// The operation needs an open file.
    #[error("component {0} is not open")]
    NotOpen(Utf8PathBuf),

    /// `save_as` never overwrites.
    #[error("file already exists: {0}")]
    Exists(Utf8PathBuf),

    /// A merge target could not be parsed.
    #[error("invalid merge target `{0}`: expected a node route or `line:character`")]
    InvalidTarget(String),

    /// Reading or writing sections failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The template section is invalid.
    #[error("template: {0}")]
    Template(#[from] TemplateError),

    /// The script section is invalid.
    #[error("script: {0}")]
    Script(#[from] ScriptError),

    /// The style section is invalid.
    #[error("style: {0}")]
    Style(#[from] StyleError),

    /// The definition section is invalid.
    #[error("definition: {0}")]
    Definition(#[from] DefinitionError),
}
