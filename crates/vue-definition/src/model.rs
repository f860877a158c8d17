//! The definition graph and its model.

use crate::error::DefinitionError;
use crate::logic::LogicNode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// A named entry of `params`, `variables` or `lifecycles`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedEntry {
    /// The entry's name.
    #[serde(default)]
    pub name: String,
    /// Every other field, in order.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl NamedEntry {
    /// Creates an entry with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: IndexMap::new(),
        }
    }
}

/// A component definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Component parameters.
    #[serde(default)]
    pub params: Vec<NamedEntry>,
    /// Component variables.
    #[serde(default)]
    pub variables: Vec<NamedEntry>,
    /// Lifecycle bindings.
    #[serde(default)]
    pub lifecycles: Vec<NamedEntry>,
    /// Logic trees, each an object with a `name`.
    #[serde(default)]
    pub logics: Vec<LogicNode>,
    /// Unknown top-level fields, in order.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Definition {
    /// Names of params and variables, which share one scope.
    pub fn data_names(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .chain(&self.variables)
            .map(|entry| entry.name.as_str())
    }

    /// Names of logics.
    pub fn logic_names(&self) -> impl Iterator<Item = &str> {
        self.logics.iter().filter_map(LogicNode::name)
    }

    /// Returns true if nothing is defined.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
            && self.variables.is_empty()
            && self.lifecycles.is_empty()
            && self.logics.is_empty()
            && self.extra.is_empty()
    }
}

/// A parsed `definition.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionModel {
    pub(crate) definition: Definition,
}

impl DefinitionModel {
    /// Parses definition JSON. Blank text gives an empty definition.
    pub fn parse(text: &str) -> Result<Self, DefinitionError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let definition = serde_json::from_str(text)?;
        Ok(Self { definition })
    }

    /// Prints the definition as JSON indented by four spaces, with a
    /// trailing newline.
    pub fn generate(&self) -> String {
        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        if let Err(error) = self.definition.serialize(&mut serializer) {
            // Only non-string map keys can fail here, and the model has none.
            tracing::error!(%error, "failed to print definition");
            return String::new();
        }
        let mut text = String::from_utf8_lossy(&out).into_owned();
        text.push('\n');
        text
    }

    /// The definition.
    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    /// The definition, mutably.
    pub fn definition_mut(&mut self) -> &mut Definition {
        &mut self.definition
    }

    /// Returns true if nothing is defined.
    pub fn is_empty(&self) -> bool {
        self.definition.is_empty()
    }
}

impl From<Definition> for DefinitionModel {
    fn from(definition: Definition) -> Self {
        Self { definition }
    }
}
