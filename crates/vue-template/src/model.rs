//! The template model of one component.

use crate::ast::{Element, TemplateNode};
use crate::error::TemplateError;
use crate::generate::{generate, TemplateOptions};
use crate::merge::{collect_refs, insert, prepare_fragment, TemplateMerge};
use crate::parser::Parser;
use crate::traverse::{self, walk_mut, InsertTarget, NodeMut, NodePath};
use vue_common::{LineIndex, Position, RenameBundle};

/// A parsed component template.
///
/// Node spans refer to the text the model was parsed from. Nodes grafted in
/// by [`TemplateModel::merge`] have empty spans.
#[derive(Debug, Clone, Default)]
pub struct TemplateModel {
    source: String,
    root: Option<TemplateNode>,
    options: TemplateOptions,
}

impl TemplateModel {
    /// Parses a template with default options.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        Self::parse_with_options(source, TemplateOptions::default())
    }

    /// Parses a template. Blank text gives an empty model.
    pub fn parse_with_options(source: &str, options: TemplateOptions) -> Result<Self, TemplateError> {
        let result = Parser::new(source).parse();
        if !result.errors.is_empty() {
            return Err(TemplateError::Parse(result.errors));
        }
        Ok(Self {
            source: source.to_string(),
            root: result.root.map(TemplateNode::Element),
            options,
        })
    }

    /// Returns the generation options.
    pub fn options(&self) -> TemplateOptions {
        self.options
    }

    /// Replaces the generation options.
    pub fn set_options(&mut self, options: TemplateOptions) {
        self.options = options;
    }

    /// Returns the root element.
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref().and_then(TemplateNode::as_element)
    }

    /// Returns the root element mutably.
    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.root.as_mut().and_then(TemplateNode::as_element_mut)
    }

    /// Returns true if the template has no root element.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Generates markup, or an empty string for an empty template.
    pub fn generate(&self) -> String {
        self.root()
            .map(|root| generate(root, &self.options))
            .unwrap_or_default()
    }

    /// Visits every addressable node breadth-first with its path.
    pub fn traverse<'a>(&'a self, visit: impl FnMut(&'a TemplateNode, &NodePath)) {
        if let Some(root) = &self.root {
            traverse::traverse(root, visit);
        }
    }

    /// Resolves a node path.
    pub fn find_by_path(&self, path: &NodePath) -> Option<&TemplateNode> {
        traverse::find_by_path(self.root.as_ref()?, path)
    }

    /// Returns the path of the deepest element containing `position`.
    ///
    /// The position's character is counted from the generated indentation
    /// of the root. Positions outside the template resolve to the root.
    pub fn find_by_position(&self, position: Position) -> NodePath {
        let index = LineIndex::new(&self.source);
        let Some(offset) = index.offset(position, self.options.root_indent() as u32) else {
            return NodePath::root();
        };
        let mut found = NodePath::root();
        self.traverse(|node, path| {
            if matches!(node, TemplateNode::Element(_)) && node.span().contains(offset) {
                found = path.clone();
            }
        });
        found
    }

    /// Removes the node at `path`. Removing the root empties the template.
    pub fn remove(&mut self, path: &NodePath) -> Result<TemplateNode, TemplateError> {
        let out_of_range = || TemplateError::PathOutOfRange {
            path: path.to_string(),
        };
        if path.is_root() {
            return self.root.take().ok_or_else(out_of_range);
        }
        let root = self.root.as_mut().ok_or_else(out_of_range)?;
        traverse::remove(root, path).ok_or_else(out_of_range)
    }

    /// Calls `visit` on every element, including `v-if` branches.
    pub fn for_each_element_mut(&mut self, mut visit: impl FnMut(&mut Element)) {
        if let Some(root) = &mut self.root {
            walk_mut(root, &mut |node| {
                if let NodeMut::Element(el) = node {
                    visit(el);
                }
            });
        }
    }

    /// Returns every static `ref` name in document order.
    pub fn refs(&self) -> Vec<String> {
        let mut refs = Vec::new();
        if let Some(root) = self.root() {
            collect_refs(root, &mut refs);
        }
        refs
    }

    /// Grafts `fragment` into this template.
    ///
    /// The fragment's colliding refs are renamed, its expressions are
    /// rewritten through `renames`, and its root is inserted at `target`.
    /// An empty host adopts the fragment's root.
    pub fn merge(
        &mut self,
        fragment: TemplateModel,
        target: &InsertTarget,
        renames: &RenameBundle,
    ) -> Result<TemplateMerge, TemplateError> {
        let Some(TemplateNode::Element(mut node)) = fragment.root else {
            return Ok(TemplateMerge::default());
        };
        let merge = prepare_fragment(&mut node, &self.refs(), renames);

        let (parent, index) = match target {
            InsertTarget::Path { parent, index } => (parent.clone(), *index),
            InsertTarget::Position(position) => (self.find_by_position(*position), None),
        };
        match &mut self.root {
            Some(root) => insert(root, &parent, index, node)?,
            None => {
                tracing::debug!("host template is empty; adopting fragment root");
                self.root = Some(TemplateNode::Element(node));
            }
        }
        Ok(merge)
    }
}
