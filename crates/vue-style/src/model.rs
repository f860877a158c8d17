//! The stylesheet model of one component.

use crate::ast::{Rule, StyleNode, Stylesheet};
use crate::error::StyleError;
use crate::generate::generate;
use crate::parser::Parser;
use crate::selector::{class_tokens, rename_classes};
use indexmap::IndexSet;
use vue_common::{NameScope, RenameMap};

/// A parsed CSS-module stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleModel {
    sheet: Stylesheet,
}

impl StyleModel {
    /// Parses a stylesheet. Empty text gives an empty sheet.
    pub fn parse(source: &str) -> Result<Self, StyleError> {
        let result = Parser::new(source).parse();
        if !result.errors.is_empty() {
            return Err(StyleError::Parse(result.errors));
        }
        Ok(Self {
            sheet: result.stylesheet,
        })
    }

    /// Prints the sheet.
    pub fn generate(&self) -> String {
        generate(&self.sheet)
    }

    /// Returns the rule tree.
    pub fn sheet(&self) -> &Stylesheet {
        &self.sheet
    }

    /// Returns the rule tree mutably.
    pub fn sheet_mut(&mut self) -> &mut Stylesheet {
        &mut self.sheet
    }

    /// Returns true if the sheet has no nodes.
    pub fn is_empty(&self) -> bool {
        self.sheet.nodes.is_empty()
    }

    /// Calls `visit` on every rule, including rules nested in at-rules.
    pub fn walk_rules<'a>(&'a self, mut visit: impl FnMut(&'a Rule)) {
        walk(&self.sheet.nodes, &mut visit);
    }

    /// Calls `visit` on every rule mutably.
    pub fn walk_rules_mut(&mut self, mut visit: impl FnMut(&mut Rule)) {
        walk_mut(&mut self.sheet.nodes, &mut visit);
    }

    /// Returns every class name used in a selector, in first-use order.
    pub fn classes(&self) -> IndexSet<String> {
        let mut classes = IndexSet::new();
        self.walk_rules(|rule| {
            for token in class_tokens(&rule.selector) {
                classes.insert(token.name.to_string());
            }
        });
        classes
    }

    /// Renames the class `old` in every selector. Returns false if no
    /// selector used it.
    pub fn rename_class(&mut self, old: &str, new: &str) -> bool {
        let renames: RenameMap = [(old, new)].into_iter().collect();
        self.rename_classes(&renames)
    }

    fn rename_classes(&mut self, renames: &RenameMap) -> bool {
        let mut changed = false;
        self.walk_rules_mut(|rule| {
            if let Some(selector) = rename_classes(&rule.selector, renames) {
                rule.selector = selector;
                changed = true;
            }
        });
        changed
    }

    /// Merges `fragment` into this sheet at top-level `index` (the end by
    /// default, clamped to the node count).
    ///
    /// Fragment classes that the host already uses are renamed in every
    /// fragment selector. Returns the class renames without dots.
    pub fn merge(&mut self, mut fragment: StyleModel, index: Option<usize>) -> RenameMap {
        let host = self.classes();
        let used = fragment.classes();
        let mut scope: NameScope = host.iter().chain(&used).cloned().collect();

        let mut renames = RenameMap::new();
        for class in &used {
            if host.contains(class) {
                let new = scope.allocate(class);
                tracing::debug!(old = %class, new = %new, "renaming fragment class");
                renames.insert(class.as_str(), new);
            }
        }
        if !renames.is_empty() {
            fragment.rename_classes(&renames);
        }

        let len = self.sheet.nodes.len();
        let index = index.map_or(len, |index| index.min(len));
        self.splice(fragment.sheet.nodes, index);
        renames
    }

    /// Appends `fragment`'s nodes without renaming anything.
    pub fn append(&mut self, fragment: StyleModel) {
        let len = self.sheet.nodes.len();
        self.splice(fragment.sheet.nodes, len);
    }

    /// Inserts nodes with a blank line between the fragment and the host.
    fn splice(&mut self, mut nodes: Vec<StyleNode>, index: usize) {
        if nodes.is_empty() {
            return;
        }
        if index > 0 {
            nodes[0].set_before("\n\n");
        } else if let Some(next) = self.sheet.nodes.first_mut() {
            next.set_before("\n\n");
        }
        tracing::debug!(count = nodes.len(), index, "inserting style nodes");
        self.sheet.nodes.splice(index..index, nodes);
    }
}

fn walk<'a>(nodes: &'a [StyleNode], visit: &mut impl FnMut(&'a Rule)) {
    for node in nodes {
        if let StyleNode::Rule(rule) = node {
            visit(rule);
        }
        if let Some(children) = node.children() {
            walk(children, visit);
        }
    }
}

fn walk_mut(nodes: &mut [StyleNode], visit: &mut impl FnMut(&mut Rule)) {
    for node in nodes {
        if let StyleNode::Rule(rule) = node {
            visit(rule);
        }
        if let Some(children) = node.children_mut() {
            walk_mut(children, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classes_include_nested_rules() {
        let model = StyleModel::parse(
            ".root { color: red; }\n@media (max-width: 10px) {\n    .root .title { }\n}\n",
        )
        .unwrap();
        let classes: Vec<_> = model.classes().into_iter().collect();
        assert_eq!(classes, vec!["root", "title"]);
    }

    #[test]
    fn test_rename_class() {
        let mut model = StyleModel::parse(".a { }\n.a:hover .b { }\n").unwrap();
        assert!(model.rename_class("a", "z"));
        assert!(!model.rename_class("missing", "y"));
        assert_eq!(model.generate(), ".z { }\n.z:hover .b { }\n");
    }

    #[test]
    fn test_merge_renames_and_spaces_first_node() {
        let mut host = StyleModel::parse(".root { }\n.title { }\n").unwrap();
        let fragment = StyleModel::parse(".root { }\n.root:hover .title1 { }\n").unwrap();
        let renames = host.merge(fragment, None);
        assert_eq!(renames.get("root"), Some("root1"));
        assert_eq!(renames.get("title1"), None);
        assert_eq!(
            host.generate(),
            ".root { }\n.title { }\n\n.root1 { }\n.root1:hover .title1 { }\n"
        );
    }

    #[test]
    fn test_merge_avoids_fragment_names() {
        let mut host = StyleModel::parse(".a { }").unwrap();
        let fragment = StyleModel::parse(".a { }\n.a1 { }").unwrap();
        let renames = host.merge(fragment, Some(0));
        assert_eq!(renames.get("a"), Some("a2"));
        assert_eq!(host.generate(), ".a2 { }\n.a1 { }\n\n.a { }");
    }

    #[test]
    fn test_merge_into_empty_host() {
        let mut host = StyleModel::parse("").unwrap();
        host.append(StyleModel::parse(".a { }\n").unwrap());
        assert_eq!(host.generate(), ".a { }");
    }
}
