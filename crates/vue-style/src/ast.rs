//! Stylesheet AST.
//!
//! Every node keeps the text around it (`before`, `between`, `after`), so
//! printing a parsed sheet gives back the exact source.

use vue_common::Span;

/// A parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Top-level nodes in order.
    pub nodes: Vec<StyleNode>,
    /// Text after the last node.
    pub after: String,
}

/// A stylesheet node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleNode {
    /// `selector { ... }`
    Rule(Rule),
    /// `@name params { ... }` or `@name params;`
    AtRule(AtRule),
    /// `prop: value`
    Declaration(Declaration),
    /// `/* text */`
    Comment(Comment),
}

impl StyleNode {
    /// Returns the text before this node.
    pub fn before(&self) -> &str {
        match self {
            StyleNode::Rule(rule) => &rule.before,
            StyleNode::AtRule(at) => &at.before,
            StyleNode::Declaration(decl) => &decl.before,
            StyleNode::Comment(comment) => &comment.before,
        }
    }

    /// Replaces the text before this node.
    pub fn set_before(&mut self, before: impl Into<String>) {
        let before = before.into();
        match self {
            StyleNode::Rule(rule) => rule.before = before,
            StyleNode::AtRule(at) => at.before = before,
            StyleNode::Declaration(decl) => decl.before = before,
            StyleNode::Comment(comment) => comment.before = before,
        }
    }

    /// Returns the source span, empty for built nodes.
    pub fn span(&self) -> Span {
        match self {
            StyleNode::Rule(rule) => rule.span,
            StyleNode::AtRule(at) => at.span,
            StyleNode::Declaration(decl) => decl.span,
            StyleNode::Comment(comment) => comment.span,
        }
    }

    /// Returns the child nodes of a block.
    pub fn children(&self) -> Option<&[StyleNode]> {
        match self {
            StyleNode::Rule(rule) => Some(&rule.nodes),
            StyleNode::AtRule(at) => at.nodes.as_deref(),
            _ => None,
        }
    }

    /// Returns the child nodes of a block mutably.
    pub fn children_mut(&mut self) -> Option<&mut Vec<StyleNode>> {
        match self {
            StyleNode::Rule(rule) => Some(&mut rule.nodes),
            StyleNode::AtRule(at) => at.nodes.as_mut(),
            _ => None,
        }
    }
}

/// A qualified rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Text before the selector.
    pub before: String,
    /// The selector, comments included.
    pub selector: String,
    /// Whitespace between the selector and `{`.
    pub between: String,
    /// The block's nodes.
    pub nodes: Vec<StyleNode>,
    /// Text before `}`.
    pub after: String,
    /// The source span.
    pub span: Span,
}

/// An at-rule, with or without a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Text before `@`.
    pub before: String,
    /// The name without `@`.
    pub name: String,
    /// Whitespace after the name.
    pub after_name: String,
    /// The params.
    pub params: String,
    /// Whitespace after the params, before `{` or `;`.
    pub between: String,
    /// The block's nodes, `None` for statements such as `@import`.
    pub nodes: Option<Vec<StyleNode>>,
    /// Text before `}`.
    pub after: String,
    /// Whether a statement at-rule ends with `;`.
    pub semicolon: bool,
    /// The source span.
    pub span: Span,
}

/// A `prop: value` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Text before the property.
    pub before: String,
    /// The property name.
    pub prop: String,
    /// The colon with the whitespace around it.
    pub between: String,
    /// The value, `!important` included.
    pub value: String,
    /// Whitespace after the value.
    pub after: String,
    /// Whether the declaration ends with `;`.
    pub semicolon: bool,
    /// The source span.
    pub span: Span,
}

/// A comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Text before `/*`.
    pub before: String,
    /// The text between `/*` and `*/`.
    pub text: String,
    /// The source span.
    pub span: Span,
}
