//! AST types for component templates.
//!
//! An element's attribute list is the only place attribute values live.
//! Bindings, events, directives, conditionals and the repeat expression are
//! read from it on demand, so rewriting an attribute value updates every
//! view of it at once.

use indexmap::IndexMap;
use smol_str::SmolStr;
use vue_common::Span;

/// A node in the template tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// An element such as `<div>` or `<u-button>`.
    Element(Element),
    /// Plain text.
    Text(Text),
    /// Text containing `{{ }}` interpolations.
    Expression(ExpressionText),
}

impl TemplateNode {
    /// Returns the span of this node.
    pub fn span(&self) -> Span {
        match self {
            TemplateNode::Element(el) => el.span,
            TemplateNode::Text(text) => text.span,
            TemplateNode::Expression(expr) => expr.span,
        }
    }

    /// Returns the element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            TemplateNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Returns the element mutably, if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            TemplateNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub(crate) fn clear_spans(&mut self) {
        match self {
            TemplateNode::Element(el) => el.clear_spans(),
            TemplateNode::Text(text) => text.span = Span::default(),
            TemplateNode::Expression(expr) => expr.span = Span::default(),
        }
    }
}

/// An element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// The span of the element, from `<` to the end of its closing tag.
    pub span: Span,
    /// The tag name.
    pub tag: SmolStr,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Child nodes, excluding scoped-slot templates.
    pub children: Vec<TemplateNode>,
    /// Scoped-slot `<template>` children keyed by slot name.
    pub slots: IndexMap<SmolStr, TemplateNode>,
    /// `v-else-if` / `v-else` siblings chained to this `v-if` element.
    pub branches: Vec<Element>,
    /// Whether the source used `<tag />`.
    pub self_closing: bool,
}

/// The conditional directive of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition<'a> {
    /// `v-if="expr"`
    If(&'a str),
    /// `v-else-if="expr"`
    ElseIf(&'a str),
    /// `v-else`
    Else,
}

/// The parts of a `v-for` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeat<'a> {
    /// The alias part, e.g. `(item, index)`.
    pub alias: &'a str,
    /// `in` or `of`.
    pub keyword: &'a str,
    /// The iterated expression.
    pub source: &'a str,
}

impl Element {
    /// Creates an element with the given tag and no attributes.
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Returns the attribute with the given raw name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Returns the value of the attribute with the given raw name.
    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(|attr| attr.value.as_deref())
    }

    /// Returns true if the element has an attribute with this raw name.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Sets an attribute value, appending the attribute if missing.
    pub fn set_attribute(&mut self, name: &str, value: Option<String>) {
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute {
                span: Span::default(),
                name: name.into(),
                value,
            }),
        }
    }

    /// Removes an attribute, returning it.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        let index = self.attributes.iter().position(|attr| attr.name == name)?;
        Some(self.attributes.remove(index))
    }

    /// Returns the static `ref` name.
    pub fn ref_name(&self) -> Option<&str> {
        self.attribute_value("ref")
    }

    /// Returns the `:class` / `v-bind:class` expression.
    pub fn class_binding(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.kind() == AttributeKind::Bind("class"))
            .and_then(|attr| attr.value.as_deref())
    }

    /// Returns the element's conditional directive.
    pub fn condition(&self) -> Option<Condition<'_>> {
        self.attributes.iter().find_map(|attr| match attr.name.as_str() {
            "v-if" => Some(Condition::If(attr.value.as_deref().unwrap_or_default())),
            "v-else-if" => Some(Condition::ElseIf(
                attr.value.as_deref().unwrap_or_default(),
            )),
            "v-else" => Some(Condition::Else),
            _ => None,
        })
    }

    /// Returns the parsed `v-for` value.
    pub fn repeat(&self) -> Option<Repeat<'_>> {
        split_repeat(self.attribute_value("v-for")?)
    }

    /// Returns the scoped-slot name if this is a slot template.
    pub fn slot_target(&self) -> Option<SmolStr> {
        if self.tag != "template" {
            return None;
        }
        let mut scoped = false;
        let mut target = None;
        for attr in &self.attributes {
            match attr.kind() {
                AttributeKind::SlotScope => scoped = true,
                AttributeKind::Slot(name) => {
                    scoped = true;
                    target = Some(name);
                }
                AttributeKind::Static if attr.name == "slot" => {
                    target = attr.value.as_deref();
                }
                _ => {}
            }
        }
        scoped.then(|| SmolStr::new(target.filter(|t| !t.is_empty()).unwrap_or("default")))
    }

    /// Child nodes addressable by index: children first, then slot templates.
    pub fn addressable(&self) -> impl Iterator<Item = &TemplateNode> {
        self.children.iter().chain(self.slots.values())
    }

    /// Returns the addressable child at `index`.
    pub fn child(&self, index: usize) -> Option<&TemplateNode> {
        self.addressable().nth(index)
    }

    /// Returns the addressable child at `index` mutably.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut TemplateNode> {
        self.children
            .iter_mut()
            .chain(self.slots.values_mut())
            .nth(index)
    }

    /// Returns the number of addressable children.
    pub fn child_count(&self) -> usize {
        self.children.len() + self.slots.len()
    }

    pub(crate) fn clear_spans(&mut self) {
        self.span = Span::default();
        for attr in &mut self.attributes {
            attr.span = Span::default();
        }
        for child in self.children.iter_mut().chain(self.slots.values_mut()) {
            child.clear_spans();
        }
        for branch in &mut self.branches {
            branch.clear_spans();
        }
    }
}

/// Splits a `v-for` value into alias, keyword and source.
pub fn split_repeat(value: &str) -> Option<Repeat<'_>> {
    let bytes = value.as_bytes();
    let mut depth = 0i32;
    for (i, c) in value.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ if depth == 0 && c.is_whitespace() => {
                let start = i + c.len_utf8();
                for keyword in ["in", "of"] {
                    let after = start + keyword.len();
                    if value[start..].starts_with(keyword)
                        && bytes.get(after).is_some_and(|b| b.is_ascii_whitespace())
                    {
                        return Some(Repeat {
                            alias: value[..i].trim(),
                            keyword,
                            source: value[after..].trim(),
                        });
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// A `name="value"` pair on an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// The span of the whole attribute.
    pub span: Span,
    /// The raw name, including any `:`, `@`, `#` or `v-` prefix.
    pub name: SmolStr,
    /// The value, or `None` for a bare attribute such as `disabled`.
    pub value: Option<String>,
}

/// How an attribute's name classifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind<'a> {
    /// A plain HTML attribute.
    Static,
    /// `:prop` or `v-bind:prop` (prop without modifiers).
    Bind(&'a str),
    /// `@event` or `v-on:event` (event without modifiers).
    On(&'a str),
    /// `v-slot[:name]` or `#name`.
    Slot(&'a str),
    /// `slot-scope` or `scope`.
    SlotScope,
    /// `v-for`
    For,
    /// Any other `v-` directive, by name without the prefix.
    Directive(&'a str),
}

impl Attribute {
    /// Classifies the attribute by its name.
    pub fn kind(&self) -> AttributeKind<'_> {
        classify(&self.name)
    }

    /// Returns true if the value is a JavaScript expression.
    pub fn is_expression(&self) -> bool {
        matches!(
            self.kind(),
            AttributeKind::Bind(_) | AttributeKind::On(_) | AttributeKind::Directive(_)
        )
    }
}

fn classify(name: &str) -> AttributeKind<'_> {
    let base = |s: &str| -> usize { s.find('.').unwrap_or(s.len()) };
    if let Some(rest) = name.strip_prefix(':') {
        return AttributeKind::Bind(&rest[..base(rest)]);
    }
    if let Some(rest) = name.strip_prefix("v-bind:") {
        return AttributeKind::Bind(&rest[..base(rest)]);
    }
    if let Some(rest) = name.strip_prefix('@') {
        return AttributeKind::On(&rest[..base(rest)]);
    }
    if let Some(rest) = name.strip_prefix("v-on:") {
        return AttributeKind::On(&rest[..base(rest)]);
    }
    if let Some(rest) = name.strip_prefix('#') {
        return AttributeKind::Slot(rest);
    }
    if name == "v-slot" {
        return AttributeKind::Slot("");
    }
    if let Some(rest) = name.strip_prefix("v-slot:") {
        return AttributeKind::Slot(rest);
    }
    if name == "slot-scope" || name == "scope" {
        return AttributeKind::SlotScope;
    }
    if name == "v-for" {
        return AttributeKind::For;
    }
    if let Some(rest) = name.strip_prefix("v-") {
        let end = rest.find([':', '.']).unwrap_or(rest.len());
        return AttributeKind::Directive(&rest[..end]);
    }
    AttributeKind::Static
}

/// Plain text content.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// The span of the text.
    pub span: Span,
    /// The raw text.
    pub data: String,
}

/// Text that contains `{{ }}` interpolations.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionText {
    /// The span of the text.
    pub span: Span,
    /// The raw text as it will be generated.
    pub text: String,
    /// The text split into static runs and interpolated expressions.
    pub tokens: Vec<TextToken>,
}

/// A piece of an [`ExpressionText`].
#[derive(Debug, Clone, PartialEq)]
pub enum TextToken {
    /// Literal text.
    Static(String),
    /// The trimmed expression inside `{{ }}`.
    Binding(String),
}

impl ExpressionText {
    /// Rebuilds `text` from the tokens, writing bindings as `{{ expr }}`.
    pub fn rebuild_text(&mut self) {
        let mut text = String::with_capacity(self.text.len());
        for token in &self.tokens {
            match token {
                TextToken::Static(s) => text.push_str(s),
                TextToken::Binding(expr) => {
                    text.push_str("{{ ");
                    text.push_str(expr);
                    text.push_str(" }}");
                }
            }
        }
        self.text = text;
    }
}

/// Splits text into static runs and `{{ }}` bindings. Returns `None` when
/// the text holds no complete interpolation.
pub fn split_interpolations(text: &str) -> Option<Vec<TextToken>> {
    let mut tokens = Vec::new();
    let mut rest = text;
    let mut found = false;
    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        if open > 0 {
            tokens.push(TextToken::Static(rest[..open].to_string()));
        }
        let expr = &rest[open + 2..open + 2 + close];
        tokens.push(TextToken::Binding(expr.trim().to_string()));
        rest = &rest[open + 2 + close + 2..];
        found = true;
    }
    if !rest.is_empty() {
        tokens.push(TextToken::Static(rest.to_string()));
    }
    found.then_some(tokens)
}
