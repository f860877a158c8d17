//! Template model for Vue components.
//!
//! This crate provides:
//! - Lexer (tokenizer) using `logos`
//! - Recursive descent parser for component markup
//! - AST types with derived views of bindings, events and directives
//! - Indentation-aware markup generation
//! - Node paths, traversal and removal
//! - Grafting one template into another with ref and identifier renames
//!
//! # Example
//!
//! ```
//! use vue_template::TemplateModel;
//!
//! let model = TemplateModel::parse(r#"<div><u-button @click="save">Save</u-button></div>"#)
//!     .expect("valid template");
//! assert_eq!(
//!     model.generate(),
//!     "<div>\n    <u-button @click=\"save\">Save</u-button>\n</div>\n"
//! );
//! ```

mod ast;
mod error;
mod expression;
mod generate;
mod lexer;
mod merge;
mod model;
mod parser;
mod traverse;

pub use ast::*;
pub use error::{ParseError, ParseErrorKind, TemplateError};
pub use expression::{
    fix_class_binding, fix_expression, fix_handler, rename_tokens, ExpressionRenames, Fixed,
};
pub use generate::{generate, TemplateOptions};
pub use lexer::{Lexer, Token, TokenKind};
pub use merge::TemplateMerge;
pub use model::TemplateModel;
pub use parser::Parser;
pub use traverse::{
    find_by_path, find_by_path_mut, remove, traverse, walk_element_mut, walk_mut, InsertTarget,
    NodeMut, NodePath,
};

/// The result of parsing a template.
#[derive(Debug)]
pub struct ParseResult {
    /// The root element, if any.
    pub root: Option<Element>,
    /// Any errors encountered during parsing.
    pub errors: Vec<ParseError>,
}

/// Parses a template, collecting errors instead of failing.
pub fn parse(source: &str) -> ParseResult {
    Parser::new(source).parse()
}
