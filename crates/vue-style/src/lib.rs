//! Stylesheet model for Vue components.
//!
//! This crate provides:
//! - Lexer (tokenizer) using `logos`
//! - A lossless rule tree: printing a parsed sheet gives back its source
//! - Class enumeration and token-wise class renaming
//! - Merging one CSS-module sheet into another
//!
//! # Example
//!
//! ```
//! use vue_style::StyleModel;
//!
//! let mut host = StyleModel::parse(".root { color: red; }\n").expect("valid css");
//! let fragment = StyleModel::parse(".root { color: blue; }\n").expect("valid css");
//! let renames = host.merge(fragment, None);
//! assert_eq!(renames.get("root"), Some("root1"));
//! ```

mod ast;
mod error;
mod generate;
mod lexer;
mod model;
mod parser;
mod selector;

pub use ast::*;
pub use error::{ParseError, ParseErrorKind, StyleError};
pub use generate::generate;
pub use lexer::{Lexer, Token, TokenKind};
pub use model::StyleModel;
pub use parser::Parser;
pub use selector::{class_tokens, rename_classes, ClassToken};

/// The result of parsing a stylesheet.
#[derive(Debug)]
pub struct ParseResult {
    /// The rule tree, complete even when there are errors.
    pub stylesheet: Stylesheet,
    /// Any errors encountered during parsing.
    pub errors: Vec<ParseError>,
}

/// Parses a stylesheet, collecting errors instead of failing.
pub fn parse(source: &str) -> ParseResult {
    Parser::new(source).parse()
}
