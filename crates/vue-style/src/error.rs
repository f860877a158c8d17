//! Stylesheet error types.

use thiserror::Error;
use vue_common::Span;

/// An error that occurred during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// The location in the source where the error occurred.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A block opened with `{` was never closed.
    #[error("unclosed block")]
    UnclosedBlock,

    /// A `}` without a matching `{`.
    #[error("unexpected '}}'")]
    UnexpectedCloseBrace,

    /// Text that is neither a rule nor a declaration.
    #[error("unknown word `{word}`")]
    UnknownWord {
        /// The offending text.
        word: String,
    },

    /// An unterminated comment or string, or a stray character.
    #[error("invalid token `{text}`")]
    InvalidToken {
        /// The offending text.
        text: String,
    },
}

/// An error raised by a stylesheet operation.
#[derive(Debug, Error)]
pub enum StyleError {
    /// The source has syntax errors.
    #[error("stylesheet has {} syntax error(s); first: {}", .0.len(), .0[0])]
    Parse(Vec<ParseError>),
}
