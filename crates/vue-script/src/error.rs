//! Script error types.

use thiserror::Error;
use vue_common::Span;

/// An error raised by a script operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// The source is not valid JavaScript.
    #[error("syntax error: {message}")]
    Parse {
        /// The parser's message.
        message: String,
        /// Where the error was found.
        span: Span,
    },

    /// A value given as source text is not a single expression.
    #[error("invalid value `{source_text}`: {message}")]
    InvalidValue {
        /// The text as given.
        source_text: String,
        /// The parser's message.
        message: String,
    },

    /// The default export does not resolve to an object literal.
    #[error("default export is not an object literal")]
    NotAnObject,

    /// The script has no default export.
    #[error("script has no default export")]
    NoDefaultExport,
}
