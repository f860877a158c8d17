//! Template error types.

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
    /// An unexpected token was encountered.
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        /// What was expected.
        expected: String,
        /// What was found.
        found: String,
    },

    /// An unclosed tag was found.
    #[error("unclosed tag: <{tag_name}>")]
    UnclosedTag {
        /// The name of the unclosed tag.
        tag_name: String,
    },

    /// A mismatched closing tag was found.
    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        /// The expected tag name.
        expected: String,
        /// The found tag name.
        found: String,
    },

    /// An unterminated comment or quoted value.
    #[error("unterminated {what}")]
    Unterminated {
        /// What was left open.
        what: &'static str,
    },

    /// A `v-else` or `v-else-if` without a preceding `v-if` sibling.
    #[error("<{tag_name}> uses {directive} without a preceding v-if")]
    OrphanBranch {
        /// The element's tag.
        tag_name: String,
        /// `v-else` or `v-else-if`.
        directive: String,
    },

    /// Text or a second element outside the single root element.
    #[error("component template should contain exactly one root element")]
    MultipleRoots,
}

/// An error raised by a template operation.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The source has syntax errors.
    #[error("template has {} syntax error(s); first: {}", .0.len(), .0[0])]
    Parse(Vec<ParseError>),

    /// A node path or insertion route could not be parsed.
    #[error("invalid node route `{route}`")]
    InvalidRoute {
        /// The route as given.
        route: String,
    },

    /// The addressed node does not exist.
    #[error("no node at path `{path}`")]
    PathOutOfRange {
        /// The requested node path.
        path: String,
    },

    /// The addressed node is text, not an element.
    #[error("not an element node: `{path}`")]
    TargetNotElement {
        /// The requested node path.
        path: String,
    },

    /// The template has no root element to insert into.
    #[error("template is empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ParseError::new(
            ParseErrorKind::MismatchedClosingTag {
                expected: "div".to_string(),
                found: "span".to_string(),
            },
            Span::from_range(0..6),
        );
        assert_eq!(
            error.to_string(),
            "mismatched closing tag: expected </div>, found </span>"
        );
    }

    #[test]
    fn test_template_error_display() {
        let error = TemplateError::TargetNotElement {
            path: "/0".to_string(),
        };
        assert_eq!(error.to_string(), "not an element node: `/0`");
    }
}
