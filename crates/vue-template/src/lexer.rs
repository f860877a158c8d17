//! Template lexer using logos.
//!
//! Only tag syntax is tokenized. Text content, comments and quoted
//! attribute values are read straight from the source by the parser, so
//! every `<`, `"` and `'` character is guaranteed to start its own token and
//! the parser can always resynchronize after reading raw text.

use logos::Logos;
use vue_common::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token in the source.
    pub span: Span,
}

/// Token kinds for template markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
pub enum TokenKind {
    /// `<!--`
    #[token("<!--", priority = 12)]
    CommentOpen,

    /// `</`
    #[token("</", priority = 11)]
    LAngleSlash,

    /// `<`
    #[token("<", priority = 10)]
    LAngle,

    /// `/>`
    #[token("/>", priority = 11)]
    SlashRAngle,

    /// `>`
    #[token(">", priority = 10)]
    RAngle,

    /// `/`
    #[token("/", priority = 10)]
    Slash,

    /// `=`
    #[token("=", priority = 10)]
    Eq,

    /// `"`
    #[token("\"", priority = 10)]
    DoubleQuote,

    /// `'`
    #[token("'", priority = 10)]
    SingleQuote,

    /// Spaces, tabs and newlines.
    #[regex(r"[ \t\r\n\x0C]+", priority = 5)]
    Whitespace,

    /// A tag name, attribute name or unquoted attribute value.
    #[regex(r#"[^ \t\r\n\x0C"'<>/=]+"#, priority = 4)]
    Name,

    /// End of file
    Eof,

    /// Invalid/unknown token
    #[default]
    Error,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::CommentOpen => "'<!--'",
            TokenKind::LAngleSlash => "'</'",
            TokenKind::LAngle => "'<'",
            TokenKind::SlashRAngle => "'/>'",
            TokenKind::RAngle => "'>'",
            TokenKind::Slash => "'/'",
            TokenKind::Eq => "'='",
            TokenKind::DoubleQuote => "'\"'",
            TokenKind::SingleQuote => "'''",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Name => "name",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }
}

/// A lexer for template source.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            finished: false,
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(kind)) => Some(Token {
                kind,
                span: Span::from_range(self.inner.span()),
            }),
            Some(Err(())) => Some(Token {
                kind: TokenKind::Error,
                span: Span::from_range(self.inner.span()),
            }),
            None => {
                self.finished = true;
                let end = self.source.len();
                Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::from_range(end..end),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Eof)
            .collect()
    }

    #[test]
    fn test_simple_tag() {
        assert_eq!(
            tokenize("<div>"),
            vec![TokenKind::LAngle, TokenKind::Name, TokenKind::RAngle]
        );
    }

    #[test]
    fn test_self_closing_tag() {
        assert_eq!(
            tokenize("<u-input/>"),
            vec![TokenKind::LAngle, TokenKind::Name, TokenKind::SlashRAngle]
        );
    }

    #[test]
    fn test_directive_attribute() {
        assert_eq!(
            tokenize(r#"<a @click.native="go">"#),
            vec![
                TokenKind::LAngle,
                TokenKind::Name,
                TokenKind::Whitespace,
                TokenKind::Name,
                TokenKind::Eq,
                TokenKind::DoubleQuote,
                TokenKind::Name,
                TokenKind::DoubleQuote,
                TokenKind::RAngle,
            ]
        );
    }

    #[test]
    fn test_comment_open() {
        assert_eq!(
            tokenize("<!-- x -->"),
            vec![
                TokenKind::CommentOpen,
                TokenKind::Whitespace,
                TokenKind::Name,
                TokenKind::Whitespace,
                TokenKind::Name,
                TokenKind::RAngle,
            ]
        );
    }
}
