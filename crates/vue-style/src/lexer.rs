//! Stylesheet lexer using logos.
//!
//! Only the characters that decide structure get their own tokens. The
//! parser rebuilds selectors, values and params by slicing the source
//! between tokens, so nothing the lexer sees is ever lost.

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

/// Token kinds for CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
pub enum TokenKind {
    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `:`
    #[token(":")]
    Colon,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `/* ... */`
    #[token("/*", block_comment)]
    Comment,

    /// A quoted string.
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    String,

    /// `@media`, `@import`, ...
    #[regex(r"@[-_a-zA-Z0-9]+")]
    AtKeyword,

    /// Spaces, tabs and newlines.
    #[regex(r"[ \t\r\n\x0C]+")]
    Whitespace,

    /// Anything else: selectors, property names and value words.
    #[regex(r#"[^ \t\r\n\x0C{};:()"'/@]+"#)]
    #[token("/")]
    #[token("@")]
    Word,

    /// End of file
    Eof,

    /// Invalid/unknown token
    #[default]
    Error,
}

fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comment => "comment",
            TokenKind::String => "string",
            TokenKind::AtKeyword => "at-keyword",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Word => "word",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }

    /// Returns true for whitespace.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }
}

/// A lexer for stylesheet source.
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
    use pretty_assertions::assert_eq;

    fn tokenize(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Eof)
            .collect()
    }

    #[test]
    fn test_rule() {
        assert_eq!(
            tokenize(".root{color:red}"),
            vec![
                TokenKind::Word,
                TokenKind::LBrace,
                TokenKind::Word,
                TokenKind::Colon,
                TokenKind::Word,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_comment_and_string() {
        assert_eq!(
            tokenize("/* a; b */ content: ';'"),
            vec![
                TokenKind::Comment,
                TokenKind::Whitespace,
                TokenKind::Word,
                TokenKind::Colon,
                TokenKind::Whitespace,
                TokenKind::String,
            ]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        assert!(tokenize("/* open").contains(&TokenKind::Error));
    }

    #[test]
    fn test_at_keyword_and_slash() {
        assert_eq!(
            tokenize("@media a/b"),
            vec![
                TokenKind::AtKeyword,
                TokenKind::Whitespace,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Word,
            ]
        );
    }
}
