//! Recursive descent parser for stylesheets.

use crate::ast::{AtRule, Comment, Declaration, Rule, StyleNode, Stylesheet};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::ParseResult;
use vue_common::Span;

/// Parser for CSS source.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: Lexer::new(source).collect(),
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parses the source into a stylesheet.
    pub fn parse(mut self) -> ParseResult {
        let (nodes, after) = self.parse_nodes(false);
        ParseResult {
            stylesheet: Stylesheet { nodes, after },
            errors: self.errors,
        }
    }

    fn peek(&self) -> Token {
        // The lexer always ends with `Eof`.
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .cloned()
            .unwrap_or(Token {
                kind: TokenKind::Eof,
                span: Span::from_range(self.source.len()..self.source.len()),
            })
    }

    fn offset(&self) -> usize {
        usize::from(self.peek().span.start)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&mut self, kind: ParseErrorKind, span: Span) {
        self.errors.push(ParseError::new(kind, span));
    }

    fn slice(&self, start: usize, end: usize) -> &'src str {
        &self.source[start..end]
    }

    /// Parses nodes up to the `}` closing the current block, or the end of
    /// file. Returns the nodes and the text after the last one.
    fn parse_nodes(&mut self, nested: bool) -> (Vec<StyleNode>, String) {
        let mut nodes = Vec::new();
        loop {
            let start = self.offset();
            while matches!(self.peek().kind, TokenKind::Whitespace | TokenKind::Semicolon) {
                self.advance();
            }
            let before = self.slice(start, self.offset()).to_string();
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => return (nodes, before),
                TokenKind::RBrace if nested => return (nodes, before),
                TokenKind::RBrace => {
                    self.error(ParseErrorKind::UnexpectedCloseBrace, token.span);
                    self.advance();
                }
                TokenKind::Comment => {
                    self.advance();
                    let text = token.span.slice(self.source);
                    nodes.push(StyleNode::Comment(Comment {
                        before,
                        text: text[2..text.len() - 2].to_string(),
                        span: token.span,
                    }));
                }
                TokenKind::AtKeyword => nodes.push(self.parse_at_rule(before)),
                _ => {
                    if let Some(node) = self.parse_rule_or_declaration(before) {
                        nodes.push(node);
                    }
                }
            }
        }
    }

    /// Advances to the next `{`, `;` or `}` outside parentheses. Returns
    /// the index of the first scanned token and the terminator.
    fn scan(&mut self) -> (usize, Token) {
        let first = self.pos;
        let mut depth = 0usize;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => return (first, token),
                TokenKind::LBrace | TokenKind::Semicolon | TokenKind::RBrace if depth == 0 => {
                    return (first, token);
                }
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth = depth.saturating_sub(1),
                TokenKind::Error => {
                    let text = token.span.slice(self.source).to_string();
                    self.error(ParseErrorKind::InvalidToken { text }, token.span);
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn parse_block(&mut self, open: Token) -> (Vec<StyleNode>, String) {
        self.advance();
        let (nodes, after) = self.parse_nodes(true);
        if !self.eat(TokenKind::RBrace) {
            self.error(ParseErrorKind::UnclosedBlock, open.span);
        }
        (nodes, after)
    }

    fn parse_at_rule(&mut self, before: String) -> StyleNode {
        let keyword = self.peek();
        let start = usize::from(keyword.span.start);
        self.advance();
        let name = keyword.span.slice(self.source)[1..].to_string();

        let name_end = self.offset();
        while self.peek().kind.is_trivia() {
            self.advance();
        }
        let after_name = self.slice(name_end, self.offset()).to_string();

        let params_start = self.offset();
        let (_, terminator) = self.scan();
        let (params, between) =
            split_trailing(self.slice(params_start, usize::from(terminator.span.start)));
        let (params, between) = (params.to_string(), between.to_string());

        let mut at = AtRule {
            before,
            name,
            after_name,
            params,
            between,
            nodes: None,
            after: String::new(),
            semicolon: false,
            span: Span::default(),
        };
        match terminator.kind {
            TokenKind::LBrace => {
                let (nodes, after) = self.parse_block(terminator);
                at.nodes = Some(nodes);
                at.after = after;
            }
            TokenKind::Semicolon => {
                self.advance();
                at.semicolon = true;
            }
            _ => {}
        }
        at.span = Span::from_range(start..self.end_of_previous(start));
        StyleNode::AtRule(at)
    }

    fn parse_rule_or_declaration(&mut self, before: String) -> Option<StyleNode> {
        let start = self.offset();
        let (first, terminator) = self.scan();
        let mut end = usize::from(terminator.span.start);

        if terminator.kind == TokenKind::LBrace {
            let (selector, between) = split_trailing(self.slice(start, end));
            let (selector, between) = (selector.to_string(), between.to_string());
            let (nodes, after) = self.parse_block(terminator);
            return Some(StyleNode::Rule(Rule {
                before,
                selector,
                between,
                nodes,
                after,
                span: Span::from_range(start..self.end_of_previous(start)),
            }));
        }

        // Whitespace before `}` belongs to the block.
        if terminator.kind != TokenKind::Semicolon
            && self.pos > first
            && self.tokens[self.pos - 1].kind.is_trivia()
        {
            self.pos -= 1;
            end = usize::from(self.tokens[self.pos].span.start);
        }

        let colon = self.tokens[first..self.pos]
            .iter()
            .find(|token| token.kind == TokenKind::Colon)
            .map(|token| (usize::from(token.span.start), usize::from(token.span.end)));
        let Some((colon_start, colon_end)) = colon else {
            let word = self.slice(start, end).trim().to_string();
            self.error(
                ParseErrorKind::UnknownWord { word },
                Span::from_range(start..end),
            );
            self.eat(TokenKind::Semicolon);
            return None;
        };

        let (prop, space_before) = split_trailing(self.slice(start, colon_start));
        let rest = self.slice(colon_end, end);
        let value_start = rest.len() - rest.trim_start().len();
        let (value, after) = split_trailing(&rest[value_start..]);
        let declaration = Declaration {
            before,
            prop: prop.to_string(),
            between: format!("{space_before}:{}", &rest[..value_start]),
            value: value.to_string(),
            after: after.to_string(),
            semicolon: self.eat(TokenKind::Semicolon),
            span: Span::from_range(start..self.end_of_previous(start)),
        };
        Some(StyleNode::Declaration(declaration))
    }

    /// End offset of the last consumed token, at least `start`.
    fn end_of_previous(&self, start: usize) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map_or(start, |token| usize::from(token.span.end).max(start))
    }
}

/// Splits trailing whitespace off `text`.
fn split_trailing(text: &str) -> (&str, &str) {
    let trimmed = text.trim_end();
    (trimmed, &text[trimmed.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Stylesheet {
        let result = Parser::new(source).parse();
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        result.stylesheet
    }

    #[test]
    fn test_rule_with_declarations() {
        let sheet = parse(".root {\n    color: red;\n    margin:0 auto\n}\n");
        let StyleNode::Rule(rule) = &sheet.nodes[0] else {
            panic!("expected rule");
        };
        assert_eq!(rule.selector, ".root");
        assert_eq!(rule.between, " ");
        assert_eq!(rule.after, "\n");
        assert_eq!(rule.nodes.len(), 2);
        let StyleNode::Declaration(margin) = &rule.nodes[1] else {
            panic!("expected declaration");
        };
        assert_eq!(margin.prop, "margin");
        assert_eq!(margin.between, ":");
        assert_eq!(margin.value, "0 auto");
        assert!(!margin.semicolon);
        assert_eq!(sheet.after, "\n");
    }

    #[test]
    fn test_at_rules() {
        let sheet = parse("@import url(a.css);\n@media (max-width: 10px) { .a { b: c } }");
        let StyleNode::AtRule(import) = &sheet.nodes[0] else {
            panic!("expected at-rule");
        };
        assert_eq!(import.name, "import");
        assert_eq!(import.params, "url(a.css)");
        assert!(import.semicolon);
        assert!(import.nodes.is_none());

        let StyleNode::AtRule(media) = &sheet.nodes[1] else {
            panic!("expected at-rule");
        };
        assert_eq!(media.params, "(max-width: 10px)");
        assert_eq!(media.nodes.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_semicolon_inside_url() {
        let sheet = parse("a { background: url(data:image/png;base64,AAA); }");
        let StyleNode::Rule(rule) = &sheet.nodes[0] else {
            panic!("expected rule");
        };
        let StyleNode::Declaration(decl) = &rule.nodes[0] else {
            panic!("expected declaration");
        };
        assert_eq!(decl.value, "url(data:image/png;base64,AAA)");
    }

    #[test]
    fn test_errors() {
        let result = Parser::new(".a { color: red").parse();
        assert!(matches!(
            result.errors.as_slice(),
            [ParseError {
                kind: ParseErrorKind::UnclosedBlock,
                ..
            }]
        ));

        let result = Parser::new("}").parse();
        assert_eq!(result.errors[0].kind, ParseErrorKind::UnexpectedCloseBrace);

        let result = Parser::new(".a { color }").parse();
        assert!(matches!(
            &result.errors[0].kind,
            ParseErrorKind::UnknownWord { word } if word == "color"
        ));
    }
}
