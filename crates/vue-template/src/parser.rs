//! Recursive descent parser for component templates.

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::ParseResult;
use indexmap::IndexMap;
use smol_str::SmolStr;
use vue_common::Span;

/// HTML void elements, which never have children or closing tags.
const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Returns true if the given element name is an HTML void element.
pub(crate) fn is_void_element(name: &str) -> bool {
    HTML_VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}

/// The template parser.
pub struct Parser<'src> {
    /// The source being parsed.
    source: &'src str,
    /// All tokens of the source.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Parse errors collected during parsing.
    errors: Vec<ParseError>,
    /// Tags that are open around the current position.
    open_tags: Vec<SmolStr>,
    /// EOF token for when we're past the end.
    eof_token: Token,
}

impl<'src> Parser<'src> {
    /// Creates a new parser.
    pub fn new(source: &'src str) -> Self {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        let eof_token = Token {
            kind: TokenKind::Eof,
            span: Span::from_range(source.len()..source.len()),
        };
        Self {
            source,
            tokens,
            pos: 0,
            errors: Vec::new(),
            open_tags: Vec::new(),
            eof_token,
        }
    }

    /// Parses the source into a root element.
    pub fn parse(mut self) -> ParseResult {
        let nodes = self.parse_nodes(None);
        let mut root = None;
        for node in nodes {
            match node {
                TemplateNode::Element(el) if root.is_none() => root = Some(el),
                other => self
                    .errors
                    .push(ParseError::new(ParseErrorKind::MultipleRoots, other.span())),
            }
        }
        ParseResult {
            root,
            errors: self.errors,
        }
    }

    // === Token helpers ===

    /// Returns the current token.
    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof_token)
    }

    /// Returns the current token kind.
    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Returns the text of the current token.
    fn current_text(&self) -> &'src str {
        self.current().span.slice(self.source)
    }

    /// Returns the token kind `n` tokens ahead.
    fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Returns the byte offset of the current token.
    fn offset(&self) -> usize {
        usize::from(self.current().span.start)
    }

    /// Returns the end offset of the previous token.
    fn prev_end(&self) -> usize {
        self.tokens
            .get(self.pos.wrapping_sub(1))
            .map_or(0, |t| usize::from(t.span.end))
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Moves to the first token starting at or after `offset`.
    fn seek(&mut self, offset: usize) {
        while !self.check(TokenKind::Eof) && self.offset() < offset {
            self.advance();
        }
    }

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Advances if the current token matches, returns true if matched.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to be the given kind, reports error if not.
    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(ParseErrorKind::UnexpectedToken {
            expected: kind.name().to_string(),
            found: self.current_kind().name().to_string(),
        });
        false
    }

    /// Reports an error at the current position.
    fn error(&mut self, kind: ParseErrorKind) {
        self.errors.push(ParseError::new(kind, self.current().span));
    }

    /// Skips whitespace tokens.
    fn skip_whitespace(&mut self) {
        while self.check(TokenKind::Whitespace) {
            self.advance();
        }
    }

    /// Returns true if the source at `offset` opens a tag or a comment.
    fn is_tag_start(&self, offset: usize) -> bool {
        let rest = &self.source.as_bytes()[offset..];
        match rest {
            [b'<', b'/', ..] => true,
            [b'<', b'!', b'-', b'-', ..] => true,
            [b'<', next, ..] => next.is_ascii_alphabetic(),
            _ => false,
        }
    }

    // === Nodes ===

    /// Parses sibling nodes until a closing tag or the end of input.
    fn parse_nodes(&mut self, parent: Option<&str>) -> Vec<TemplateNode> {
        let mut nodes = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::Eof => break,
                TokenKind::LAngleSlash if parent.is_some() => break,
                TokenKind::LAngleSlash => self.skip_stray_closing_tag(),
                TokenKind::CommentOpen => self.skip_comment(),
                TokenKind::LAngle if self.is_tag_start(self.offset()) => {
                    if let Some(el) = self.parse_element() {
                        nodes.push(TemplateNode::Element(el));
                    }
                }
                _ => {
                    if let Some(text) = self.parse_text() {
                        nodes.push(text);
                    }
                }
            }
        }

        self.chain_branches(nodes)
    }

    /// Moves `v-else-if` / `v-else` elements into the preceding `v-if`.
    fn chain_branches(&mut self, nodes: Vec<TemplateNode>) -> Vec<TemplateNode> {
        let mut out: Vec<TemplateNode> = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                TemplateNode::Element(el) if is_branch(&el) => {
                    let owner = out
                        .last_mut()
                        .and_then(TemplateNode::as_element_mut)
                        .filter(|owner| matches!(owner.condition(), Some(Condition::If(_))));
                    match owner {
                        Some(owner) => owner.branches.push(el),
                        None => {
                            let directive = match el.condition() {
                                Some(Condition::ElseIf(_)) => "v-else-if",
                                _ => "v-else",
                            };
                            self.errors.push(ParseError::new(
                                ParseErrorKind::OrphanBranch {
                                    tag_name: el.tag.to_string(),
                                    directive: directive.to_string(),
                                },
                                el.span,
                            ));
                            out.push(TemplateNode::Element(el));
                        }
                    }
                }
                other => out.push(other),
            }
        }
        out
    }

    /// Skips an HTML comment.
    fn skip_comment(&mut self) {
        let body = self.offset() + "<!--".len();
        match self.source[body..].find("-->") {
            Some(end) => self.seek(body + end + "-->".len()),
            None => {
                self.error(ParseErrorKind::Unterminated { what: "comment" });
                self.seek(self.source.len());
            }
        }
    }

    /// Reports and skips a closing tag that closes nothing.
    fn skip_stray_closing_tag(&mut self) {
        let start = self.current().span;
        self.advance();
        let found = if self.check(TokenKind::Name) {
            let name = self.current_text().to_string();
            self.advance();
            name
        } else {
            String::new()
        };
        self.skip_whitespace();
        self.eat(TokenKind::RAngle);
        self.errors.push(ParseError::new(
            ParseErrorKind::MismatchedClosingTag {
                expected: String::new(),
                found,
            },
            start,
        ));
    }

    /// Parses a run of text. Whitespace-only text is dropped.
    fn parse_text(&mut self) -> Option<TemplateNode> {
        let start = self.offset();
        let bytes = self.source.as_bytes();
        let mut end = start;

        while end < bytes.len() {
            if bytes[end] == b'{' && bytes.get(end + 1) == Some(&b'{') {
                if let Some(close) = self.source[end + 2..].find("}}") {
                    end += 2 + close + 2;
                    continue;
                }
            }
            if end > start && self.is_tag_start(end) {
                break;
            }
            end += 1;
        }

        self.seek(end);
        let data = &self.source[start..end];
        if data.trim().is_empty() {
            return None;
        }

        let span = Span::from_range(start..end);
        Some(match split_interpolations(data) {
            Some(tokens) => TemplateNode::Expression(ExpressionText {
                span,
                text: data.to_string(),
                tokens,
            }),
            None => TemplateNode::Text(Text {
                span,
                data: data.to_string(),
            }),
        })
    }

    /// Parses an element with its attributes and children.
    fn parse_element(&mut self) -> Option<Element> {
        let start = self.offset();

        if !self.eat(TokenKind::LAngle) {
            return None;
        }
        if !self.check(TokenKind::Name) {
            self.expect(TokenKind::Name);
            return None;
        }
        let tag = SmolStr::new(self.current_text());
        self.advance();

        let attributes = self.parse_attributes();

        let self_closing = self.eat(TokenKind::SlashRAngle);
        if !self_closing {
            self.expect(TokenKind::RAngle);
        }

        let mut children = Vec::new();
        if !self_closing && !is_void_element(&tag) {
            self.open_tags.push(tag.clone());
            children = self.parse_nodes(Some(&tag));
            self.open_tags.pop();
            self.parse_closing_tag(&tag);
        }

        let (children, slots) = extract_slots(children);

        Some(Element {
            span: Span::from_range(start..self.prev_end().max(start)),
            tag,
            attributes,
            children,
            slots,
            branches: Vec::new(),
            self_closing,
        })
    }

    /// Parses element attributes.
    fn parse_attributes(&mut self) -> Vec<Attribute> {
        let mut attributes = Vec::new();

        loop {
            self.skip_whitespace();
            match self.current_kind() {
                TokenKind::RAngle | TokenKind::SlashRAngle | TokenKind::Eof => break,
                TokenKind::LAngle | TokenKind::LAngleSlash | TokenKind::CommentOpen => {
                    self.expect(TokenKind::RAngle);
                    break;
                }
                TokenKind::Name => attributes.push(self.parse_attribute()),
                _ => {
                    self.expect(TokenKind::Name);
                    self.advance();
                }
            }
        }

        attributes
    }

    /// Parses a single attribute starting at a name token.
    fn parse_attribute(&mut self) -> Attribute {
        let start = self.offset();
        let name = SmolStr::new(self.current_text());
        self.advance();

        let before_eq = self.pos;
        self.skip_whitespace();
        let value = if self.eat(TokenKind::Eq) {
            self.skip_whitespace();
            Some(self.parse_attribute_value())
        } else {
            self.pos = before_eq;
            None
        };

        Attribute {
            span: Span::from_range(start..self.prev_end().max(start)),
            name,
            value,
        }
    }

    /// Parses a quoted or unquoted attribute value.
    fn parse_attribute_value(&mut self) -> String {
        let quote = match self.current_kind() {
            TokenKind::DoubleQuote => '"',
            TokenKind::SingleQuote => '\'',
            TokenKind::Name => {
                let start = self.offset();
                let end = self.source[start..]
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .map_or(self.source.len(), |i| start + i);
                let end = if self.source[start..end].ends_with('/')
                    && self.source[end..].starts_with('>')
                {
                    end - 1
                } else {
                    end
                };
                self.seek(end);
                return self.source[start..end].to_string();
            }
            _ => {
                self.expect(TokenKind::DoubleQuote);
                return String::new();
            }
        };

        let body = self.offset() + 1;
        match self.source[body..].find(quote) {
            Some(len) => {
                self.seek(body + len);
                self.advance();
                self.source[body..body + len].to_string()
            }
            None => {
                self.error(ParseErrorKind::Unterminated {
                    what: "attribute value",
                });
                self.seek(self.source.len());
                self.source[body..].to_string()
            }
        }
    }

    /// Parses the closing tag of `expected`.
    fn parse_closing_tag(&mut self, expected: &str) {
        if !self.check(TokenKind::LAngleSlash) {
            self.error(ParseErrorKind::UnclosedTag {
                tag_name: expected.to_string(),
            });
            return;
        }

        let found = if self.peek_kind(1) == TokenKind::Name {
            self.tokens[self.pos + 1].span.slice(self.source)
        } else {
            ""
        };

        if found != expected && self.open_tags.iter().any(|tag| tag == found) {
            // Leave the tag for the ancestor it belongs to.
            self.error(ParseErrorKind::UnclosedTag {
                tag_name: expected.to_string(),
            });
            return;
        }

        if found != expected {
            self.error(ParseErrorKind::MismatchedClosingTag {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }

        self.advance();
        if self.check(TokenKind::Name) {
            self.advance();
        }
        self.skip_whitespace();
        self.expect(TokenKind::RAngle);
    }
}

fn is_branch(el: &Element) -> bool {
    matches!(
        el.condition(),
        Some(Condition::ElseIf(_)) | Some(Condition::Else)
    )
}

/// Splits scoped-slot templates out of a child list.
fn extract_slots(
    children: Vec<TemplateNode>,
) -> (Vec<TemplateNode>, IndexMap<SmolStr, TemplateNode>) {
    let mut kept = Vec::with_capacity(children.len());
    let mut slots = IndexMap::new();
    for child in children {
        let target = child.as_element().and_then(Element::slot_target);
        match target {
            Some(target) if !slots.contains_key(&target) => {
                slots.insert(target, child);
            }
            _ => kept.push(child),
        }
    }
    (kept, slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParseResult {
        Parser::new(source).parse()
    }

    #[test]
    fn test_parse_simple_element() {
        let result = parse("<div>hello</div>");
        assert!(result.errors.is_empty());
        let root = result.root.unwrap();
        assert_eq!(root.tag, "div");
        assert_eq!(root.children.len(), 1);
        assert!(matches!(&root.children[0], TemplateNode::Text(t) if t.data == "hello"));
    }

    #[test]
    fn test_whitespace_text_is_dropped() {
        let result = parse("<div>\n    <span></span>\n    <b></b>\n</div>");
        assert!(result.errors.is_empty());
        assert_eq!(result.root.unwrap().children.len(), 2);
    }

    #[test]
    fn test_parse_attributes() {
        let result = parse(r#"<u-input v-model="form.name" :disabled='a > "b"' readonly size=small />"#);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let root = result.root.unwrap();
        assert!(root.self_closing);
        let attrs: Vec<_> = root
            .attributes
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_deref()))
            .collect();
        assert_eq!(
            attrs,
            vec![
                ("v-model", Some("form.name")),
                (":disabled", Some(r#"a > "b""#)),
                ("readonly", None),
                ("size", Some("small")),
            ]
        );
    }

    #[test]
    fn test_interpolation_with_angle_bracket() {
        let result = parse("<p>{{ a < b ? 'x' : 'y' }} left</p>");
        assert!(result.errors.is_empty());
        let root = result.root.unwrap();
        match &root.children[0] {
            TemplateNode::Expression(expr) => {
                assert_eq!(
                    expr.tokens,
                    vec![
                        TextToken::Binding("a < b ? 'x' : 'y'".to_string()),
                        TextToken::Static(" left".to_string()),
                    ]
                );
            }
            other => panic!("Expected expression text, got {other:?}"),
        }
    }

    #[test]
    fn test_if_chain_is_folded() {
        let result = parse(
            r#"<div><p v-if="a">A</p><p v-else-if="b">B</p><p v-else>C</p><i></i></div>"#,
        );
        assert!(result.errors.is_empty());
        let root = result.root.unwrap();
        assert_eq!(root.children.len(), 2);
        let owner = root.children[0].as_element().unwrap();
        assert_eq!(owner.branches.len(), 2);
        assert_eq!(owner.branches[1].condition(), Some(Condition::Else));
    }

    #[test]
    fn test_orphan_else_is_reported() {
        let result = parse(r#"<div><p v-else>C</p></div>"#);
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0].kind,
            ParseErrorKind::OrphanBranch { .. }
        ));
    }

    #[test]
    fn test_scoped_slots_are_extracted() {
        let result = parse(
            r#"<u-table><u-col></u-col><template #cell="{ item }">{{ item.name }}</template></u-table>"#,
        );
        assert!(result.errors.is_empty());
        let root = result.root.unwrap();
        assert_eq!(root.children.len(), 1);
        assert!(root.slots.contains_key("cell"));
        assert_eq!(root.child_count(), 2);
    }

    #[test]
    fn test_comments_are_skipped() {
        let result = parse("<div><!-- <span> --><b></b></div>");
        assert!(result.errors.is_empty());
        assert_eq!(result.root.unwrap().children.len(), 1);
    }

    #[test]
    fn test_void_element() {
        let result = parse("<div><input type=\"text\"><br></div>");
        assert!(result.errors.is_empty());
        assert_eq!(result.root.unwrap().children.len(), 2);
    }

    #[test]
    fn test_unclosed_tag_recovers() {
        let result = parse("<div><span></div>");
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0].kind,
            ParseErrorKind::UnclosedTag { ref tag_name } if tag_name == "span"
        ));
        assert_eq!(result.root.unwrap().children.len(), 1);
    }

    #[test]
    fn test_multiple_roots() {
        let result = parse("<div></div><p></p>");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.root.unwrap().tag, "div");
    }

    #[test]
    fn test_element_spans() {
        let source = "<div>\n    <span>x</span>\n</div>";
        let result = parse(source);
        let root = result.root.unwrap();
        assert_eq!(root.span.slice(source), source);
        assert_eq!(root.children[0].span().slice(source), "<span>x</span>");
    }
}
