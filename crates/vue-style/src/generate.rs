//! Stylesheet printing.

use crate::ast::{StyleNode, Stylesheet};

/// Prints a stylesheet. A parsed sheet prints back to its source.
pub fn generate(sheet: &Stylesheet) -> String {
    let mut out = String::new();
    write_nodes(&sheet.nodes, &mut out);
    out.push_str(&sheet.after);
    out
}

fn write_nodes(nodes: &[StyleNode], out: &mut String) {
    for node in nodes {
        write_node(node, out);
    }
}

fn write_node(node: &StyleNode, out: &mut String) {
    match node {
        StyleNode::Rule(rule) => {
            out.push_str(&rule.before);
            out.push_str(&rule.selector);
            out.push_str(&rule.between);
            out.push('{');
            write_nodes(&rule.nodes, out);
            out.push_str(&rule.after);
            out.push('}');
        }
        StyleNode::AtRule(at) => {
            out.push_str(&at.before);
            out.push('@');
            out.push_str(&at.name);
            out.push_str(&at.after_name);
            out.push_str(&at.params);
            out.push_str(&at.between);
            match &at.nodes {
                Some(nodes) => {
                    out.push('{');
                    write_nodes(nodes, out);
                    out.push_str(&at.after);
                    out.push('}');
                }
                None if at.semicolon => out.push(';'),
                None => {}
            }
        }
        StyleNode::Declaration(decl) => {
            out.push_str(&decl.before);
            out.push_str(&decl.prop);
            out.push_str(&decl.between);
            out.push_str(&decl.value);
            out.push_str(&decl.after);
            if decl.semicolon {
                out.push(';');
            }
        }
        StyleNode::Comment(comment) => {
            out.push_str(&comment.before);
            out.push_str("/*");
            out.push_str(&comment.text);
            out.push_str("*/");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;
    use pretty_assertions::assert_eq;

    fn round_trip(source: &str) {
        let result = Parser::new(source).parse();
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(generate(&result.stylesheet), source);
    }

    #[test]
    fn test_round_trip_rules() {
        round_trip(".root {\n    color: red;\n    margin:0 auto\n}\n");
        round_trip(".a,.b>.c:hover{color:red}");
        round_trip("a { color : red ; }\n\n\n");
    }

    #[test]
    fn test_round_trip_at_rules_and_comments() {
        round_trip("@charset \"utf-8\";\n/* header */\n@import url(a.css) screen;\n");
        round_trip("@media (max-width: 100px) {\n    .root { display: none !important; }\n}\n");
        round_trip("@font-face{font-family:x;src:url('a;b.woff')}");
        round_trip("@keyframes spin {\n    from { transform: rotate(0) }\n    12.5% { opacity: .5 }\n}");
    }

    #[test]
    fn test_round_trip_odd_spacing() {
        round_trip("\n\n  .a  /* note */ {;;\tcolor:\tred;;}\n");
        round_trip("");
        round_trip("   \n");
    }
}
