//! Markup generation.

use crate::ast::{Element, TemplateNode};
use crate::parser::is_void_element;

/// Column count after which attributes wrap onto a new line.
const ATTRIBUTE_WRAP: usize = 120;

/// Indentation settings for generated markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateOptions {
    /// Spaces per indentation level.
    pub tab_length: usize,
    /// Indentation level of the root element.
    pub start_level: usize,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            tab_length: 4,
            start_level: 0,
        }
    }
}

impl TemplateOptions {
    /// Number of indentation bytes in front of the root element.
    pub fn root_indent(&self) -> usize {
        self.tab_length * self.start_level
    }
}

/// Generates markup for a root element, with a trailing newline.
pub fn generate(root: &Element, options: &TemplateOptions) -> String {
    let mut out = " ".repeat(options.root_indent());
    write_element(&mut out, root, options.start_level, options);
    out.push('\n');
    out
}

fn write_element(out: &mut String, el: &Element, level: usize, options: &TemplateOptions) {
    let tabs = " ".repeat(options.tab_length * level);
    let inside_tabs = " ".repeat(options.tab_length * (level + 1));

    let mut content = String::new();
    let mut should_format = true;
    for child in el.addressable() {
        match child {
            TemplateNode::Element(child) => {
                write_child(&mut content, child, &mut should_format, &inside_tabs, level, options);
                for branch in &child.branches {
                    write_child(&mut content, branch, &mut should_format, &inside_tabs, level, options);
                }
            }
            TemplateNode::Text(text) => {
                content.push_str(&text.data);
                should_format = false;
            }
            TemplateNode::Expression(expr) => {
                content.push_str(&expr.text);
                should_format = false;
            }
        }
    }
    if content.is_empty() {
        should_format = false;
    }

    out.push('<');
    out.push_str(&el.tag);
    write_attributes(out, el, &tabs);

    if content.is_empty() && is_void_element(&el.tag) {
        out.push('>');
        return;
    }
    if content.is_empty() && el.self_closing {
        out.push_str(" />");
        return;
    }

    out.push('>');
    out.push_str(&content);
    if should_format {
        out.push('\n');
        out.push_str(&tabs);
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

fn write_child(
    content: &mut String,
    child: &Element,
    should_format: &mut bool,
    inside_tabs: &str,
    level: usize,
    options: &TemplateOptions,
) {
    if *should_format {
        content.push('\n');
        content.push_str(inside_tabs);
    }
    write_element(content, child, level + 1, options);
    *should_format = true;
}

fn write_attributes(out: &mut String, el: &Element, tabs: &str) {
    let mut line_length = 0;
    for attr in &el.attributes {
        let text = match attr.value.as_deref() {
            None | Some("") => attr.name.to_string(),
            Some(value) if value.contains('"') && !value.contains('\'') => {
                format!("{}='{}'", attr.name, value)
            }
            Some(value) => format!("{}=\"{}\"", attr.name, value.replace('"', "&quot;")),
        };
        if line_length >= ATTRIBUTE_WRAP || text.len() >= ATTRIBUTE_WRAP {
            out.push('\n');
            out.push_str(tabs);
            out.push_str("   ");
            line_length = 0;
        }
        out.push(' ');
        out.push_str(&text);
        line_length += text.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn regenerate(source: &str, options: TemplateOptions) -> String {
        let result = Parser::new(source).parse();
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        generate(&result.root.unwrap(), &options)
    }

    #[test]
    fn test_nested_elements_are_indented() {
        let output = regenerate(
            "<div class=\"root\"><span>hi</span><u-button @click=\"go\" /></div>",
            TemplateOptions::default(),
        );
        insta::assert_snapshot!(output.trim_end(), @r###"
        <div class="root">
            <span>hi</span>
            <u-button @click="go" />
        </div>
        "###);
    }

    #[test]
    fn test_start_level_indents_root() {
        let output = regenerate(
            "<div><p>x</p></div>",
            TemplateOptions {
                tab_length: 2,
                start_level: 1,
            },
        );
        assert_eq!(output, "  <div>\n    <p>x</p>\n  </div>\n");
    }

    #[test]
    fn test_branches_follow_their_owner() {
        let output = regenerate(
            "<div><p v-if=\"a\">A</p><p v-else>B</p></div>",
            TemplateOptions::default(),
        );
        assert_eq!(
            output,
            "<div>\n    <p v-if=\"a\">A</p>\n    <p v-else>B</p>\n</div>\n"
        );
    }

    #[test]
    fn test_quote_selection() {
        let output = regenerate(
            r#"<a :title='"x" + y' :alt="'z'"></a>"#,
            TemplateOptions::default(),
        );
        assert_eq!(output, "<a :title='\"x\" + y' :alt=\"'z'\"></a>\n");
    }

    #[test]
    fn test_void_and_empty_value() {
        let output = regenerate("<p><input disabled=\"\"></p>", TemplateOptions::default());
        assert_eq!(output, "<p>\n    <input disabled>\n</p>\n");
    }

    #[test]
    fn test_long_attributes_wrap() {
        let long = "x".repeat(130);
        let source = format!("<div :a=\"{long}\" b=\"c\"></div>");
        let output = regenerate(&source, TemplateOptions::default());
        assert_eq!(output, format!("<div\n    :a=\"{long}\"\n    b=\"c\"></div>\n"));
    }

    #[test]
    fn test_generation_is_stable() {
        let source = "<div>\n  <u-list v-for=\"item in list\" :key=\"item.id\">{{ item.name }}</u-list>\n</div>";
        let once = regenerate(source, TemplateOptions::default());
        let twice = regenerate(&once, TemplateOptions::default());
        assert_eq!(once, twice);
    }
}
