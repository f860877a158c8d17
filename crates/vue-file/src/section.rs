//! Sections of a component and the single-file block syntax.

use std::fmt;

/// A piece of a component that is stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    /// The whole single-file text.
    Content,
    /// Markup.
    Template,
    /// Behavior.
    Script,
    /// CSS module.
    Style,
    /// `definition.json`.
    Definition,
    /// `api.yaml`.
    Api,
    /// Usage examples (`docs/blocks.md` or `docs/examples.md`).
    Examples,
    /// `package.json`.
    Package,
}

impl SectionKind {
    /// Every kind, in load order.
    pub const ALL: [SectionKind; 8] = [
        SectionKind::Content,
        SectionKind::Script,
        SectionKind::Template,
        SectionKind::Style,
        SectionKind::Package,
        SectionKind::Api,
        SectionKind::Examples,
        SectionKind::Definition,
    ];

    /// The block tag of this section inside a single-file component.
    pub fn block_tag(self) -> Option<&'static str> {
        match self {
            SectionKind::Template => Some("template"),
            SectionKind::Script => Some("script"),
            SectionKind::Style => Some("style"),
            SectionKind::Definition => Some("definition"),
            SectionKind::Api => Some("api"),
            SectionKind::Examples => Some("doc"),
            SectionKind::Content | SectionKind::Package => None,
        }
    }

    /// The file holding this section in a decomposed directory.
    pub fn file_name(self) -> Option<&'static str> {
        match self {
            SectionKind::Template => Some("index.html"),
            SectionKind::Script => Some("index.js"),
            SectionKind::Style => Some("module.css"),
            SectionKind::Definition => Some("definition.json"),
            SectionKind::Api => Some("api.yaml"),
            SectionKind::Package => Some("package.json"),
            SectionKind::Content | SectionKind::Examples => None,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionKind::Content => "content",
            SectionKind::Template => "template",
            SectionKind::Script => "script",
            SectionKind::Style => "style",
            SectionKind::Definition => "definition",
            SectionKind::Api => "api",
            SectionKind::Examples => "examples",
            SectionKind::Package => "package",
        };
        f.write_str(name)
    }
}

/// Extracts the body of a `<tag>` block: everything from the end of the
/// first opening tag to the start of the last `</tag>`, with leading
/// newlines removed. Returns `None` when the block is missing or empty.
///
/// `attrs` must appear right after the tag name, as in
/// `<doc name="blocks.md">`.
pub fn extract_block(content: &str, tag: &str, attrs: Option<&str>) -> Option<String> {
    let close = format!("</{tag}>");
    let open = match attrs {
        Some(attrs) => format!("<{tag} {attrs}"),
        None => format!("<{tag}"),
    };

    let mut from = 0;
    let body_start = loop {
        let start = from + content[from..].find(&open)?;
        let rest = &content[start + open.len()..];
        let boundary = rest.chars().next();
        let line_end = rest.find('\n').unwrap_or(rest.len());
        // The opening tag must end on its own line, and `<template` must not
        // match `<templates`.
        let name_ends = attrs.is_some()
            || matches!(boundary, Some(c) if c == '>' || c == '/' || c.is_whitespace());
        match rest[..line_end].find('>') {
            Some(gt) if name_ends => break start + open.len() + gt + 1,
            _ => from = start + open.len(),
        }
    };

    let body_end = content.rfind(&close)?;
    if body_end <= body_start {
        return None;
    }
    let body = content[body_start..body_end].trim_start_matches('\n');
    (!body.is_empty()).then(|| body.to_string())
}

/// Builds single-file text from section bodies. Empty sections are left
/// out. Each body is expected to end with a newline.
pub fn compose(
    template: Option<&str>,
    script: Option<&str>,
    style: Option<&str>,
    definition: Option<&str>,
) -> String {
    let blocks = [
        ("<template>", template, "</template>"),
        ("<script>", script, "</script>"),
        ("<style module>", style, "</style>"),
        ("<definition>", definition, "</definition>"),
    ];
    let mut parts = Vec::new();
    for (open, body, close) in blocks {
        if let Some(body) = body.filter(|body| !body.is_empty()) {
            parts.push(format!("{open}\n{body}{close}"));
        }
    }
    let mut content = parts.join("\n\n");
    content.push('\n');
    content
}
