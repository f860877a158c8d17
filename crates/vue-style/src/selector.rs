//! Class tokens in selectors.

use std::ops::Range;
use vue_common::RenameMap;

/// A `.name` class token in a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassToken<'a> {
    /// The class name without the dot.
    pub name: &'a str,
    /// Byte range of the name (after the dot) in the selector.
    pub range: Range<usize>,
}

fn is_name_char(c: char) -> bool {
    c == '-' || c == '_' || c.is_ascii_alphanumeric() || !c.is_ascii()
}

/// Returns the class tokens of a selector in order.
///
/// Strings, comments and escapes are skipped, and a dot followed by a
/// digit (as in the `12.5%` keyframe selector) is not a class.
pub fn class_tokens(selector: &str) -> Vec<ClassToken<'_>> {
    let bytes = selector.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' | b'\'' => {
                let quote = bytes[i];
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = selector[i + 2..].find("*/").map_or(bytes.len(), |end| i + 2 + end + 2);
            }
            b'.' => {
                let start = i + 1;
                let len = selector[start..]
                    .char_indices()
                    .find(|(_, c)| !is_name_char(*c))
                    .map_or(selector.len() - start, |(index, _)| index);
                let name = &selector[start..start + len];
                let lead = name.trim_start_matches('-');
                if !name.is_empty() && !lead.starts_with(|c: char| c.is_ascii_digit()) {
                    tokens.push(ClassToken {
                        name,
                        range: start..start + len,
                    });
                }
                i = start + len;
            }
            _ => i += 1,
        }
    }
    tokens
}

/// Rewrites class tokens through `renames`. Returns `None` if nothing
/// changed.
pub fn rename_classes(selector: &str, renames: &RenameMap) -> Option<String> {
    let mut out = String::with_capacity(selector.len());
    let mut last = 0;
    let mut changed = false;
    for token in class_tokens(selector) {
        if let Some(new) = renames.get(token.name) {
            out.push_str(&selector[last..token.range.start]);
            out.push_str(new);
            last = token.range.end;
            changed = true;
        }
    }
    if !changed {
        return None;
    }
    out.push_str(&selector[last..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(selector: &str) -> Vec<&str> {
        class_tokens(selector).into_iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_class_tokens() {
        assert_eq!(names(".root > .item:hover"), vec!["root", "item"]);
        assert_eq!(names("a.btn.btn-primary:not(.disabled)"), vec!["btn", "btn-primary", "disabled"]);
        assert_eq!(names("[title=\".x\"] .y"), vec!["y"]);
        assert_eq!(names("12.5%"), Vec::<&str>::new());
        assert_eq!(names(".a/* .b */.c"), vec!["a", "c"]);
    }

    #[test]
    fn test_rename_by_token() {
        let renames: RenameMap = [("item", "item1")].into_iter().collect();
        assert_eq!(
            rename_classes(".item .item-icon .item", &renames).as_deref(),
            Some(".item1 .item-icon .item1")
        );
        assert_eq!(rename_classes(".other", &renames), None);
    }
}
