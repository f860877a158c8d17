//! Tag names of component paths.

use camino::Utf8Path;

/// Resolves the tag name of a component from its path.
///
/// Nested `.vue` segments are joined: `u-list.vue/item.vue` is
/// `u-list-item`. A segment that is the singular of the previous word
/// replaces it instead: `u-actions.vue/action.vue` is `u-action`. A
/// segment with a one-letter prefix starts over.
pub fn resolve_tag_name(path: &Utf8Path) -> String {
    let segments: Vec<&str> = path.components().map(|c| c.as_str()).collect();
    let first = segments
        .iter()
        .rposition(|segment| !segment.ends_with(".vue"))
        .map_or(0, |index| index + 1);

    let mut words: Vec<String> = Vec::new();
    for segment in &segments[first..] {
        let base = segment.trim_end_matches(".vue");
        let parts: Vec<&str> = base.split('-').collect();
        if parts[0].chars().count() == 1 {
            words = parts.into_iter().map(str::to_string).collect();
        } else if words.last().is_some_and(|last| *last == pluralize(base)) {
            if let Some(last) = words.last_mut() {
                *last = base.to_string();
            }
        } else {
            words.push(base.to_string());
        }
    }
    words.join("-")
}

/// English plural of a lowercase word, for the cases component names use.
fn pluralize(word: &str) -> String {
    const IRREGULAR: &[(&str, &str)] = &[
        ("child", "children"),
        ("person", "people"),
        ("man", "men"),
        ("datum", "data"),
    ];
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return plural.to_string();
    }
    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|end| word.ends_with(end)) {
        return format!("{word}es");
    }
    format!("{word}s")
}
