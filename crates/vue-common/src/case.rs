//! Tag-name case conversion.

/// Converts a kebab-case tag name to a PascalCase component name.
///
/// `u-button` becomes `UButton`, `my-list2` becomes `MyList2`.
pub fn kebab_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if c == '-' {
            upper = true;
            continue;
        }
        if upper && c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        upper = false;
    }
    out
}

/// Converts a PascalCase or camelCase component name to kebab case.
///
/// Every capital letter and every run of digits starts a new segment:
/// `UButton` becomes `u-button`, `Step10Item` becomes `step-10-item`.
pub fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_digit = false;
    for (i, c) in name.chars().enumerate() {
        let starts_segment = c.is_ascii_uppercase() || (c.is_ascii_digit() && !prev_digit);
        if starts_segment && i > 0 {
            out.push('-');
        }
        out.push(c.to_ascii_lowercase());
        prev_digit = c.is_ascii_digit();
    }
    out
}
