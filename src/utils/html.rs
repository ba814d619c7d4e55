//! HTML attribute escaping for rendered `<meta>` tags.

use std::borrow::Cow;

/// Characters that are special inside a double-quoted attribute value.
const ATTR_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

#[inline]
fn entity(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape an attribute value.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape_attr("a \"b\""), "a &quot;b&quot;");
/// assert_eq!(escape_attr("plain"), "plain"); // No allocation
/// ```
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(ATTR_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match entity(c) {
            Some(e) => out.push_str(e),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr_plain_is_borrowed() {
        assert!(matches!(escape_attr("hello world"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_attr_special_chars() {
        assert_eq!(escape_attr("a\"b&c"), "a&quot;b&amp;c");
        assert_eq!(escape_attr("it's"), "it&#39;s");
        assert_eq!(escape_attr("<b>"), "&lt;b&gt;");
    }

    #[test]
    fn test_escape_attr_empty() {
        assert_eq!(escape_attr(""), "");
    }
}
