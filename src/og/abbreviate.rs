//! Description shortening.
//!
//! Mirrors the usual `abbreviate(str, max)` helper: text that fits is
//! returned untouched, longer text is cut so that the result *including*
//! the `...` marker is exactly `max` characters long. Lengths are counted
//! in Unicode scalar values, so multi-byte text is never split mid-char.

/// Marker appended to shortened text.
pub const MARKER: &str = "...";

/// Default length limit of a computed `og:description`.
pub const DEFAULT_LIMIT: usize = 200;

/// Smallest limit that leaves room for one character plus the marker.
pub const MIN_LIMIT: usize = MARKER.len() + 1;

/// Shorten `text` to at most `max` characters.
///
/// Below [`MIN_LIMIT`] there is no room for the marker; the text is then
/// cut hard to `max` characters.
pub fn abbreviate(text: &str, max: usize) -> String {
    let len = text.chars().count();
    if len <= max {
        return text.to_owned();
    }
    if max < MIN_LIMIT {
        return text.chars().take(max).collect();
    }

    let mut out: String = text.chars().take(max - MARKER.len()).collect();
    out.push_str(MARKER);
    out
}

/// Trim surrounding whitespace, then [`abbreviate`].
pub fn describe(body: &str, max: usize) -> String {
    abbreviate(body.trim(), max)
}
