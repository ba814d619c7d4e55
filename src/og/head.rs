//! `<meta>` tag rendering of a [`MetadataMap`].

use std::fmt::Write;

use super::map::MetadataMap;
use crate::utils::html::escape_attr;

/// Render one `<meta property=".." content="..">` tag per (key, value) pair.
///
/// Keys follow [`MetadataMap::sorted`]; values keep their list order.
/// Returns an empty string for an empty map, so a failed resolution leaves
/// no trace in the page head.
pub fn render_meta_tags(metas: &MetadataMap) -> String {
    let mut out = String::new();
    for (property, values) in metas.sorted() {
        for content in values {
            // Writing into a String cannot fail.
            let _ = writeln!(
                out,
                r#"<meta property="{}" content="{}">"#,
                escape_attr(property),
                escape_attr(content)
            );
        }
    }
    out
}
