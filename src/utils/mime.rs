//! MIME type guessing for attachments that do not declare one.

use std::path::Path;

/// Common MIME type constants.
pub mod types {
    // Images
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const AVIF: &str = "image/avif";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";
    pub const BMP: &str = "image/bmp";
    pub const TIFF: &str = "image/tiff";

    // Documents
    pub const PDF: &str = "application/pdf";
    pub const PLAIN: &str = "text/plain";
    pub const MARKDOWN: &str = "text/markdown";
    pub const HTML: &str = "text/html";
    pub const CSV: &str = "text/csv";
    pub const JSON: &str = "application/json";

    // Media
    pub const MP3: &str = "audio/mpeg";
    pub const MP4: &str = "video/mp4";
    pub const WEBM: &str = "video/webm";

    // Binary
    pub const ZIP: &str = "application/zip";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Guess MIME type from an attachment file name.
pub fn from_filename(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    from_extension(ext.as_deref())
}

/// Guess MIME type from a (lowercase) file extension.
pub fn from_extension(ext: Option<&str>) -> &'static str {
    match ext {
        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("gif") => types::GIF,
        Some("webp") => types::WEBP,
        Some("avif") => types::AVIF,
        Some("svg") => types::SVG,
        Some("ico") => types::ICO,
        Some("bmp") => types::BMP,
        Some("tif" | "tiff") => types::TIFF,

        Some("pdf") => types::PDF,
        Some("txt") => types::PLAIN,
        Some("md") => types::MARKDOWN,
        Some("html" | "htm") => types::HTML,
        Some("csv") => types::CSV,
        Some("json") => types::JSON,

        Some("mp3") => types::MP3,
        Some("mp4" | "m4v") => types::MP4,
        Some("webm") => types::WEBM,

        Some("zip") => types::ZIP,
        _ => types::OCTET_STREAM,
    }
}

/// Check if the MIME type represents an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}
