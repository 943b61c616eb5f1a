//! Extension-based content type inference.

/// Fallback for unknown and binary extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

pub const MARKDOWN: &str = "text/markdown";

const TABLE: &[(&str, &str)] = &[
    ("md", MARKDOWN),
    ("markdown", MARKDOWN),
    ("txt", "text/plain"),
    ("py", "text/x-python"),
    ("rs", "text/x-rust"),
    ("js", "text/javascript"),
    ("mjs", "text/javascript"),
    ("ts", "text/typescript"),
    ("sh", "application/x-sh"),
    ("bash", "application/x-sh"),
    ("json", "application/json"),
    ("yaml", "application/yaml"),
    ("yml", "application/yaml"),
    ("toml", "application/toml"),
    ("xml", "application/xml"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("tgz", "application/gzip"),
    ("wasm", "application/wasm"),
];

const TEXTUAL_APPLICATION_TYPES: &[&str] = &[
    "application/json",
    "application/yaml",
    "application/toml",
    "application/xml",
    "application/x-sh",
    "image/svg+xml",
];

/// Infer a content type from the path's extension (case-insensitive).
#[must_use]
pub fn infer(path: &str) -> &'static str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let Some((stem, ext)) = file_name.rsplit_once('.') else {
        return OCTET_STREAM;
    };
    if stem.is_empty() {
        return OCTET_STREAM;
    }
    let ext = ext.to_ascii_lowercase();
    TABLE
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map_or(OCTET_STREAM, |(_, ct)| ct)
}

/// Whether content of this type should be handled as UTF-8 text.
#[must_use]
pub fn is_textual(content_type: &str) -> bool {
    let base = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    base.starts_with("text/") || TEXTUAL_APPLICATION_TYPES.contains(&base)
}
