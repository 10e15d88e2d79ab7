use html2text::from_read;

use once_cell::sync::Lazy;
use regex::Regex;

static IMG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img\s+[^>]*alt=["']([^"']*)["'][^>]*>"#).unwrap());

/// Extracts readable text from a post's HTML body.
/// Strips tags and decodes basic entities using the `html2text` crate.
/// Also replaces <img> tags with [Image: alt] placeholders.
pub fn extract_text_from_html(html: &str) -> String {
    let html_with_placeholders = IMG_REGEX.replace_all(html, "[Image: $1]");

    // html2text emits wrapped lines; keep its wrapping as-is.
    let mut bytes = html_with_placeholders.as_bytes();
    from_read(&mut bytes, 80).unwrap_or_default()
}
