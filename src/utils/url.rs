use once_cell::sync::Lazy;
use regex::Regex;

static DRIVE_VIEW_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"uc\?export=view&id=").unwrap());

/// Normalize a Google Drive "export=view" share link into the direct form
/// the image loader can fetch. Other links pass through unchanged.
pub fn convert_drive_link(url: &str) -> String {
    DRIVE_VIEW_REGEX.replace(url, "uc?id=").to_string()
}

/// Extract the host/domain portion of a URL without the scheme and path.
/// Example: "https://github.com/foo/bar" -> Some("github.com")
pub fn extract_domain(url: &str) -> Option<String> {
    let url = url.trim();

    let without_scheme = if let Some(idx) = url.find("://") {
        &url[idx + 3..]
    } else {
        url
    };

    let host = without_scheme
        .split('/')
        .next()?
        .split('?')
        .next()?
        .split('#')
        .next()?;

    // Remove port if present
    let domain = host.split(':').next()?;

    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}
