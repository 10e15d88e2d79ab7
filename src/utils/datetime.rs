use jiff::Timestamp;
use jiff::civil::Date;

/// Format a post's `createdAt` value ("2024-01-02T10:00:00Z" or a bare
/// "2024-01-02") as a short display date like "Jan 2, 2024". Anything that
/// fails to parse is returned unchanged.
pub fn format_post_date(created_at: &str) -> String {
    if let Ok(timestamp) = created_at.parse::<Timestamp>() {
        return timestamp.strftime("%b %-d, %Y").to_string();
    }

    if let Ok(date) = created_at.parse::<Date>() {
        return date.strftime("%b %-d, %Y").to_string();
    }

    created_at.to_string()
}
