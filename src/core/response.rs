//! Discord limit constants and truncation utilities
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Field-oriented limits for todo list embeds
//! - 1.0.0: Initial message/embed truncation helpers

/// Discord embed field value limit
pub const FIELD_LIMIT: usize = 1024;
/// Discord combined character budget for a single embed
pub const EMBED_TOTAL_LIMIT: usize = 6000;
/// Discord maximum number of fields per embed
pub const EMBED_FIELD_COUNT: usize = 25;
/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

/// Truncate text to `max_size` bytes on a UTF-8 boundary, adding an ellipsis if cut.
pub fn truncate_to(text: &str, max_size: usize) -> String {
    if text.len() <= max_size {
        return text.to_string();
    }
    // Room for "..."
    let mut end = max_size.saturating_sub(3);
    while !text.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Truncate text to fit an embed field value.
pub fn truncate_for_field(text: &str) -> String {
    truncate_to(text, FIELD_LIMIT)
}

/// Truncate text to fit message content.
pub fn truncate_for_message(text: &str) -> String {
    truncate_to(text, MESSAGE_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(truncate_to("hello", 100), "hello");
    }

    #[test]
    fn test_exactly_at_limit() {
        let text = "a".repeat(100);
        assert_eq!(truncate_to(&text, 100), text);
    }

    #[test]
    fn test_truncates_with_ellipsis() {
        let text = "a".repeat(200);
        let result = truncate_to(&text, 100);
        assert_eq!(result.len(), 100);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_utf8_boundary_safety() {
        let text = "世界".repeat(400);
        let result = truncate_for_field(&text);
        assert!(result.len() <= FIELD_LIMIT);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_field_limit() {
        let result = truncate_for_field(&"x".repeat(2000));
        assert_eq!(result.len(), FIELD_LIMIT);
    }

    #[test]
    fn test_message_limit() {
        let result = truncate_for_message(&"x".repeat(3000));
        assert_eq!(result.len(), MESSAGE_LIMIT);
    }
}
