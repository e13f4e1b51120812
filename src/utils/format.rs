//! Message format rendering.
//!
//! Formats are plain strings with two placeholders: `{{data}}` (the message)
//! and `{{count}}` (the adapter's send counter). Nothing else is interpreted.

/// Format used when neither the global options nor a record set one
pub const DEFAULT_MESSAGE_FORMAT: &str = "{{data}}";

/// Picks a record's own format when set, otherwise the fallback
pub fn select_format<'a>(fallback: &'a str, record: &'a str) -> &'a str {
    if record.is_empty() { fallback } else { record }
}

/// Substitutes the placeholders of `format`
///
/// An empty format yields the message unchanged. `{{count}}` is substituted
/// first so placeholder-like text inside the message is left alone.
pub fn render_message(format: &str, message: &str, count: u64) -> String {
    if format.is_empty() {
        return message.to_string();
    }
    format
        .replace("{{count}}", &count.to_string())
        .replace("{{data}}", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_format_prefers_record() {
        assert_eq!(select_format("{{data}}", "[{{count}}] {{data}}"), "[{{count}}] {{data}}");
        assert_eq!(select_format("{{data}}", ""), "{{data}}");
    }

    #[test]
    fn test_render_default_format() {
        assert_eq!(render_message(DEFAULT_MESSAGE_FORMAT, "hello", 3), "hello");
    }

    #[test]
    fn test_render_with_count() {
        assert_eq!(render_message("#{{count}}: {{data}}", "disk full", 7), "#7: disk full");
    }

    #[test]
    fn test_render_empty_format() {
        assert_eq!(render_message("", "hello", 1), "hello");
    }

    #[test]
    fn test_render_leaves_placeholders_in_message() {
        assert_eq!(render_message("{{data}}", "literal {{count}}", 9), "literal {{count}}");
    }
}
