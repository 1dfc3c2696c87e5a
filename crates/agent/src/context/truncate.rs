use std::borrow::Cow;

/// Marker appended to text that was cut.
pub const TRUNCATION_MARKER: &str = "...";

/// Keep at most `limit` characters of `text`, appending `...` only when
/// something was removed. Counts Unicode scalar values, so a multi-byte
/// character is never split.
pub fn truncate_chars(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => Cow::Owned(format!("{}{TRUNCATION_MARKER}", &text[..byte_idx])),
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(truncate_chars("two sum", 150), "two sum");
        assert!(matches!(truncate_chars("two sum", 150), Cow::Borrowed(_)));
    }

    #[test]
    fn text_at_limit_is_unchanged() {
        let text = "a".repeat(150);
        assert_eq!(truncate_chars(&text, 150), text.as_str());
    }

    #[test]
    fn long_text_is_cut_with_marker() {
        let text = "b".repeat(151);
        let cut = truncate_chars(&text, 150);
        assert_eq!(cut.chars().count(), 153);
        assert!(cut.ends_with("b..."));
    }

    #[test]
    fn multibyte_characters_are_not_split() {
        let text = "é".repeat(10);
        let cut = truncate_chars(&text, 4);
        assert_eq!(cut, "éééé...");

        let emoji = "🤖🤖🤖";
        assert_eq!(truncate_chars(emoji, 2), "🤖🤖...");
        assert_eq!(truncate_chars(emoji, 3), emoji);
    }

    #[test]
    fn zero_limit() {
        assert_eq!(truncate_chars("abc", 0), "...");
        assert_eq!(truncate_chars("", 0), "");
    }
}
