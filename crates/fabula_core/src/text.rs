//! Text helpers shared across the workspace.

/// Truncate a string to at most `max` characters.
///
/// Counts Unicode scalar values rather than bytes, so multibyte text is never
/// split mid-character. Chapter summaries, parser fallback excerpts, and
/// history prompt tags all go through this.
///
/// # Examples
///
/// ```
/// use fabula_core::truncate_chars;
///
/// assert_eq!(truncate_chars("hello", 10), "hello");
/// assert_eq!(truncate_chars("hello", 3), "hel");
/// ```
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_passes_through() {
        assert_eq!(truncate_chars("abc", 500), "abc");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[test]
    fn exact_length_is_untouched() {
        assert_eq!(truncate_chars("abcde", 5), "abcde");
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Four CJK characters occupy twelve bytes.
        assert_eq!(truncate_chars("四个汉字", 2), "四个");
        assert_eq!(truncate_chars("四个汉字", 4), "四个汉字");
    }

    #[test]
    fn zero_max_yields_empty() {
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
