//! Text utilities for TUI rendering.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates a string with ellipsis if it exceeds max_width (unicode-aware).
///
/// Uses unicode width for accurate terminal column calculation, handling
/// wide characters (CJK, emoji) correctly.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    if max_width == 1 {
        return "…".to_string();
    }
    let mut truncated = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        width += ch_width;
        truncated.push(ch);
    }
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(truncate_with_ellipsis("Apple", 10), "Apple");
        assert_eq!(truncate_with_ellipsis("Apple", 5), "Apple");
    }

    #[test]
    fn test_long_text_gets_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Macintosh", 5), "Maci…");
    }

    #[test]
    fn test_wide_chars_count_double() {
        assert_eq!(truncate_with_ellipsis("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn test_tiny_widths() {
        assert_eq!(truncate_with_ellipsis("Fruits", 1), "…");
        assert_eq!(truncate_with_ellipsis("Fruits", 0), "");
    }
}
