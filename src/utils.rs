use std::time::{Duration, SystemTime, UNIX_EPOCH};
use unicode_width::UnicodeWidthChar;

pub mod markdown;

pub use markdown::render_markdown;

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Shortens `s` to at most `max_chars` characters, ending in "..." when cut.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

const DATE_FORMAT_TODAY: &str = "Today %H:%M";
const DATE_FORMAT_YESTERDAY: &str = "Yesterday %H:%M";
const DATE_FORMAT_OTHER: &str = "%Y-%m-%d";

pub fn format_card_date(timestamp: u64) -> String {
    let created = UNIX_EPOCH + Duration::from_secs(timestamp);
    let datetime: chrono::DateTime<chrono::Local> = created.into();

    let today = chrono::Local::now().date_naive();
    let created_date = datetime.date_naive();

    if created_date == today {
        datetime.format(DATE_FORMAT_TODAY).to_string()
    } else if created_date == today - chrono::Duration::days(1) {
        datetime.format(DATE_FORMAT_YESTERDAY).to_string()
    } else {
        datetime.format(DATE_FORMAT_OTHER).to_string()
    }
}

/// Byte offset of the `char_index`-th character, or the end of `text`.
pub fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Breaks `text` into display lines no wider than `width` columns, splitting
/// at explicit newlines and mid-word when a line fills up.
pub fn hard_wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = vec![String::new()];
    let mut col = 0;

    for ch in text.chars() {
        if ch == '\n' {
            lines.push(String::new());
            col = 0;
            continue;
        }
        let w = ch.width().unwrap_or(1);
        if col + w > width && col > 0 {
            lines.push(String::new());
            col = 0;
        }
        if let Some(line) = lines.last_mut() {
            line.push(ch);
        }
        col += w;
    }

    lines
}

/// Line and column of a cursor placed before the `cursor`-th character, laid
/// out the same way as [`hard_wrap`].
pub fn cursor_line_col(text: &str, cursor: usize, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let mut line = 0;
    let mut col = 0;

    for ch in text.chars().take(cursor) {
        if ch == '\n' {
            line += 1;
            col = 0;
            continue;
        }
        let w = ch.width().unwrap_or(1);
        if col + w > width && col > 0 {
            line += 1;
            col = 0;
        }
        col += w;
    }

    if col >= width {
        (line + 1, 0)
    } else {
        (line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_no_truncation() {
        assert_eq!(truncate_string("Short string", 20), "Short string");
    }

    #[test]
    fn test_truncate_string_with_truncation() {
        let result = truncate_string("This is a very long string that should be truncated", 20);
        assert_eq!(result, "This is a very lo...");
        assert_eq!(result.chars().count(), 20);
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_byte_index() {
        assert_eq!(byte_index("héllo", 0), 0);
        assert_eq!(byte_index("héllo", 2), 3);
        assert_eq!(byte_index("héllo", 99), 6);
    }

    #[test]
    fn test_hard_wrap_splits_long_lines() {
        assert_eq!(hard_wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_hard_wrap_respects_newlines() {
        assert_eq!(hard_wrap("ab\ncd", 10), vec!["ab", "cd"]);
        assert_eq!(hard_wrap("", 10), vec![""]);
    }

    #[test]
    fn test_cursor_line_col_matches_wrap() {
        assert_eq!(cursor_line_col("", 0, 10), (0, 0));
        assert_eq!(cursor_line_col("abcdefgh", 2, 3), (0, 2));
        assert_eq!(cursor_line_col("abcdefgh", 4, 3), (1, 1));
        assert_eq!(cursor_line_col("abcdefgh", 8, 3), (2, 2));
    }

    #[test]
    fn test_cursor_moves_to_next_line_when_line_full() {
        assert_eq!(cursor_line_col("abc", 3, 3), (1, 0));
    }

    #[test]
    fn test_cursor_after_newline() {
        assert_eq!(cursor_line_col("ab\ncd", 3, 10), (1, 0));
        assert_eq!(cursor_line_col("ab\ncd", 5, 10), (1, 2));
    }

    #[test]
    fn test_format_card_date_today() {
        let formatted = format_card_date(now());
        assert!(formatted.starts_with("Today "));
    }

    #[test]
    fn test_format_card_date_old() {
        assert_eq!(format_card_date(86_400 * 365).len(), "1971-01-01".len());
    }
}
