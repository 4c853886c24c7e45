//! Width-aware text helpers for CJK-heavy content.

use unicode_width::UnicodeWidthChar;

/// Truncate `s` to at most `max_width` terminal columns, appending `…` when
/// anything was cut. Han characters are two columns wide, so byte or char
/// counts would overflow the cell budget on most titles here.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut width = 0usize;
    let mut out = String::new();
    for (i, ch) in s.char_indices() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width {
            // Reserve one column for the ellipsis; drop trailing chars
            // until it fits.
            while width + 1 > max_width {
                match out.pop() {
                    Some(last) => width -= last.width().unwrap_or(0),
                    None => break,
                }
            }
            out.push('…');
            return out;
        }
        width += w;
        out.push_str(&s[i..i + ch.len_utf8()]);
    }
    out
}

/// `mm:ss` display for player positions.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_pass_through() {
        assert_eq!(truncate_to_width("大鱼", 10), "大鱼");
        assert_eq!(truncate_to_width("Bad apple", 10), "Bad apple");
    }

    #[test]
    fn wide_chars_count_two_columns() {
        // 6 columns of Han text into a 5-column budget.
        assert_eq!(truncate_to_width("大鱼海棠", 5), "大鱼…");
    }

    #[test]
    fn exact_fit_keeps_everything() {
        assert_eq!(truncate_to_width("大鱼海棠", 8), "大鱼海棠");
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(600), "10:00");
    }
}
