//! Visible-width text helpers
//!
//! Terminal escape sequences count as zero columns everywhere in this module,
//! so wrap and truncation limits apply to what the user actually sees.
//! Widths come from `unicode-width` (wide CJK and emoji count as two).

use unicode_width::UnicodeWidthChar;

const ESC: char = '\u{1b}';

/// Marker appended to truncated text
pub const ELLIPSIS: &str = "…";

/// A piece of text: an escape sequence (width 0) or one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Piece<'a> {
    text: &'a str,
    width: usize,
}

/// Splits `s` into escape sequences and single characters
fn pieces(s: &str) -> impl Iterator<Item = Piece<'_>> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let c = rest.chars().next()?;
        let len = if c == ESC {
            escape_len(rest)
        } else {
            c.len_utf8()
        };
        let (text, tail) = rest.split_at(len);
        rest = tail;
        let width = if c == ESC { 0 } else { c.width().unwrap_or(0) };
        Some(Piece { text, width })
    })
}

/// Byte length of the escape sequence at the start of `s` (which starts with ESC)
fn escape_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        None => 1,
        // CSI: parameters/intermediates, then a final byte in 0x40..=0x7E
        Some(b'[') => {
            let mut i = 2;
            while i < bytes.len() {
                let b = bytes[i];
                if (0x40..=0x7E).contains(&b) {
                    return i + 1;
                }
                if !(0x20..=0x3F).contains(&b) {
                    return i;
                }
                i += 1;
            }
            bytes.len()
        }
        // OSC: terminated by BEL or ESC \
        Some(b']') => {
            let mut i = 2;
            while i < bytes.len() {
                match bytes[i] {
                    0x07 => return i + 1,
                    0x1B if bytes.get(i + 1) == Some(&b'\\') => return i + 2,
                    _ => i += 1,
                }
            }
            bytes.len()
        }
        Some(&b) if b.is_ascii() => 2,
        // ESC followed by a non-ASCII char: only the ESC itself
        Some(_) => 1,
    }
}

/// Display width of `s`, ignoring escape sequences
pub fn visible_width(s: &str) -> usize {
    pieces(s).map(|p| p.width).sum()
}

/// Number of characters in `s`, not counting escape sequences
pub fn visible_chars(s: &str) -> usize {
    pieces(s).filter(|p| !is_escape(p)).count()
}

/// Keeps the first `max` visible characters of `s` and appends [`ELLIPSIS`]
///
/// Escape sequences never count toward `max` and are never split. Escapes in
/// the cut tail are re-emitted after the ellipsis so a closing reset survives.
/// `max == 0` disables truncation.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if max == 0 || visible_chars(s) <= max {
        return s.to_string();
    }

    let mut kept = String::with_capacity(s.len());
    let mut tail = String::new();
    let mut count = 0;

    for piece in pieces(s) {
        if is_escape(&piece) {
            let out = if count < max { &mut kept } else { &mut tail };
            out.push_str(piece.text);
        } else if count < max {
            kept.push_str(piece.text);
            count += 1;
        }
    }

    kept.truncate(kept.trim_end().len());
    kept.push_str(ELLIPSIS);
    kept.push_str(&tail);
    kept
}

fn is_escape(piece: &Piece<'_>) -> bool {
    piece.text.starts_with(ESC)
}

/// Word-wraps one line of text to `width` visible columns
///
/// Words wider than `width` are broken between characters. A single character
/// wider than `width` (a wide glyph at `width == 1`) still gets a line of its
/// own and overflows. Always returns at least one line. `width == 0` disables
/// wrapping.
pub fn wrap_words(line: &str, width: usize) -> Vec<String> {
    if width == 0 || visible_width(line) <= width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_whitespace() {
        let word_width = visible_width(word);

        if current_width > 0 && current_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width > width {
            for piece in pieces(word) {
                if current_width + piece.width > width && current_width > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push_str(piece.text);
                current_width += piece.width;
            }
            continue;
        }

        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Flattens text that must stay on one display line
///
/// Line breaks and tabs become spaces; other control characters are dropped.
/// Escape sequences pass through untouched.
pub fn single_line(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            '\n' | '\t' => Some(' '),
            '\r' => None,
            ESC => Some(c),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Expands tabs to four spaces and drops carriage returns
pub fn expand_tabs(s: &str) -> String {
    s.replace('\r', "").replace('\t', "    ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_of_plain_text() {
        assert_eq!(visible_width("hello"), 5);
        assert_eq!(visible_width(""), 0);
    }

    #[test]
    fn width_ignores_escape_sequences() {
        assert_eq!(visible_width("\x1b[31mred\x1b[0m"), 3);
        assert_eq!(visible_width("\x1b]8;;http://x\x07link\x1b]8;;\x07"), 4);
    }

    #[test]
    fn width_of_wide_characters() {
        assert_eq!(visible_width("日本"), 4);
        assert_eq!(visible_width("└─ "), 3);
    }

    #[test]
    fn visible_chars_skip_markup() {
        assert_eq!(visible_chars("\x1b[31mabc\x1b[0m"), 3);
        assert_eq!(visible_chars("日本"), 2);
    }

    #[test]
    fn truncate_short_string() {
        assert_eq!(truncate_chars("hello", 10), "hello");
    }

    #[test]
    fn truncate_exact_length() {
        assert_eq!(truncate_chars("hello", 5), "hello");
    }

    #[test]
    fn truncate_long_string() {
        assert_eq!(truncate_chars("hello world", 8), "hello wo…");
    }

    #[test]
    fn truncate_drops_trailing_space() {
        assert_eq!(truncate_chars("hello world", 6), "hello…");
    }

    #[test]
    fn truncate_ignores_markup_length() {
        let colored = "\x1b[31mabcdefghij\x1b[0m";
        assert_eq!(truncate_chars(colored, 12), colored);
        assert_eq!(truncate_chars(colored, 10), colored);
    }

    #[test]
    fn truncate_keeps_closing_reset() {
        let colored = "\x1b[31mabcdefghij\x1b[0m";
        assert_eq!(truncate_chars(colored, 4), "\x1b[31mabcd…\x1b[0m");
    }

    #[test]
    fn truncate_zero_disables() {
        assert_eq!(truncate_chars("hello", 0), "hello");
    }

    #[test]
    fn wrap_fits() {
        assert_eq!(wrap_words("hello world", 80), vec!["hello world"]);
    }

    #[test]
    fn wrap_at_word_boundaries() {
        assert_eq!(
            wrap_words("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn wrap_breaks_long_words() {
        assert_eq!(wrap_words("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_ignores_markup_width() {
        let line = "\x1b[31maaaa\x1b[0m bbbb";
        assert_eq!(wrap_words(line, 9), vec![line.to_string()]);
    }

    #[test]
    fn wrap_every_line_fits() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod";
        for line in wrap_words(text, 12) {
            assert!(visible_width(&line) <= 12, "line too wide: {:?}", line);
        }
    }

    #[test]
    fn wrap_overflows_with_character_wider_than_width() {
        assert_eq!(wrap_words("日日", 1), vec!["日", "日"]);
        assert_eq!(wrap_words("日本語", 3), vec!["日", "本", "語"]);
    }

    #[test]
    fn wrap_zero_width_disables() {
        assert_eq!(wrap_words("a b c", 0), vec!["a b c"]);
    }

    #[test]
    fn single_line_flattens_breaks() {
        assert_eq!(single_line("a\nb\tc\r"), "a b c");
        assert_eq!(single_line("\x1b[1mx\x1b[0m"), "\x1b[1mx\x1b[0m");
    }
}
