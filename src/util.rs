#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Text helpers shared by the template and code coordinate spaces.

/// Returns true for characters that end a line on their own.
///
/// `\r\n` is handled by the caller, since it spans two characters.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Splits `code` into lines, keeping each line's terminator.
///
/// Both `\n` and `\r\n` (and a lone `\r`) end a line. Joining the result gives
/// back `code` unchanged, and an empty string gives no lines at all.
pub fn split_lines(code: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = code.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }

        let mut end = idx + c.len_utf8();
        if c == '\r'
            && let Some(&(next_idx, '\n')) = chars.peek()
        {
            end = next_idx + 1;
            chars.next();
        }

        lines.push(&code[start..end]);
        start = end;
    }

    if start < code.len() {
        lines.push(&code[start..]);
    }

    lines
}

/// Number of chars in `text`; every offset in this crate counts chars.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Returns true if the trimmed line starts with one of the comment `markers`.
pub fn is_comment_line<S: AsRef<str>>(line: &str, markers: &[S]) -> bool {
    let trimmed = line.trim_start();
    markers
        .iter()
        .any(|marker| !marker.as_ref().is_empty() && trimmed.starts_with(marker.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_terminators() {
        assert_eq!(split_lines("a = 1\nb = 2\r\nc"), vec!["a = 1\n", "b = 2\r\n", "c"]);
        assert_eq!(split_lines("x\n\n"), vec!["x\n", "\n"]);
        assert_eq!(split_lines("lone\rcr"), vec!["lone\r", "cr"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn split_round_trips() {
        let code = "def foo():\r\n    pass\n\u{2028}tail";
        assert_eq!(split_lines(code).concat(), code);
    }

    #[test]
    fn comment_detection() {
        assert!(is_comment_line("    # put your code here\n", &["#", "//"]));
        assert!(is_comment_line("// TODO", &["#", "//"]));
        assert!(!is_comment_line("x = 1  # trailing\n", &["#", "//"]));
        assert!(!is_comment_line("# python only", &["//"]));
        assert!(!is_comment_line("anything", &[""]));
    }
}
