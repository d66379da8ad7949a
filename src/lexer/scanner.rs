//! Byte-level scanning helpers shared by the classifiers.
//!
//! All helpers are pure peeks over the remaining input: they report how many
//! bytes a construct would consume and never mutate a cursor, so lookahead
//! cannot corrupt the scan position.

/// Structural punctuation classified as `operator` by both DSLs.
pub const PUNCTUATION: &[u8] = b"{}()[],|;=!:";

/// ASCII word character (`\w` in the DSL grammars).
#[inline]
pub fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Byte length of the first char of `input` (0 for empty input).
#[inline]
pub fn char_len(input: &str) -> usize {
    input.chars().next().map_or(0, char::len_utf8)
}

/// Length of the leading run of whitespace, line breaks included.
pub fn whitespace(input: &str) -> usize {
    input
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(input.len(), |(i, _)| i)
}

/// Offset of the end of the current line (the next `\n`, exclusive).
pub fn line_end(input: &str) -> usize {
    input.find('\n').unwrap_or(input.len())
}

/// Length of the leading run of ASCII bytes accepted by `accept`.
pub fn take_while(input: &str, accept: impl Fn(u8) -> bool) -> usize {
    input.bytes().take_while(|&b| accept(b)).count()
}

/// Length of a quoted literal starting at `input[0] == quote`.
///
/// Stops after the matching unescaped quote, or at end of line for an
/// unterminated literal. A backslash escapes the following char.
pub fn quoted(input: &str, quote: u8) -> usize {
    let end = line_end(input);
    let bytes = &input.as_bytes()[..end];
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 1;
                if i < bytes.len() {
                    i += char_len(&input[i..]);
                }
            }
            b if b == quote => return i + 1,
            _ => i += char_len(&input[i..]),
        }
    }
    end
}

/// Length of `-?\d+(\.\d+){0,max_groups}` at the front of `input`.
pub fn number(input: &str, max_groups: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    let sign = usize::from(bytes.first() == Some(&b'-'));
    let int = take_while(&input[sign..], |b| b.is_ascii_digit());
    if int == 0 {
        return None;
    }

    let mut len = sign + int;
    for _ in 0..max_groups {
        if bytes.get(len) != Some(&b'.') {
            break;
        }
        let digits = take_while(&input[len + 1..], |b| b.is_ascii_digit());
        if digits == 0 {
            break;
        }
        len += 1 + digits;
    }
    Some(len)
}

/// Whether the text after a word looks like a call: inline whitespace then `(`.
pub fn followed_by_call(rest: &str) -> bool {
    let skipped = take_while(rest, |b| b == b' ' || b == b'\t');
    rest.as_bytes().get(skipped) == Some(&b'(')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_includes_newlines() {
        assert_eq!(whitespace("  \n\tx"), 4);
        assert_eq!(whitespace("x"), 0);
        assert_eq!(whitespace("   "), 3);
    }

    #[test]
    fn test_quoted() {
        assert_eq!(quoted(r#""abc" rest"#, b'"'), 5);
        assert_eq!(quoted(r#""a\"b" rest"#, b'"'), 6);
        assert_eq!(quoted(r#""abc"#, b'"'), 4);
        assert_eq!(quoted("\"ab\ncd\"", b'"'), 3);
        assert_eq!(quoted("'it''", b'\''), 4);
        assert_eq!(quoted("\"é\"", b'"'), 4);
        assert_eq!(quoted("\"ab\\", b'"'), 4);
    }

    #[test]
    fn test_number() {
        assert_eq!(number("42;", 1), Some(2));
        assert_eq!(number("-3.5x", 1), Some(4));
        assert_eq!(number("1.2.3", 1), Some(3));
        assert_eq!(number("192.168.0.1 ", 3), Some(11));
        assert_eq!(number("10.0.0.1.5", 3), Some(8));
        assert_eq!(number("7.", 3), Some(1));
        assert_eq!(number("-x", 3), None);
        assert_eq!(number("abc", 3), None);
    }

    #[test]
    fn test_followed_by_call() {
        assert!(followed_by_call("(x)"));
        assert!(followed_by_call(" \t(x)"));
        assert!(!followed_by_call("\n(x)"));
        assert!(!followed_by_call(" = 1"));
        assert!(!followed_by_call(""));
    }
}
