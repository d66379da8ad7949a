//! JSON classifier for the `json` editor mode.

use super::scanner::{self, take_while};
use super::{Classifier, Step, TokenCategory};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonClassifier;

const LITERALS: [&str; 3] = ["true", "false", "null"];

/// Length of a JSON number (`-?\d+(\.\d+)?([eE][+-]?\d+)?`).
fn number(input: &str) -> Option<usize> {
    let mut len = scanner::number(input, 1)?;
    let bytes = input.as_bytes();
    if matches!(bytes.get(len), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(len + 1), Some(b'+' | b'-')));
        let digits = take_while(&input[len + 1 + sign..], |b| b.is_ascii_digit());
        if digits > 0 {
            len += 1 + sign + digits;
        }
    }
    Some(len)
}

impl Classifier for JsonClassifier {
    type State = ();

    fn classify(&self, input: &str, _state: &()) -> Step<()> {
        use TokenCategory::*;

        let ws = scanner::whitespace(input);
        if ws > 0 {
            return Step::new(ws, None, ());
        }

        let first = input.as_bytes()[0];
        if first == b'"' {
            return Step::new(scanner::quoted(input, b'"'), String, ());
        }
        if let Some(len) = number(input) {
            return Step::new(len, Number, ());
        }
        if b"{}[],:".contains(&first) {
            return Step::new(1, Operator, ());
        }

        let word = take_while(input, scanner::is_word_byte);
        if word > 0 {
            let category = if LITERALS.contains(&&input[..word]) { Atom } else { None };
            return Step::new(word, category, ());
        }

        Step::new(scanner::char_len(input), None, ())
    }
}
