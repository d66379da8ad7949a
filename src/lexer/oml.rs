//! OML token classifier.
//!
//! OML documents are split into sections by `---` lines: a header, the mapping
//! body and an optional privacy segment. Bare words double as type names and
//! field names, so the lexer state tracks whether a word sits in declaration
//! position (after `:` and before `=`) and which section it is in.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::symbols::{DeclarationContext, SymbolTable};

use super::scanner::{self, PUNCTUATION};
use super::{Classifier, Step, TokenCategory};

/// Lexer state carried across tokens within one pass.
///
/// Invariant: `in_privacy` implies `in_header`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OmlState {
    /// Past the first `---` separator.
    pub in_header: bool,
    /// Past the second `---` separator.
    pub in_privacy: bool,
    pub after_colon: bool,
    pub after_equal: bool,
}

impl OmlState {
    fn declaration_context(&self) -> DeclarationContext {
        DeclarationContext {
            after_colon: self.after_colon,
            after_equal: self.after_equal,
            in_privacy: self.in_privacy,
        }
    }

    /// Advance the section flags on a `---` separator.
    fn separator(mut self) -> Self {
        if !self.in_header {
            self.in_header = true;
        } else if !self.in_privacy {
            self.in_privacy = true;
        }
        self
    }

    fn punctuation(mut self, op: u8) -> Self {
        match op {
            b':' => self.after_colon = true,
            b'=' => self.after_equal = true,
            b';' => {
                self.after_colon = false;
                self.after_equal = false;
            }
            _ => {}
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct OmlClassifier {
    symbols: Arc<SymbolTable>,
}

impl Default for OmlClassifier {
    fn default() -> Self {
        Self::new(SymbolTable::builtin(Language::Oml))
    }
}

impl OmlClassifier {
    pub fn new(symbols: Arc<SymbolTable>) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &Arc<SymbolTable> {
        &self.symbols
    }
}

fn is_path_byte(b: u8) -> bool {
    scanner::is_word_byte(b) || matches!(b, b'/' | b'[' | b']')
}

fn is_oml_word_byte(b: u8) -> bool {
    scanner::is_word_byte(b) || b == b':'
}

impl Classifier for OmlClassifier {
    type State = OmlState;

    fn classify(&self, input: &str, state: &OmlState) -> Step<OmlState> {
        use TokenCategory::*;

        let state = *state;
        let ws = scanner::whitespace(input);
        if ws > 0 {
            return Step::new(ws, None, state);
        }

        let bytes = input.as_bytes();
        let first = bytes[0];

        if first == b'#' || input.starts_with("//") {
            return Step::new(scanner::line_end(input), Comment, state);
        }

        if input.starts_with("---") {
            return Step::new(3, Keyword, state.separator());
        }

        if first == b'"' {
            return Step::new(scanner::quoted(input, first), String, state);
        }

        // Dotted numerals cover IPv4 literals.
        if let Some(len) = scanner::number(input, 3) {
            return Step::new(len, Number, state);
        }

        if first == b'@' {
            let name = scanner::take_while(&input[1..], scanner::is_word_byte);
            let category = if name > 0 { Variable } else { Operator };
            return Step::new(1 + name, category, state);
        }

        if first == b'/' {
            let path = scanner::take_while(&input[1..], is_path_byte);
            if path > 0 {
                return Step::new(1 + path, String, state);
            }
        }

        if PUNCTUATION.contains(&first) {
            return Step::new(1, Operator, state.punctuation(first));
        }

        let len = scanner::take_while(input, is_oml_word_byte);
        if len > 0 {
            let word = &input[..len];
            let call = scanner::followed_by_call(&input[len..]);
            let class = self.symbols.classify(word, state.declaration_context(), call);
            let mut next = state;
            if class.is_declaration() {
                next.after_colon = false;
            }
            return Step::new(len, class.category(), next);
        }

        Step::new(scanner::char_len(input), None, state)
    }
}
