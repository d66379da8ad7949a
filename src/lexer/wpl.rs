//! WPL token classifier.
//!
//! WPL needs no state between tokens: every token is decided by a fixed
//! dispatch over the remaining input and a symbol table lookup.

use std::sync::Arc;

use crate::language::Language;
use crate::symbols::{DeclarationContext, SymbolTable};

use super::scanner::{self, PUNCTUATION};
use super::{Classifier, Step, TokenCategory};

#[derive(Debug, Clone)]
pub struct WplClassifier {
    symbols: Arc<SymbolTable>,
}

impl Default for WplClassifier {
    fn default() -> Self {
        Self::new(SymbolTable::builtin(Language::Wpl))
    }
}

impl WplClassifier {
    pub fn new(symbols: Arc<SymbolTable>) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &Arc<SymbolTable> {
        &self.symbols
    }
}

fn is_wpl_word_byte(b: u8) -> bool {
    scanner::is_word_byte(b) || b == b'/'
}

impl Classifier for WplClassifier {
    type State = ();

    fn classify(&self, input: &str, _state: &()) -> Step<()> {
        use TokenCategory::*;

        let ws = scanner::whitespace(input);
        if ws > 0 {
            return Step::new(ws, None, ());
        }

        let first = input.as_bytes()[0];

        if first == b'#' || input.starts_with("//") {
            return Step::new(scanner::line_end(input), Comment, ());
        }

        if first == b'"' || first == b'\'' {
            return Step::new(scanner::quoted(input, first), String, ());
        }

        if let Some(len) = scanner::number(input, 1) {
            return Step::new(len, Number, ());
        }

        if PUNCTUATION.contains(&first) {
            return Step::new(1, Operator, ());
        }

        let len = scanner::take_while(input, is_wpl_word_byte);
        if len > 0 {
            let word = &input[..len];
            let call = scanner::followed_by_call(&input[len..]);
            let class = self.symbols.classify(word, DeclarationContext::default(), call);
            return Step::new(len, class.category(), ());
        }

        Step::new(scanner::char_len(input), None, ())
    }
}
