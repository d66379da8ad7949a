//! Streaming token classification for editor highlighting
//!
//! A classifier is a pure function from "current state + remaining input" to
//! "consumed length + category + next state". The [`tokenize`] driver calls it
//! repeatedly until the input is exhausted, so a highlight pass is a full
//! re-tokenization of the document (no incremental diffing).
//!
//! Every classifier in this module is total: it always consumes at least one
//! character of non-empty input and never fails. Malformed or partially typed
//! documents degrade to `TokenCategory::None` rather than breaking the editor.

pub mod json;
pub mod oml;
pub mod scanner;
pub mod wpl;

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

pub use json::JsonClassifier;
pub use oml::{OmlClassifier, OmlState};
pub use wpl::WplClassifier;

/// Highlight class assigned to a lexical span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenCategory {
    Comment,
    String,
    Number,
    Keyword,
    Type,
    Function,
    /// Named constant.
    Atom,
    Variable,
    Operator,
    /// Whitespace and punctuation with no styling.
    None,
}

impl TokenCategory {
    pub const ALL: [TokenCategory; 10] = [
        TokenCategory::Comment,
        TokenCategory::String,
        TokenCategory::Number,
        TokenCategory::Keyword,
        TokenCategory::Type,
        TokenCategory::Function,
        TokenCategory::Atom,
        TokenCategory::Variable,
        TokenCategory::Operator,
        TokenCategory::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenCategory::Comment => "comment",
            TokenCategory::String => "string",
            TokenCategory::Number => "number",
            TokenCategory::Keyword => "keyword",
            TokenCategory::Type => "type",
            TokenCategory::Function => "function",
            TokenCategory::Atom => "atom",
            TokenCategory::Variable => "variable",
            TokenCategory::Operator => "operator",
            TokenCategory::None => "none",
        }
    }

    pub fn is_styled(&self) -> bool {
        *self != TokenCategory::None
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified span of the tokenized text. Offsets are byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub category: TokenCategory,
}

impl Token {
    pub fn new(start: usize, end: usize, category: TokenCategory) -> Self {
        Self { start, end, category }
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice of `text` covered by this token.
    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.span()]
    }
}

/// Result of a single classification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<S> {
    /// Bytes consumed from the front of the input.
    pub len: usize,
    pub category: TokenCategory,
    pub state: S,
}

impl<S> Step<S> {
    pub fn new(len: usize, category: TokenCategory, state: S) -> Self {
        Self { len, category, state }
    }
}

/// A token classifier for one language.
///
/// `classify` must consume at least one byte (on a char boundary) of non-empty input.
pub trait Classifier {
    /// Explicit lexer state threaded through consecutive calls within one pass.
    type State: Clone + Default + fmt::Debug + PartialEq;

    fn start_state(&self) -> Self::State {
        Self::State::default()
    }

    fn classify(&self, input: &str, state: &Self::State) -> Step<Self::State>;
}

/// Tokenize `text` from the classifier's start state.
pub fn tokenize<C: Classifier>(classifier: &C, text: &str) -> Vec<Token> {
    tokenize_from(classifier, text, classifier.start_state()).0
}

/// Tokenize `text` from an explicit state, returning the tokens and the final state.
///
/// The returned tokens cover `text` exactly once, in order, without gaps.
pub fn tokenize_from<C: Classifier>(
    classifier: &C,
    text: &str,
    mut state: C::State,
) -> (Vec<Token>, C::State) {
    let mut tokens = Vec::with_capacity(text.len() / 4 + 1);
    let mut pos = 0;

    while pos < text.len() {
        let step = classifier.classify(&text[pos..], &state);
        let len = if step.len == 0 {
            // Keep the pass total even if a classifier stalls.
            scanner::char_len(&text[pos..])
        } else {
            step.len.min(text.len() - pos)
        };
        tokens.push(Token::new(pos, pos + len, step.category));
        state = step.state;
        pos += len;
    }

    (tokens, state)
}

/// Tokens with a visible style, i.e. everything but `TokenCategory::None`.
pub fn styled(tokens: &[Token]) -> impl Iterator<Item = &Token> {
    tokens.iter().filter(|token| token.category.is_styled())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Classifies every char as its own `None` token, except digits.
    struct Digits;

    impl Classifier for Digits {
        type State = usize;

        fn classify(&self, input: &str, seen: &usize) -> Step<usize> {
            let len = scanner::char_len(input);
            let category = if input.as_bytes()[0].is_ascii_digit() {
                TokenCategory::Number
            } else {
                TokenCategory::None
            };
            Step::new(len, category, seen + 1)
        }
    }

    struct Stalled;

    impl Classifier for Stalled {
        type State = ();

        fn classify(&self, _input: &str, _state: &()) -> Step<()> {
            Step::new(0, TokenCategory::None, ())
        }
    }

    #[test]
    fn test_driver_threads_state() {
        let (tokens, state) = tokenize_from(&Digits, "a1é", 0);
        assert_eq!(state, 3);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], Token::new(1, 2, TokenCategory::Number));
        // multi-byte char is a single token
        assert_eq!(tokens[2], Token::new(2, 4, TokenCategory::None));
    }

    #[test]
    fn test_driver_forces_progress() {
        let tokens = tokenize(&Stalled, "ab");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].end, 2);
    }

    #[test]
    fn test_styled_filters_none() {
        let tokens = tokenize(&Digits, "a1b2");
        let styled: Vec<_> = styled(&tokens).collect();
        assert_eq!(styled.len(), 2);
        assert!(styled.iter().all(|t| t.category == TokenCategory::Number));
    }
}
