//! Decoration-based highlighting of function-like identifiers.
//!
//! A regex pass over the raw text that marks every identifier the symbol
//! table classifies as a function (known name, namespaced `A::b`, plugin
//! prefix, or followed by `(`). It shares the classifiers' word
//! classification and uses their token stream only to skip comments and
//! string literals.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::lexer::scanner::followed_by_call;
use crate::lexer::{Token, TokenCategory};
use crate::symbols::{DeclarationContext, SymbolTable, WordClass};

pub const FUNCTION_CLASS: &str = "cm-highlight-function";

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*(?:(?:::|/)[A-Za-z0-9_]+)*").expect("identifier pattern is valid"));

/// A styled byte range of the document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoration {
    pub start: usize,
    pub end: usize,
    pub class: &'static str,
}

#[derive(Debug, Clone)]
pub struct FunctionDecorator {
    symbols: Arc<SymbolTable>,
}

impl FunctionDecorator {
    pub fn new(symbols: Arc<SymbolTable>) -> Self {
        Self { symbols }
    }

    /// Decorations for `text`, given its token stream in document order.
    pub fn decorate(&self, text: &str, tokens: &[Token]) -> Vec<Decoration> {
        IDENTIFIER
            .find_iter(text)
            .filter(|m| !in_literal(tokens, m.start()))
            .filter(|m| {
                let call = followed_by_call(&text[m.end()..]);
                self.symbols.classify(m.as_str(), DeclarationContext::default(), call) == WordClass::Function
            })
            .map(|m| Decoration {
                start: m.start(),
                end: m.end(),
                class: FUNCTION_CLASS,
            })
            .collect()
    }
}

/// Whether byte `offset` falls inside a comment or string token.
fn in_literal(tokens: &[Token], offset: usize) -> bool {
    let i = tokens.partition_point(|token| token.end <= offset);
    tokens.get(i).is_some_and(|token| {
        token.start <= offset && matches!(token.category, TokenCategory::Comment | TokenCategory::String)
    })
}
