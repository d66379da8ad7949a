//! A completion session: from a popup's appearance until it is dismissed or
//! committed, kept alive while the typed text matches the result's validity
//! pattern.

use super::catalog::CompletionItem;
use super::ranking::{rank_candidates, RankingCriteria};
use super::source::CompletionResult;

#[derive(Debug, Clone)]
pub struct CompletionSession {
    result: CompletionResult,
    typed: String,
}

impl CompletionSession {
    /// Open a session; `typed` is the text between the anchor and the cursor.
    pub fn open(result: CompletionResult, typed: impl Into<String>) -> Self {
        Self { result, typed: typed.into() }
    }

    pub fn anchor(&self) -> usize {
        self.result.anchor
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn result(&self) -> &CompletionResult {
        &self.result
    }

    /// Re-evaluate after an edit. Returns `false` when the session must close.
    ///
    /// An empty `typed` keeps an explicitly opened popup alive at its anchor.
    pub fn update(&mut self, typed: &str) -> bool {
        if !typed.is_empty() && !self.result.is_valid_for(typed) {
            return false;
        }
        self.typed = typed.to_string();
        true
    }

    /// Candidates narrowed against the typed text.
    pub fn visible(&self, criteria: &RankingCriteria) -> Vec<&CompletionItem> {
        rank_candidates(&self.result.candidates, &self.typed, criteria)
    }
}
