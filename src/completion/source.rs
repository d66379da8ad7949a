//! Completion source: decides whether to offer suggestions for the text before
//! the cursor and where the replacement starts.
//!
//! Matching looks only at the current line before the cursor (at most
//! [`MAX_LOOKBEHIND`] chars), with the pattern anchored at the cursor. The
//! candidate list is always the whole catalog; narrowing against the typed
//! text belongs to the host (see [`super::ranking`]).

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use tracing::trace;

use crate::language::{Language, Locale};
use crate::metrics::metrics;

use super::catalog::{build_catalog, Catalog, CompletionItem};

/// Chars of the current line considered when matching before the cursor.
pub const MAX_LOOKBEHIND: usize = 250;

const WPL_WORD: &str = r"[A-Za-z0-9_/]+";
const OML_WORD: &str = r"[A-Za-z0-9_/:\[\]]+|\|";

fn before_cursor(pattern: &str) -> Regex {
    Regex::new(&format!("(?:{})$", pattern)).expect("completion pattern is valid")
}

fn whole(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{})$", pattern)).expect("completion pattern is valid")
}

static WPL_BEFORE: Lazy<Regex> = Lazy::new(|| before_cursor(WPL_WORD));
static OML_BEFORE: Lazy<Regex> = Lazy::new(|| before_cursor(OML_WORD));
static OML_PIPE: Lazy<Regex> = Lazy::new(|| before_cursor(r"\|"));
static WPL_VALID: Lazy<ValidityPattern> = Lazy::new(|| ValidityPattern(whole(WPL_WORD)));
static OML_VALID: Lazy<ValidityPattern> = Lazy::new(|| ValidityPattern(whole(OML_WORD)));

/// Pattern the text typed since the anchor must match for a result to stay valid.
#[derive(Clone)]
pub struct ValidityPattern(Regex);

impl ValidityPattern {
    pub fn is_valid(&self, typed: &str) -> bool {
        self.0.is_match(typed)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ValidityPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValidityPattern").field(&self.as_str()).finish()
    }
}

impl Serialize for ValidityPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A completion check requested by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionRequest {
    /// Document text before the cursor.
    pub before: String,
    /// Invoked by an explicit gesture rather than by typing.
    pub explicit: bool,
}

impl CompletionRequest {
    pub fn new(before: impl Into<String>, explicit: bool) -> Self {
        Self { before: before.into(), explicit }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResult {
    /// Char offset where the replacement starts.
    pub anchor: usize,
    #[serde(serialize_with = "serialize_candidates")]
    pub candidates: Arc<[CompletionItem]>,
    pub valid_while: ValidityPattern,
}

impl CompletionResult {
    /// Whether `typed` (the text between the anchor and the cursor) keeps this result alive.
    pub fn is_valid_for(&self, typed: &str) -> bool {
        self.valid_while.is_valid(typed)
    }
}

fn serialize_candidates<S: Serializer>(candidates: &Arc<[CompletionItem]>, serializer: S) -> Result<S::Ok, S::Error> {
    candidates[..].serialize(serializer)
}

/// Byte range of the `pattern` match that ends at the end of `before`,
/// looking only at the last line and at most [`MAX_LOOKBEHIND`] chars.
pub fn match_before(pattern: &Regex, before: &str) -> Option<Range<usize>> {
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let line = &before[line_start..];
    let skip = line.chars().count().saturating_sub(MAX_LOOKBEHIND);
    let window_start = line_start + line.char_indices().nth(skip).map_or(line.len(), |(i, _)| i);

    pattern
        .find(&before[window_start..])
        .map(|m| window_start + m.start()..window_start + m.end())
}

#[derive(Debug, Clone)]
pub struct CompletionSource {
    language: Language,
    catalog: Arc<Catalog>,
}

impl CompletionSource {
    /// A source over the built-in catalog for `(language, locale)`.
    pub fn new(language: Language, locale: Locale) -> Self {
        Self::with_catalog(build_catalog(language, locale))
    }

    pub fn with_catalog(catalog: Arc<Catalog>) -> Self {
        Self { language: catalog.language(), catalog }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn valid_while(&self) -> &'static ValidityPattern {
        match self.language {
            Language::Wpl => &WPL_VALID,
            Language::Oml => &OML_VALID,
        }
    }

    pub fn respond(&self, request: &CompletionRequest) -> Option<CompletionResult> {
        self.complete(&request.before, request.explicit)
    }

    /// Suggestions for a cursor placed right after `before`.
    ///
    /// Returns `None` when nothing identifier-like precedes the cursor and the
    /// request was not explicit.
    pub fn complete(&self, before: &str, explicit: bool) -> Option<CompletionResult> {
        let (word, pipe) = match self.language {
            Language::Wpl => (match_before(&WPL_BEFORE, before), None),
            Language::Oml => (match_before(&OML_BEFORE, before), match_before(&OML_PIPE, before)),
        };

        let start = match pipe.or(word) {
            Some(range) => range.start,
            None if explicit => before.len(),
            None => {
                trace!("No {} completion: nothing to complete before cursor", self.language);
                metrics().record_completion_suppressed();
                return None;
            }
        };

        let anchor = before[..start].chars().count();
        trace!("Offering {} completions anchored at {}", self.language, anchor);
        metrics().record_completion_offered();

        Some(CompletionResult {
            anchor,
            candidates: Arc::clone(self.catalog.items()),
            valid_while: self.valid_while().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wpl() -> CompletionSource {
        CompletionSource::new(Language::Wpl, Locale::EnUs)
    }

    fn oml() -> CompletionSource {
        CompletionSource::new(Language::Oml, Locale::EnUs)
    }

    #[test]
    fn test_gating() {
        let result = wpl().complete("pack", false).unwrap();
        assert_eq!(result.anchor, 0);
        assert!(result.candidates.iter().any(|item| item.label == "package"));

        assert!(wpl().complete(" ", false).is_none());
        assert!(wpl().complete("", false).is_none());
        assert!(wpl().complete("rule x {(", false).is_none());
    }

    #[test]
    fn test_explicit_anchors_at_cursor() {
        let result = wpl().complete("rule x {(", true).unwrap();
        assert_eq!(result.anchor, 9);
        assert_eq!(result.candidates.len(), wpl().catalog().len());
    }

    #[test]
    fn test_word_patterns() {
        assert_eq!(wpl().complete("(ip:src, time/c", false).unwrap().anchor, 9);
        assert!(wpl().complete("(chars:", false).is_none());

        assert_eq!(oml().complete("x = Now::ti", false).unwrap().anchor, 4);
        assert_eq!(oml().complete("p = read(items[0", false).unwrap().anchor, 9);
    }

    #[test]
    fn test_pipe_anchor() {
        let result = oml().complete("pipe read(x) |", false).unwrap();
        assert_eq!(result.anchor, 13);
        let result = oml().complete("pipe read(x) |base", false).unwrap();
        assert_eq!(result.anchor, 14);
        // WPL has no pipe completion
        assert!(wpl().complete("| ", false).is_none());
        assert!(wpl().complete("|", false).is_none());
    }

    #[test]
    fn test_only_current_line_counts() {
        assert!(wpl().complete("package\n", false).is_none());
        let result = wpl().complete("package\n  ru", false).unwrap();
        assert_eq!(result.anchor, 10);
    }

    #[test]
    fn test_lookbehind_is_bounded() {
        let long = "a".repeat(MAX_LOOKBEHIND + 50);
        let result = wpl().complete(&long, false).unwrap();
        assert_eq!(result.anchor, 50);
    }

    #[test]
    fn test_request_from_host_json() {
        let request: CompletionRequest = serde_json::from_str(r#"{"before": "x = "}"#).unwrap();
        assert!(!request.explicit);
        assert!(oml().respond(&request).is_none());

        let request = CompletionRequest::new("x = ", true);
        assert_eq!(oml().respond(&request).map(|r| r.anchor), Some(4));
    }

    #[test]
    fn test_result_serializes_candidates() {
        let result = oml().complete("re", false).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["anchor"], 0);
        assert_eq!(json["candidates"].as_array().map(Vec::len), Some(oml().catalog().len()));
        assert_eq!(json["candidates"][0]["label"], "read");
        assert_eq!(json["validWhile"], r"^(?:[A-Za-z0-9_/:\[\]]+|\|)$");
    }

    #[test]
    fn test_anchor_is_char_offset() {
        let result = wpl().complete("说明 ch", false).unwrap();
        assert_eq!(result.anchor, 3);
    }

    #[test]
    fn test_valid_while() {
        let result = oml().complete("re", false).unwrap();
        assert!(result.is_valid_for("read"));
        assert!(result.is_valid_for("Now::time"));
        assert!(result.is_valid_for("|"));
        assert!(!result.is_valid_for("read "));
        assert!(!result.is_valid_for("read("));

        let result = wpl().complete("ch", false).unwrap();
        assert!(result.is_valid_for("chars"));
        assert!(result.is_valid_for("time/clf"));
        assert!(!result.is_valid_for("chars:"));
        assert_eq!(result.valid_while.as_str(), r"^(?:[A-Za-z0-9_/]+)$");
    }
}
