//! Ranking and narrowing of completion candidates
//!
//! The completion source always returns the whole catalog; this module does the
//! host-side narrowing against the text typed since the anchor.
//!
//! Ranking algorithm (in order of priority):
//! 1. Match quality (exact-case prefix, case-insensitive prefix, substring) - lower is better
//! 2. Length (shorter labels preferred) - lower is better
//! 3. Lexicographic order (alphabetical) - as tie-breaker

use std::cmp::Ordering;

use super::catalog::CompletionItem;

/// How a label matches the typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchQuality {
    Prefix,
    CaseInsensitivePrefix,
    Substring,
}

impl MatchQuality {
    /// Classify `label` against `typed`; `None` if it does not match at all.
    pub fn of(label: &str, typed: &str) -> Option<Self> {
        if label.starts_with(typed) {
            return Some(MatchQuality::Prefix);
        }
        let label = label.to_lowercase();
        let typed = typed.to_lowercase();
        if label.starts_with(&typed) {
            Some(MatchQuality::CaseInsensitivePrefix)
        } else if label.contains(&typed) {
            Some(MatchQuality::Substring)
        } else {
            None
        }
    }

    fn rank(&self) -> f64 {
        match self {
            MatchQuality::Prefix => 0.0,
            MatchQuality::CaseInsensitivePrefix => 1.0,
            MatchQuality::Substring => 2.0,
        }
    }
}

/// Criteria for ranking completion results
#[derive(Debug, Clone)]
pub struct RankingCriteria {
    /// Weight for match quality (default: 10.0)
    /// Must dominate length so that any prefix match beats any substring match
    pub match_weight: f64,

    /// Weight for label length (default: 0.01)
    pub length_weight: f64,

    /// Maximum results to return (default: 50)
    pub max_results: usize,
}

impl Default for RankingCriteria {
    fn default() -> Self {
        Self {
            match_weight: 10.0,
            length_weight: 0.01,
            max_results: 50,
        }
    }
}

impl RankingCriteria {
    /// Keep every match, e.g. for a CLI dump.
    pub fn unbounded() -> Self {
        Self {
            max_results: usize::MAX,
            ..Self::default()
        }
    }
}

/// Narrow `items` to those matching `typed`, best matches first, limited to max_results
pub fn rank_candidates<'a>(
    items: &'a [CompletionItem],
    typed: &str,
    criteria: &RankingCriteria,
) -> Vec<&'a CompletionItem> {
    let mut scored: Vec<(f64, &CompletionItem)> = items
        .iter()
        .filter_map(|item| {
            MatchQuality::of(&item.label, typed).map(|quality| (calculate_score(item, quality, criteria), item))
        })
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| match score_a.partial_cmp(score_b) {
        Some(Ordering::Equal) => a.label.cmp(&b.label),
        Some(ord) => ord,
        None => Ordering::Equal,
    });
    scored.truncate(criteria.max_results);

    scored.into_iter().map(|(_, item)| item).collect()
}

/// Lower scores are better
fn calculate_score(item: &CompletionItem, quality: MatchQuality, criteria: &RankingCriteria) -> f64 {
    let match_score = quality.rank() * criteria.match_weight;
    let length_score = item.label.chars().count() as f64 * criteria.length_weight;

    match_score + length_score
}
