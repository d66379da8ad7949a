//! Context-aware completion for WPL and OML
//!
//! This module provides:
//! - Localized, memoized completion catalogs built from static tables
//! - Snippet templates with placeholder tab stops
//! - A completion source that gates suggestions on the text before the cursor
//! - Host-side narrowing and ranking of candidates within a completion session

pub mod catalog;
pub mod labels;
pub mod ranking;
pub mod session;
pub mod snippet;
pub mod source;

pub use catalog::{build_catalog, build_catalog_for_tag, Catalog, CatalogEntry, CompletionItem, CompletionKind};
pub use labels::{build_info, labels, Labels};
pub use ranking::{rank_candidates, MatchQuality, RankingCriteria};
pub use session::CompletionSession;
pub use snippet::{Placeholder, Resolved, Segment, Snippet, TabStop};
pub use source::{match_before, CompletionRequest, CompletionResult, CompletionSource, ValidityPattern, MAX_LOOKBEHIND};
