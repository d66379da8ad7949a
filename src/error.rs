use thiserror::Error;

use crate::language::{Language, Locale};

/// Errors raised while loading external tooling data or addressing a document.
///
/// Highlighting and completion never produce these; they degrade to "no styling" or
/// "no suggestion" instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse {language} completion table for {locale}: {source}")]
    CatalogParse {
        language: Language,
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse {language} language definition: {source}")]
    DefinitionParse {
        language: Language,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid symbol pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("offset {offset} is outside the document (length {len})")]
    OffsetOutOfBounds { offset: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
