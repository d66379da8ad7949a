//! Language and UI-locale identifiers shared by the lexers, catalogs and the editor adapter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The two DSLs with full tooling support (classifier + completion catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Log-extraction rule language (packages, rules, typed field captures).
    Wpl,
    /// Record-transformation language (read/take/match/pipe expressions).
    Oml,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Wpl => "wpl",
            Language::Oml => "oml",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wpl" => Ok(Language::Wpl),
            "oml" => Ok(Language::Oml),
            _ => Err(Error::UnknownLanguage(s.to_string())),
        }
    }
}

/// Every mode an editor instance can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorLanguage {
    #[default]
    Plain,
    Wpl,
    Oml,
    Json,
}

impl EditorLanguage {
    /// The DSL behind this mode, if it has completion support.
    pub fn dsl(&self) -> Option<Language> {
        match self {
            EditorLanguage::Wpl => Some(Language::Wpl),
            EditorLanguage::Oml => Some(Language::Oml),
            EditorLanguage::Plain | EditorLanguage::Json => None,
        }
    }
}

impl From<Language> for EditorLanguage {
    fn from(language: Language) -> Self {
        match language {
            Language::Wpl => EditorLanguage::Wpl,
            Language::Oml => EditorLanguage::Oml,
        }
    }
}

impl FromStr for EditorLanguage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(EditorLanguage::Plain),
            "wpl" => Ok(EditorLanguage::Wpl),
            "oml" => Ok(EditorLanguage::Oml),
            "json" => Ok(EditorLanguage::Json),
            _ => Err(Error::UnknownLanguage(s.to_string())),
        }
    }
}

/// UI locales with translated completion tables.
///
/// Resolution never fails: any tag other than `en-US` resolves to the default `zh-CN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    pub const DEFAULT: Locale = Locale::ZhCn;

    /// Resolve a BCP-47 style tag, substituting the default for unknown tags.
    pub fn resolve(tag: &str) -> Locale {
        match tag {
            "en-US" => Locale::EnUs,
            "zh-CN" => Locale::ZhCn,
            _ => Locale::DEFAULT,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::EnUs => "en-US",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
