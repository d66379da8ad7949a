//! Externally supplied symbol vocabularies.
//!
//! The DSL grammars are still evolving, so keyword/type/function membership is
//! data, not logic. Built-in definitions ship in `data/definitions/` and hosts
//! may load their own with [`LanguageDefinition::from_json`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::language::Language;

const WPL_DEFINITION: &str = include_str!("../../data/definitions/wpl.json");
const OML_DEFINITION: &str = include_str!("../../data/definitions/oml.json");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageDefinition {
    pub keywords: Vec<String>,
    /// Types recognised in any position.
    pub types: Vec<String>,
    /// Types recognised only after `:` and before `=`.
    pub declared_types: Vec<String>,
    /// Types of the privacy segment (after the second `---`).
    pub privacy_types: Vec<String>,
    pub functions: Vec<String>,
    pub constants: Vec<String>,
    /// Prefixes that mark a word as a type, e.g. `array/`.
    pub type_prefixes: Vec<String>,
    /// Prefixes that mark a word as a function, e.g. `plg_pipe/`.
    pub function_prefixes: Vec<String>,
}

impl LanguageDefinition {
    pub fn from_json(language: Language, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| Error::DefinitionParse { language, source })
    }

    pub fn builtin(language: Language) -> Result<Self> {
        let json = match language {
            Language::Wpl => WPL_DEFINITION,
            Language::Oml => OML_DEFINITION,
        };
        Self::from_json(language, json)
    }
}
