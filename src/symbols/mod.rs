//! Per-language symbol tables used to disambiguate identifiers
//!
//! Each language has four disjoint-by-convention sets (keywords, types,
//! functions, constants) plus the position-dependent vocabularies OML needs:
//! declared types, only recognised in declaration position, and privacy-segment
//! types. Classification is a single closed function, [`SymbolTable::classify`],
//! shared by the state-machine classifiers and the decoration highlighter.

pub mod definition;

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::error;

use crate::error::Result;
use crate::language::Language;
use crate::lexer::TokenCategory;

pub use definition::LanguageDefinition;

/// Syntactic position of a word, tracked by the OML lexer state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclarationContext {
    /// A `:` was seen since the last statement terminator.
    pub after_colon: bool,
    /// A `=` was seen since the last statement terminator.
    pub after_equal: bool,
    /// The scan is past the second `---` separator.
    pub in_privacy: bool,
}

/// Outcome of classifying an identifier against a symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordClass {
    /// Privacy-segment type in declaration position.
    PrivacyType,
    /// Type annotation right after `:` and before any `=`.
    DeclaredType,
    Constant,
    Keyword,
    Type,
    Function,
    Variable,
}

impl WordClass {
    pub fn category(&self) -> TokenCategory {
        match self {
            WordClass::PrivacyType | WordClass::DeclaredType | WordClass::Type => TokenCategory::Type,
            WordClass::Constant => TokenCategory::Atom,
            WordClass::Keyword => TokenCategory::Keyword,
            WordClass::Function => TokenCategory::Function,
            WordClass::Variable => TokenCategory::Variable,
        }
    }

    /// Whether this class consumes a pending declaration colon.
    pub fn is_declaration(&self) -> bool {
        matches!(self, WordClass::PrivacyType | WordClass::DeclaredType)
    }
}

/// Exact-match symbol sets for one language.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    keywords: HashSet<String>,
    types: HashSet<String>,
    declared_types: HashSet<String>,
    privacy_types: HashSet<String>,
    functions: HashSet<String>,
    constants: HashSet<String>,
    type_prefixes: Vec<String>,
    function_prefixes: Vec<String>,
    /// Anchored alternation of every function name.
    function_pattern: Regex,
}

impl SymbolTable {
    pub fn from_definition(definition: &LanguageDefinition) -> Result<Self> {
        let set = |words: &[String]| words.iter().cloned().collect::<HashSet<_>>();

        let mut names: Vec<&str> = definition.functions.iter().map(String::as_str).collect();
        // Longest first so that alternation prefers `decode/base64` over `decode`.
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let function_pattern = if alternation.is_empty() {
            Regex::new(r"[^\s\S]")?
        } else {
            Regex::new(&format!("^(?:{})$", alternation))?
        };

        Ok(Self {
            keywords: set(&definition.keywords),
            types: set(&definition.types),
            declared_types: set(&definition.declared_types),
            privacy_types: set(&definition.privacy_types),
            functions: set(&definition.functions),
            constants: set(&definition.constants),
            type_prefixes: definition.type_prefixes.clone(),
            function_prefixes: definition.function_prefixes.clone(),
            function_pattern,
        })
    }

    /// A table with no symbols; every word classifies as a variable or call.
    pub fn empty() -> Self {
        Self::from_definition(&LanguageDefinition::default())
            .expect("empty alternation is a valid pattern")
    }

    /// The shared built-in table for `language`.
    pub fn builtin(language: Language) -> Arc<SymbolTable> {
        static WPL: Lazy<Arc<SymbolTable>> = Lazy::new(|| load_builtin(Language::Wpl));
        static OML: Lazy<Arc<SymbolTable>> = Lazy::new(|| load_builtin(Language::Oml));

        match language {
            Language::Wpl => Arc::clone(&WPL),
            Language::Oml => Arc::clone(&OML),
        }
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        contains(&self.keywords, word)
    }

    pub fn is_constant(&self, word: &str) -> bool {
        contains(&self.constants, word)
    }

    /// Position-independent type membership, including prefix families like `array/…`.
    pub fn is_type(&self, word: &str) -> bool {
        contains(&self.types, word) || self.type_prefixes.iter().any(|p| word.starts_with(p.as_str()))
    }

    /// Whether `word` names a function by membership or by structure.
    pub fn is_function_name(&self, word: &str) -> bool {
        contains(&self.functions, word)
            || self.function_pattern.is_match(normalize(word))
            || word.contains("::")
            || self.function_prefixes.iter().any(|p| word.starts_with(p.as_str()))
    }

    pub fn function_pattern(&self) -> &Regex {
        &self.function_pattern
    }

    /// Classify `word` given its syntactic position and whether it is followed by `(`.
    ///
    /// Precedence: privacy type, declared type, constant, keyword, type, function,
    /// then variable.
    pub fn classify(&self, word: &str, ctx: DeclarationContext, followed_by_call: bool) -> WordClass {
        if ctx.in_privacy && ctx.after_colon && contains(&self.privacy_types, word) {
            return WordClass::PrivacyType;
        }
        if ctx.after_colon
            && !ctx.after_equal
            && (contains(&self.declared_types, word) || contains(&self.types, word))
        {
            return WordClass::DeclaredType;
        }
        if self.is_constant(word) {
            return WordClass::Constant;
        }
        if self.is_keyword(word) {
            return WordClass::Keyword;
        }
        if self.is_type(word) {
            return WordClass::Type;
        }
        if followed_by_call || self.is_function_name(word) {
            return WordClass::Function;
        }
        if contains(&self.privacy_types, word) {
            return WordClass::Type;
        }
        WordClass::Variable
    }
}

/// Strip trailing colons (`name:` written without a space before the colon).
pub fn normalize(word: &str) -> &str {
    word.trim_end_matches(':')
}

fn contains(set: &HashSet<String>, word: &str) -> bool {
    set.contains(word) || set.contains(normalize(word))
}

fn load_builtin(language: Language) -> Arc<SymbolTable> {
    let table = LanguageDefinition::builtin(language)
        .and_then(|definition| SymbolTable::from_definition(&definition));
    match table {
        Ok(table) => Arc::new(table),
        Err(e) => {
            error!("Falling back to an empty {} symbol table: {}", language, e);
            Arc::new(SymbolTable::empty())
        }
    }
}
