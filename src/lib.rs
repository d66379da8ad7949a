pub mod completion;
pub mod editor;
pub mod error;
pub mod format;
pub mod language;
pub mod lexer;
pub mod logging;
pub mod metrics;
pub mod symbols;

pub use completion::{build_catalog, CompletionResult, CompletionSource};
pub use editor::{Editor, EditorConfig, Theme};
pub use error::{Error, Result};
pub use format::{format_source, Formatter, OmlFormatter, WplFormatter};
pub use language::{EditorLanguage, Language, Locale};
pub use lexer::{tokenize, Classifier, Token, TokenCategory};
