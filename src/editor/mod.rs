//! Editor adapter
//!
//! Owns one document buffer and wires the language's classifier, completion
//! source and highlight style around it. The host talks to it through a small
//! imperative surface: get/set the value, edit, subscribe to changes, ask for
//! tokens and completions.
//!
//! Changing the language or the UI locale rebuilds the classifier and
//! completion wiring; changing only the theme or text colour restyles.

pub mod config;
pub mod decorations;
pub mod document;
pub mod semantic_tokens;
pub mod theme;

use std::ops::Range;

use lsp_types::SemanticToken;
use tracing::debug;

use crate::completion::{CompletionSession, CompletionSource, RankingCriteria};
use crate::error::Result;
use crate::format::format_source;
use crate::language::{EditorLanguage, Locale};
use crate::lexer::{self, JsonClassifier, OmlClassifier, Token, TokenCategory, WplClassifier};
use crate::metrics::{metrics, TimingGuard};

pub use config::{EditorConfig, Theme};
pub use decorations::{Decoration, FunctionDecorator};
pub use document::Document;
pub use theme::{HighlightStyle, Style};

/// The classifier behind an editor language.
#[derive(Debug, Clone)]
pub enum Highlighter {
    Plain,
    Wpl(WplClassifier),
    Oml(OmlClassifier),
    Json(JsonClassifier),
}

impl Highlighter {
    pub fn for_language(language: EditorLanguage) -> Self {
        match language {
            EditorLanguage::Plain => Highlighter::Plain,
            EditorLanguage::Wpl => Highlighter::Wpl(WplClassifier::default()),
            EditorLanguage::Oml => Highlighter::Oml(OmlClassifier::default()),
            EditorLanguage::Json => Highlighter::Json(JsonClassifier),
        }
    }

    /// Full re-tokenization of `text`. Plain text is a single unstyled token.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let _timer = TimingGuard::new("tokenize");
        let tokens = match self {
            Highlighter::Plain if text.is_empty() => Vec::new(),
            Highlighter::Plain => vec![Token::new(0, text.len(), TokenCategory::None)],
            Highlighter::Wpl(classifier) => lexer::tokenize(classifier, text),
            Highlighter::Oml(classifier) => lexer::tokenize(classifier, text),
            Highlighter::Json(classifier) => lexer::tokenize(classifier, text),
        };
        metrics().record_tokenize(tokens.len());
        tokens
    }

    fn decorator(&self) -> Option<FunctionDecorator> {
        match self {
            Highlighter::Wpl(classifier) => Some(FunctionDecorator::new(classifier.symbols().clone())),
            Highlighter::Oml(classifier) => Some(FunctionDecorator::new(classifier.symbols().clone())),
            Highlighter::Plain | Highlighter::Json(_) => None,
        }
    }
}

type ChangeListener = Box<dyn FnMut(&str)>;

pub struct Editor {
    config: EditorConfig,
    locale: Locale,
    document: Document,
    highlighter: Highlighter,
    decorator: Option<FunctionDecorator>,
    completion: Option<CompletionSource>,
    session: Option<CompletionSession>,
    style: HighlightStyle,
    listeners: Vec<ChangeListener>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("config", &self.config)
            .field("locale", &self.locale)
            .field("document", &self.document)
            .field("session", &self.session)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Editor {
    pub fn new(config: EditorConfig, locale: Locale, value: &str) -> Self {
        let style = HighlightStyle::new(config.theme, config.text_color.as_deref());
        let mut editor = Self {
            config,
            locale,
            document: Document::new(value),
            highlighter: Highlighter::Plain,
            decorator: None,
            completion: None,
            session: None,
            style,
            listeners: Vec::new(),
        };
        editor.rebuild();
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn style(&self) -> &HighlightStyle {
        &self.style
    }

    pub fn value(&self) -> String {
        self.document.text()
    }

    /// Replace the whole text; identical text is a no-op (no notification, cursor and
    /// history kept).
    pub fn set_value(&mut self, text: &str) -> bool {
        let changed = self.document.set_value(text);
        if changed {
            self.session = None;
            self.notify();
        }
        changed
    }

    /// Reformat the whole text as one undoable edit. False for plain text and JSON,
    /// or when the text is already formatted.
    pub fn format(&mut self) -> bool {
        let Some(language) = self.config.language.dsl() else {
            return false;
        };
        let formatted = format_source(language, &self.value());
        self.set_value(&formatted)
    }

    /// Register a listener called with the full text after every committed edit.
    pub fn on_change(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn cursor(&self) -> usize {
        self.document.cursor()
    }

    pub fn set_cursor(&mut self, offset: usize) -> Result<()> {
        self.session = None;
        self.document.set_cursor(offset)
    }

    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<()> {
        if self.document.replace(range, text)? {
            self.session = None;
            self.notify();
        }
        Ok(())
    }

    pub fn insert(&mut self, offset: usize, text: &str) -> Result<()> {
        self.replace(offset..offset, text)
    }

    /// Type at the cursor, replacing the selection, the way a keystroke would.
    ///
    /// An open completion session is narrowed while the typed text stays valid;
    /// otherwise completion is re-queried implicitly.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        let session = self.session.take();
        if self.document.replace(self.document.selection(), text)? {
            self.notify();
        }

        if let Some(mut session) = session {
            if session.anchor() <= self.cursor() {
                let typed = self.document.slice(session.anchor()..self.cursor())?;
                if session.update(&typed) {
                    self.session = Some(session);
                    return Ok(());
                }
            }
        }
        self.session = self.open_session(false)?;
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.document.undo();
        if changed {
            self.session = None;
            self.notify();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.document.redo();
        if changed {
            self.session = None;
            self.notify();
        }
        changed
    }

    /// Apply a new configuration. A language change rebuilds the wiring; theme and
    /// text colour changes only restyle.
    pub fn configure(&mut self, config: EditorConfig) {
        let rebuild = config.language != self.config.language;
        if config.theme != self.config.theme || config.text_color != self.config.text_color {
            self.style = HighlightStyle::new(config.theme, config.text_color.as_deref());
        }
        self.config = config;
        if rebuild {
            self.rebuild();
        }
    }

    pub fn set_locale(&mut self, locale: Locale) {
        if locale != self.locale {
            self.locale = locale;
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        debug!("Rebuilding {:?} editor wiring for {}", self.config.language, self.locale);
        self.highlighter = Highlighter::for_language(self.config.language);
        self.decorator = self.highlighter.decorator();
        self.completion = self
            .config
            .language
            .dsl()
            .map(|language| CompletionSource::new(language, self.locale));
        self.session = None;
    }

    pub fn tokens(&self) -> Vec<Token> {
        self.highlighter.tokenize(&self.value())
    }

    pub fn semantic_tokens(&self) -> Vec<SemanticToken> {
        let text = self.value();
        semantic_tokens::semantic_tokens(&text, &self.highlighter.tokenize(&text))
    }

    /// Function-call decorations outside comments and strings; empty for plain text and JSON.
    pub fn decorations(&self) -> Vec<Decoration> {
        let Some(decorator) = self.decorator.as_ref() else {
            return Vec::new();
        };
        let text = self.value();
        decorator.decorate(&text, &self.highlighter.tokenize(&text))
    }

    /// Ask for completions at the cursor. `explicit` forces a result even with no
    /// identifier before the cursor.
    pub fn complete(&mut self, explicit: bool) -> Result<Option<&CompletionSession>> {
        self.session = self.open_session(explicit)?;
        Ok(self.session.as_ref())
    }

    pub fn session(&self) -> Option<&CompletionSession> {
        self.session.as_ref()
    }

    pub fn close_completion(&mut self) {
        self.session = None;
    }

    fn open_session(&self, explicit: bool) -> Result<Option<CompletionSession>> {
        let Some(source) = &self.completion else {
            return Ok(None);
        };
        let cursor = self.cursor();
        let (line_start, prefix) = self.document.line_prefix(cursor)?;

        Ok(source.complete(&prefix, explicit).map(|mut result| {
            result.anchor += line_start;
            let typed: String = prefix.chars().skip(result.anchor - line_start).collect();
            CompletionSession::open(result, typed)
        }))
    }

    /// Insert the visible candidate labelled `label`, replacing the text typed since
    /// the anchor. Placeholders are inserted as their names and the first one is
    /// selected. Returns the absolute tab-stop ranges, or `None` if no session
    /// offers `label`.
    pub fn accept_completion(&mut self, label: &str) -> Result<Option<Vec<Range<usize>>>> {
        let Some(session) = self.session.take() else {
            return Ok(None);
        };
        let Some(item) = session
            .visible(&RankingCriteria::unbounded())
            .into_iter()
            .find(|item| item.label == label)
            .cloned()
        else {
            self.session = Some(session);
            return Ok(None);
        };

        let anchor = session.anchor();
        let resolved = item.snippet().resolve();
        let changed = self.document.replace(anchor..self.cursor(), &resolved.text)?;

        let stops: Vec<Range<usize>> = resolved
            .tab_stops
            .iter()
            .map(|stop| anchor + stop.range.start..anchor + stop.range.end)
            .collect();
        if let Some(first) = stops.first() {
            self.document.select(first.clone())?;
        }
        if changed {
            self.notify();
        }
        Ok(Some(stops))
    }

    fn notify(&mut self) {
        let text = self.document.text();
        for listener in self.listeners.iter_mut() {
            listener(&text);
        }
    }
}
