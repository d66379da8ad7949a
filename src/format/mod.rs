//! Whitespace-only source formatting for WPL and OML.
//!
//! Formatters only move whitespace and line breaks: the sequence of
//! non-whitespace characters in the output is exactly that of the input.

pub mod oml;
pub mod wpl;

use tracing::debug;

use crate::language::Language;

pub use oml::OmlFormatter;
pub use wpl::WplFormatter;

/// One indentation level.
pub const INDENT: &str = "    ";

/// Formats a whole document.
pub trait Formatter {
    fn format_content(&self, content: &str) -> String;
}

/// Format `content` with the formatter for `language`.
pub fn format_source(language: Language, content: &str) -> String {
    let formatted = match language {
        Language::Wpl => WplFormatter::new().format_content(content),
        Language::Oml => OmlFormatter::new().format_content(content),
    };
    debug!("Formatted {} source ({} -> {} bytes)", language, content.len(), formatted.len());
    formatted
}

pub(crate) fn normalize_newlines(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

pub(crate) fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Byte length of the `#[...]` attribute at the start of `text`, through its
/// closing `]`. `None` when the brackets never balance.
pub(crate) fn attribute_len(text: &str) -> Option<usize> {
    let mut scan = Scan::default();
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        if scan.in_string(c) {
            continue;
        }
        match c {
            '[' => depth += 1,
            ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Tracks double-quoted literals (with backslash escapes) during a scan.
#[derive(Debug, Default)]
pub(crate) struct Scan {
    in_string: bool,
    escaped: bool,
}

impl Scan {
    /// Feed `c`; true when `c` belongs to a string literal, quotes included.
    pub(crate) fn in_string(&mut self, c: char) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_string = false;
            }
            return true;
        }
        if c == '"' {
            self.in_string = true;
            return true;
        }
        false
    }
}
