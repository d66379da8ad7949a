//! Snippet templates with placeholder slots.
//!
//! Catalog insert texts use the editor snippet syntax: `${name}`, `${}`,
//! `${N:name}` and `$N`. Parsing is total; anything that is not a well-formed
//! placeholder (an unterminated `${`, a `$` not followed by `{` or a digit) is
//! kept as literal text.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Explicit tab-stop number from `${N:name}` or `$N`.
    pub index: Option<u32>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Placeholder(Placeholder),
}

/// A tab stop in resolved text. `range` is in chars, relative to the start of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabStop {
    pub index: u32,
    pub range: Range<usize>,
}

/// Snippet text with every placeholder replaced by its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    /// Tab stops in visiting order; the final stop (`$0`) comes last.
    pub tab_stops: Vec<TabStop>,
}

impl Resolved {
    /// Char range of the first tab stop, if any.
    pub fn first_stop(&self) -> Option<Range<usize>> {
        self.tab_stops.first().map(|stop| stop.range.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snippet {
    segments: Vec<Segment>,
}

impl Snippet {
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = template;

        while let Some(dollar) = rest.find('$') {
            text.push_str(&rest[..dollar]);
            let after = &rest[dollar + 1..];

            if let Some(body) = after.strip_prefix('{') {
                let Some(close) = body.find('}') else {
                    // Unterminated: the remainder is literal.
                    text.push_str(&rest[dollar..]);
                    rest = "";
                    break;
                };
                flush(&mut segments, &mut text);
                segments.push(Segment::Placeholder(braced(&body[..close])));
                rest = &body[close + 1..];
                continue;
            }

            let digits = after.bytes().take_while(u8::is_ascii_digit).count();
            match after[..digits].parse::<u32>() {
                Ok(index) if digits > 0 => {
                    flush(&mut segments, &mut text);
                    segments.push(Segment::Placeholder(Placeholder { index: Some(index), name: String::new() }));
                    rest = &after[digits..];
                }
                _ => {
                    text.push('$');
                    rest = after;
                }
            }
        }
        text.push_str(rest);
        flush(&mut segments, &mut text);

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(p) => Some(p),
            Segment::Text(_) => None,
        })
    }

    pub fn has_placeholders(&self) -> bool {
        self.placeholders().next().is_some()
    }

    /// Replace placeholders with their names and collect the tab stops.
    pub fn resolve(&self) -> Resolved {
        let numbers = self.tab_numbers();
        let mut text = String::new();
        let mut chars = 0;
        let mut tab_stops = Vec::new();

        for (segment, number) in self.segments.iter().zip(&numbers) {
            match segment {
                Segment::Text(literal) => {
                    text.push_str(literal);
                    chars += literal.chars().count();
                }
                Segment::Placeholder(p) => {
                    let len = p.name.chars().count();
                    text.push_str(&p.name);
                    if let Some(index) = number {
                        tab_stops.push(TabStop { index: *index, range: chars..chars + len });
                    }
                    chars += len;
                }
            }
        }

        // Stable: repeated occurrences of one stop keep document order.
        tab_stops.sort_by_key(|stop| (stop.index == 0, stop.index));
        Resolved { text, tab_stops }
    }

    /// Render as an LSP snippet string with sequential `${N:name}` tab stops.
    pub fn to_lsp_snippet(&self) -> String {
        let numbers = self.tab_numbers();
        let mut out = String::new();

        for (segment, number) in self.segments.iter().zip(&numbers) {
            match segment {
                Segment::Text(literal) => {
                    for c in literal.chars() {
                        if matches!(c, '$' | '}' | '\\') {
                            out.push('\\');
                        }
                        out.push(c);
                    }
                }
                Segment::Placeholder(p) => {
                    let index = number.unwrap_or(0);
                    if p.name.is_empty() {
                        let _ = write!(out, "${}", index);
                    } else {
                        let _ = write!(out, "${{{}:{}}}", index, p.name);
                    }
                }
            }
        }
        out
    }

    /// Tab-stop number per segment (`None` for text).
    ///
    /// Explicit numbers are kept. Unnumbered placeholders are numbered after the
    /// largest explicit one in order of first appearance, and placeholders sharing
    /// a name share a number. Numbering saturates at `u32::MAX`.
    fn tab_numbers(&self) -> Vec<Option<u32>> {
        let mut next = self.placeholders().filter_map(|p| p.index).max().unwrap_or(0).saturating_add(1);
        let mut by_name: HashMap<&str, u32> = HashMap::new();

        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(_) => None,
                Segment::Placeholder(Placeholder { index: Some(index), .. }) => Some(*index),
                Segment::Placeholder(Placeholder { index: None, name }) => {
                    let mut fresh = || {
                        let n = next;
                        next = next.saturating_add(1);
                        n
                    };
                    if name.is_empty() {
                        Some(fresh())
                    } else {
                        Some(*by_name.entry(name.as_str()).or_insert_with(fresh))
                    }
                }
            })
            .collect()
    }
}

fn braced(body: &str) -> Placeholder {
    let digits = body.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        if let Ok(index) = body[..digits].parse::<u32>() {
            let rest = &body[digits..];
            if rest.is_empty() {
                return Placeholder { index: Some(index), name: String::new() };
            }
            if let Some(name) = rest.strip_prefix(':') {
                return Placeholder { index: Some(index), name: name.to_string() };
            }
        }
    }
    Placeholder { index: None, name: body.to_string() }
}

fn flush(segments: &mut Vec<Segment>, text: &mut String) {
    if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(text)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        let snippet = Snippet::parse("f(${field}, ${2:value}, $0) ${}");
        let placeholders: Vec<_> = snippet.placeholders().cloned().collect();
        assert_eq!(
            placeholders,
            vec![
                Placeholder { index: None, name: "field".into() },
                Placeholder { index: Some(2), name: "value".into() },
                Placeholder { index: Some(0), name: String::new() },
                Placeholder { index: None, name: String::new() },
            ]
        );
    }

    #[test]
    fn test_literal_dollars() {
        let snippet = Snippet::parse("cost $ 5 and ${open");
        assert!(!snippet.has_placeholders());
        assert_eq!(snippet.resolve().text, "cost $ 5 and ${open");

        let plain = Snippet::parse("json_unescape()");
        assert_eq!(plain.segments(), &[Segment::Text("json_unescape()".into())]);
    }

    #[test]
    fn test_resolve() {
        let resolved = Snippet::parse("rule ${name} {(\n  ${fields}\n)}").resolve();
        assert_eq!(resolved.text, "rule name {(\n  fields\n)}");
        assert_eq!(resolved.tab_stops.len(), 2);
        assert_eq!(resolved.first_stop(), Some(5..9));
        assert_eq!(resolved.tab_stops[1].range, 15..21);
    }

    #[test]
    fn test_resolve_orders_final_stop_last() {
        let resolved = Snippet::parse("$0 ${2:b} ${1:a}").resolve();
        let order: Vec<u32> = resolved.tab_stops.iter().map(|s| s.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_resolve_counts_chars() {
        let resolved = Snippet::parse("说明 ${名称}").resolve();
        assert_eq!(resolved.first_stop(), Some(3..5));
    }

    #[test]
    fn test_to_lsp_snippet() {
        let snippet = Snippet::parse("f_chars_has(${field}, ${value}) ${field}");
        assert_eq!(snippet.to_lsp_snippet(), "f_chars_has(${1:field}, ${2:value}) ${1:field}");

        let snippet = Snippet::parse("fmt(\"{}\", @${var})$0");
        assert_eq!(snippet.to_lsp_snippet(), "fmt(\"{\\}\", @${1:var})$0");

        let snippet = Snippet::parse("${2:b} ${a}");
        assert_eq!(snippet.to_lsp_snippet(), "${2:b} ${3:a}");
    }

    #[test]
    fn test_huge_tab_stop_saturates() {
        let snippet = Snippet::parse("f($4294967295, ${a}, ${b})");
        let resolved = snippet.resolve();
        assert_eq!(resolved.text, "f(, a, b)");
        assert!(resolved.tab_stops.iter().all(|stop| stop.index == u32::MAX));
        assert_eq!(snippet.to_lsp_snippet(), "f($4294967295, ${4294967295:a}, ${4294967295:b})");

        // too large for a tab stop: literal text
        assert!(!Snippet::parse("$4294967296").has_placeholders());
    }
}
