//! OML formatting.
//!
//! The header (before the first `---`) and the privacy segment (after the
//! second) are line oriented: lines are trimmed, and the values listed under an
//! empty `key :` are indented one level. The mapping body is reflowed by
//! statement: a line ends after `;` and after a block-opening `{`, a closing `}`
//! stands on its own line unless `;`, `,` or `)` follows it, and `=`, `=>` and
//! `|` get one space on each side. Text inside `(...)`, `[...]` and string
//! literals keeps its spacing. A blank line in the input ends the current
//! statement; runs of blank lines collapse to one.

use std::slice::Iter;

use super::{attribute_len, normalize_newlines, Formatter, Scan, INDENT};

const SEPARATOR: &str = "---";

#[derive(Debug, Clone, Default)]
pub struct OmlFormatter;

impl OmlFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for OmlFormatter {
    fn format_content(&self, content: &str) -> String {
        let text = normalize_newlines(content).replace('\t', INDENT);
        let lines: Vec<&str> = text.lines().collect();
        let separators: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.trim() == SEPARATOR)
            .map(|(i, _)| i)
            .collect();

        let mut out = Output::default();
        match separators.first() {
            None => format_body(&text, &mut out),
            Some(&header_end) => {
                format_lines(&lines[..header_end], &mut out);
                out.separator();
                let body_end = separators.get(1).copied().unwrap_or(lines.len());
                format_body(&lines[header_end + 1..body_end].join("\n"), &mut out);
                if body_end < lines.len() {
                    out.separator();
                    format_lines(&lines[body_end + 1..], &mut out);
                }
            }
        }
        out.finish()
    }
}

/// Formatted lines; the document always ends with one blank line.
#[derive(Debug, Default)]
struct Output {
    lines: Vec<String>,
}

impl Output {
    fn push(&mut self, level: usize, text: &str) {
        self.lines.push(format!("{}{}", INDENT.repeat(level), text));
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|line| !line.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn separator(&mut self) {
        self.push(0, SEPARATOR);
        self.blank();
    }

    fn finish(mut self) -> String {
        while self.lines.last().is_some_and(|line| line.is_empty()) {
            self.lines.pop();
        }
        if self.lines.is_empty() {
            return String::new();
        }
        let mut text = self.lines.join("\n");
        text.push_str("\n\n");
        text
    }
}

fn is_comment(text: &str) -> bool {
    text.starts_with("//") || (text.starts_with('#') && !text.starts_with("#["))
}

/// Header and privacy lines.
fn format_lines(lines: &[&str], out: &mut Output) {
    let mut under_key = false;
    let mut iter = lines.iter();

    while let Some(line) = iter.next() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            out.blank();
        } else if is_comment(trimmed) {
            out.push(0, trimmed);
        } else if trimmed.starts_with("#[") {
            out.push(0, &collect_attribute(trimmed, &mut iter));
            under_key = false;
        } else if let Some(key) = trimmed.strip_suffix(':') {
            out.push(0, &format!("{} : ", key.trim_end()));
            under_key = true;
        } else if under_key && !trimmed.contains(':') {
            out.push(1, trimmed);
        } else {
            out.push(0, trimmed);
            under_key = false;
        }
    }
}

/// Join the lines of an attribute starting at `first` until its brackets balance.
fn collect_attribute(first: &str, rest: &mut Iter<'_, &str>) -> String {
    let mut text = first.to_string();
    while attribute_len(&text).is_none() {
        let Some(next) = rest.next() else {
            break;
        };
        text.push(' ');
        text.push_str(next.trim());
    }
    normalize_attribute(&text)
}

/// Single spaces outside strings, none just inside brackets or around commas.
fn normalize_attribute(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut scan = Scan::default();
    for c in text.chars() {
        if !scan.in_string(c) && c.is_whitespace() {
            if !collapsed.ends_with(' ') {
                collapsed.push(' ');
            }
        } else {
            collapsed.push(c);
        }
    }

    let chars: Vec<char> = collapsed.trim().chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut scan = Scan::default();
    for (i, &c) in chars.iter().enumerate() {
        if !scan.in_string(c) && c == ' ' {
            let after_open = matches!(out.chars().last(), Some('[' | '(' | ','));
            let before_close = matches!(chars.get(i + 1), Some(']' | ')' | ','));
            if after_open || before_close {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Builds body lines statement by statement.
struct Body<'a> {
    out: &'a mut Output,
    line: String,
    space: bool,
    level: usize,
}

impl Body<'_> {
    fn push(&mut self, text: &str) {
        if self.space && !self.line.is_empty() {
            self.line.push(' ');
        }
        self.space = false;
        self.line.push_str(text);
    }

    /// An operator with one space on each side.
    fn spaced(&mut self, op: &str) {
        self.space = true;
        self.push(op);
        self.space = true;
    }

    fn flush(&mut self) {
        let text = self.line.trim();
        if !text.is_empty() {
            self.out.push(self.level, text);
        }
        self.line.clear();
        self.space = false;
    }

    fn last_char(&self) -> Option<char> {
        self.line.trim_end().chars().next_back()
    }
}

fn skip_whitespace(chars: &[char], from: usize) -> usize {
    chars[from..].iter().position(|c| !c.is_whitespace()).map_or(chars.len(), |n| from + n)
}

fn string_end(chars: &[char], open: usize) -> usize {
    let mut scan = Scan::default();
    for (i, &c) in chars.iter().enumerate().skip(open) {
        scan.in_string(c);
        if i > open && !scan.in_string {
            return i + 1;
        }
    }
    chars.len()
}

fn attribute_end(chars: &[char], open: usize) -> usize {
    let text: String = chars[open..].iter().collect();
    attribute_len(&text).map_or(chars.len(), |len| open + text[..len].chars().count())
}

fn format_body(text: &str, out: &mut Output) {
    let chars: Vec<char> = text.chars().collect();
    let mut body = Body { out, line: String::new(), space: false, level: 0 };
    // Nesting of `(` and `[`; their contents keep their spacing.
    let mut depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if c.is_whitespace() {
            let end = skip_whitespace(&chars, i);
            let newlines = chars[i..end].iter().filter(|&&c| c == '\n').count();
            if depth > 0 {
                if newlines > 0 {
                    body.line.push(' ');
                } else {
                    body.line.extend(&chars[i..end]);
                }
            } else if newlines >= 2 {
                body.flush();
                body.out.blank();
            } else {
                body.space = true;
            }
            i = end;
            continue;
        }

        if c == '"' {
            let end = string_end(&chars, i);
            let literal: String = chars[i..end].iter().collect();
            body.push(&literal);
            i = end;
            continue;
        }

        if depth > 0 {
            match c {
                '(' | '[' => depth += 1,
                ')' | ']' => depth -= 1,
                _ => {}
            }
            body.line.push(c);
            i += 1;
            continue;
        }

        let rest: String = chars[i..].iter().take(2).collect();
        if is_comment(&rest) {
            let end = chars[i..].iter().position(|&c| c == '\n').map_or(chars.len(), |n| i + n);
            let comment: String = chars[i..end].iter().collect();
            if body.line.trim().is_empty() {
                body.line.clear();
                body.out.push(body.level, comment.trim_end());
            } else {
                body.space = true;
                body.push(comment.trim_end());
                body.flush();
            }
            i = end;
            continue;
        }

        match c {
            '#' if next == Some('[') && body.line.trim().is_empty() => {
                let end = attribute_end(&chars, i);
                let attribute: String = chars[i..end].iter().collect();
                body.line.clear();
                body.out.push(body.level, &normalize_attribute(&attribute));
                i = end;
                continue;
            }
            '(' | '[' => {
                depth += 1;
                body.push(&c.to_string());
            }
            ';' => {
                body.space = false;
                body.push(";");
                body.flush();
            }
            '=' if next == Some('>') => {
                body.spaced("=>");
                i += 2;
                continue;
            }
            '=' if next == Some('=') || matches!(body.last_char(), Some('=' | '!' | '<' | '>')) => {
                body.push("=");
            }
            '=' => body.spaced("="),
            '|' if next == Some('|') || body.last_char() == Some('|') => body.push("|"),
            '|' => body.spaced("|"),
            '{' => {
                let after = skip_whitespace(&chars, i + 1);
                body.space = true;
                if chars.get(after) == Some(&'}') {
                    body.push("{}");
                    i = after + 1;
                    continue;
                }
                body.push("{");
                body.flush();
                body.level += 1;
            }
            '}' => {
                body.flush();
                body.level = body.level.saturating_sub(1);
                body.push("}");
                let after = skip_whitespace(&chars, i + 1);
                if matches!(chars.get(after), Some(';' | ',' | ')')) {
                    i = after;
                    continue;
                }
                body.flush();
            }
            _ => body.push(&c.to_string()),
        }
        i += 1;
    }
    body.flush();
}
