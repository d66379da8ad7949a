//! WPL formatting.
//!
//! Three passes over the text:
//! 1. multi-line `#[...]` attributes are folded onto one line;
//! 2. `json(...)`, `csv(...)` and `kv(...)` calls are split one argument per line;
//! 3. field tuples opening a line, `(a, b, ...)`, are split one field per line.
//!
//! Commas nested in `()`, `[]`, `{}` or `<>` never split.

use super::{attribute_len, leading_whitespace, normalize_newlines, Formatter, Scan, INDENT};

/// Calls whose argument lists are split one per line.
const SPLIT_CALLS: [&str; 3] = ["json(", "csv(", "kv("];

#[derive(Debug, Clone, Default)]
pub struct WplFormatter;

impl WplFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for WplFormatter {
    fn format_content(&self, content: &str) -> String {
        let text = normalize_newlines(content);
        let text = fold_attributes(&text);
        let text = split_calls(&text);
        split_tuples(&text)
    }
}

/// Fold each `#[...]` attribute onto its first line, collapsing inner whitespace.
/// Every output line ends with a newline.
fn fold_attributes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        let line_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
        let line = &rest[..line_len];
        let indent = leading_whitespace(line);

        if line[indent.len()..].starts_with("#[") {
            let start = indent.len();
            if let Some(len) = attribute_len(&rest[start..]) {
                let end = start + len;
                let tail_len = rest[end..].find('\n').unwrap_or(rest.len() - end);
                let inner: Vec<&str> = rest[start + 2..end - 1].split_whitespace().collect();
                let tail = rest[end..end + tail_len].trim();

                out.push_str(indent);
                out.push_str("#[");
                out.push_str(&inner.join(" "));
                out.push(']');
                if !tail.is_empty() {
                    out.push(' ');
                    out.push_str(tail);
                }
                out.push('\n');
                rest = &rest[(end + tail_len + 1).min(rest.len())..];
                continue;
            }
        }

        out.push_str(line);
        if !line.ends_with('\n') {
            out.push('\n');
        }
        rest = &rest[line_len..];
    }
    out
}

/// Start of the next split call at or after `from`, not preceded by an identifier char.
fn next_split_call(text: &str, from: usize) -> Option<(usize, &'static str)> {
    SPLIT_CALLS
        .iter()
        .filter_map(|call| {
            let mut search = from;
            while let Some(pos) = text[search..].find(call) {
                let start = search + pos;
                let bounded = text[..start]
                    .chars()
                    .next_back()
                    .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
                if bounded {
                    return Some((start, *call));
                }
                search = start + call.len();
            }
            None
        })
        .min_by_key(|(start, _)| *start)
}

fn split_calls(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 128);
    let mut pos = 0;

    while let Some((start, call)) = next_split_call(text, pos) {
        let open = start + call.len() - 1;
        let Some(close) = matching_paren(text, open) else {
            break;
        };

        let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = text[close..].find('\n').map_or(text.len(), |i| close + i);
        let next = (line_end + 1).min(text.len());

        let (args, trailing_comma) = split_args(&text[open + 1..close]);
        if args.is_empty() {
            out.push_str(&text[pos..next]);
            pos = next;
            continue;
        }

        out.push_str(&text[pos..line_start]);
        let prefix = &text[line_start..start];
        let indent = leading_whitespace(prefix);
        // Code before the call stays on its own line; the call moves one level in.
        let call_indent = if prefix.trim().is_empty() {
            indent.to_string()
        } else {
            out.push_str(prefix);
            out.push('\n');
            format!("{indent}{INDENT}")
        };

        out.push_str(&call_indent);
        out.push_str(call);
        out.push('\n');
        push_args(&mut out, &args, trailing_comma, &format!("{call_indent}{INDENT}"));
        out.push_str(&call_indent);
        out.push(')');

        let suffix = text[close + 1..line_end].trim();
        if !suffix.is_empty() {
            out.push('\n');
            out.push_str(indent);
            out.push_str(suffix);
        }
        out.push('\n');
        pos = next;
    }

    out.push_str(&text[pos..]);
    out
}

fn split_tuples(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        let is_tuple = trimmed.starts_with('(') && !SPLIT_CALLS.iter().any(|call| trimmed[1..].starts_with(call));
        if !is_tuple {
            out.push_str(line);
            out.push('\n');
            continue;
        }

        let mut block = line.to_string();
        while paren_depth(&block) > 0 {
            match lines.next() {
                Some(next) => {
                    block.push('\n');
                    block.push_str(next);
                }
                None => break,
            }
        }

        match split_tuple(&block) {
            Some(formatted) => out.push_str(&formatted),
            None => {
                out.push_str(&block);
                out.push('\n');
            }
        }
    }
    out
}

fn split_tuple(block: &str) -> Option<String> {
    let open = block.find('(')?;
    let close = matching_paren(block, open)?;
    let (args, trailing_comma) = split_args(&block[open + 1..close]);
    if args.is_empty() {
        return None;
    }

    let indent = leading_whitespace(block);
    let mut out = String::with_capacity(block.len() + 32);
    out.push_str(indent);
    out.push_str("(\n");
    push_args(&mut out, &args, trailing_comma, &format!("{indent}{INDENT}"));
    out.push_str(indent);
    out.push(')');
    out.push_str(block[close + 1..].trim());
    out.push('\n');
    Some(out)
}

fn push_args(out: &mut String, args: &[&str], trailing_comma: bool, indent: &str) {
    let last = args.len().saturating_sub(1);
    for (i, arg) in args.iter().enumerate() {
        out.push_str(indent);
        out.push_str(arg);
        if i != last || trailing_comma {
            out.push(',');
        }
        out.push('\n');
    }
}

/// Top-level comma-separated arguments, trimmed, and whether the list ends with a comma.
fn split_args(body: &str) -> (Vec<&str>, bool) {
    let mut args = Vec::new();
    let mut scan = Scan::default();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        if scan.in_string(c) {
            continue;
        }
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(body[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    let tail = body[start..].trim();
    let trailing_comma = !args.is_empty() && tail.is_empty();
    if !tail.is_empty() {
        args.push(tail);
    }
    (args, trailing_comma)
}

/// Byte index of the `)` closing the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut scan = Scan::default();
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        if scan.in_string(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn paren_depth(text: &str) -> isize {
    let mut scan = Scan::default();
    text.chars()
        .filter(|&c| !scan.in_string(c))
        .map(|c| match c {
            '(' => 1,
            ')' => -1,
            _ => 0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn format(raw: &str) -> String {
        WplFormatter::new().format_content(raw)
    }

    #[test]
    fn test_json_call_is_split_and_tokens_kept() {
        let raw = indoc! {r#"
            #[tag(dev_name:"天眼", dev_type:"syslog"), copy_raw(name:"raw_msg")]
            package skyeye_platform {
                rule mail_alert {
                    (
                        _:pri<<,>>,
                        5*_
                    ),
                    (
                        time:update_time,
                        symbol(sandbox_mail|!)
                    ),          (json(@attach_type:mime_type,@mail_to,digit@hazard_level:severity,ip@sip,_@*))
                }
            }
        "#};
        let expected = indoc! {r#"
            #[tag(dev_name:"天眼", dev_type:"syslog"), copy_raw(name:"raw_msg")]
            package skyeye_platform {
                rule mail_alert {
                    (
                        _:pri<<,>>,
                        5*_
                    ),
                    (
                        time:update_time,
                        symbol(sandbox_mail|!)
                    ),          (
                        json(
                            @attach_type:mime_type,
                            @mail_to,
                            digit@hazard_level:severity,
                            ip@sip,
                            _@*
                        )
                    )
                }
            }
        "#};
        assert_eq!(format(raw), expected);
    }

    #[test]
    fn test_trailing_comma_is_kept() {
        assert_eq!(format("json(@a,@b,)"), "json(\n    @a,\n    @b,\n)\n");
    }

    #[test]
    fn test_call_keeps_its_indent_without_prefix() {
        assert_eq!(format("    json(@a,@b)"), "    json(\n        @a,\n        @b\n    )\n");
    }

    #[test]
    fn test_angle_brackets_do_not_split() {
        assert_eq!(format("(_ :pri<<,>>,5*_)"), "(\n    _ :pri<<,>>,\n    5*_\n)\n");
    }

    #[test]
    fn test_multiline_attribute_and_inline_call() {
        let raw = "package p {\n     #[\n     \ttag(log_desc: \"告警\", alert_src: \"52\")\n     \t]\n     rule r {\n        (_:pri<<,>>,5*_),\n        (json(@dev_ip,@alarm_sip:victim_ip, @score:behavior_score,_@*))\n     }\n}\n";
        let expected = indoc! {r#"
            package p {
                 #[tag(log_desc: "告警", alert_src: "52")]
                 rule r {
                    (
                        _:pri<<,>>,
                        5*_
                    ),
                    (
                        json(
                            @dev_ip,
                            @alarm_sip:victim_ip,
                            @score:behavior_score,
                            _@*
                        )
                    )
                 }
            }
        "#};
        assert_eq!(format(raw), expected);
    }

    #[test]
    fn test_multiline_tuple_fields() {
        let raw = "(\n    _:pri<<,>>,\n\n\n    5*_\n),\n(time:update_time\\|\\!,ip:access_ip\\|\\!,\nsymbol(yunsuo|!))\n";
        let expected = "(\n    _:pri<<,>>,\n    5*_\n),\n(\n    time:update_time\\|\\!,\n    ip:access_ip\\|\\!,\n    symbol(yunsuo|!)\n)\n";
        assert_eq!(format(raw), expected);
    }

    #[test]
    fn test_only_whole_call_names_split() {
        assert_eq!(format("parse_kv(a,b)"), "parse_kv(a,b)\n");
        assert_eq!(format("kv()\nx"), "kv()\nx\n");
    }

    #[test]
    fn test_unbalanced_input_is_left_alone() {
        assert_eq!(format("#[tag(a)\nrule r"), "#[tag(a)\nrule r\n");
        assert_eq!(format("json(@a, \"b)\""), "json(@a, \"b)\"\n");
        assert_eq!(format(""), "");
    }

    #[test]
    fn test_crlf_is_normalized() {
        assert_eq!(format("rule r {\r\n(a,b)\r\n}"), "rule r {\n(\n    a,\n    b\n)\n}\n");
    }
}
