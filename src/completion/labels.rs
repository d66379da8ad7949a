//! Localized labels used to assemble completion detail and info text.

use crate::language::Locale;

/// Fixed strings for one UI locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub description: &'static str,
    pub example: &'static str,
    /// Separator between a label and its value.
    pub separator: &'static str,
    /// Detail and info of the synthesized `package` snippet.
    pub package_detail: &'static str,
    pub package_info: &'static str,
    /// Detail and info of the synthesized `rule` snippet.
    pub rule_detail: &'static str,
    pub rule_info: &'static str,
}

const ZH_CN: Labels = Labels {
    description: "说明",
    example: "示例",
    separator: "：",
    package_detail: "包定义",
    package_info: "定义 WPL 包路径与作用域。",
    rule_detail: "规则定义",
    rule_info: "定义规则名称与规则体。",
};

const EN_US: Labels = Labels {
    description: "Description",
    example: "Example",
    separator: ": ",
    package_detail: "Package",
    package_info: "Define WPL package path and scope.",
    rule_detail: "Rule",
    rule_info: "Define rule name and body.",
};

pub fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::ZhCn => &ZH_CN,
        Locale::EnUs => &EN_US,
    }
}

/// Info text: a description line then an example line, skipping absent or empty parts.
///
/// Returns `None` when neither part is present.
pub fn build_info(labels: &Labels, description: Option<&str>, example: Option<&str>) -> Option<String> {
    let lines: Vec<String> = [(labels.description, description), (labels.example, example)]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| format!("{}{}{}", label, labels.separator, v))
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info() {
        let en = labels(Locale::EnUs);
        assert_eq!(
            build_info(en, Some("Reads a field."), Some("read(ip)")).as_deref(),
            Some("Description: Reads a field.\nExample: read(ip)")
        );
        assert_eq!(build_info(en, None, Some("read(ip)")).as_deref(), Some("Example: read(ip)"));
        assert_eq!(build_info(en, Some(""), None), None);
        assert_eq!(build_info(en, None, None), None);

        let zh = labels(Locale::ZhCn);
        assert_eq!(build_info(zh, Some("读取字段"), None).as_deref(), Some("说明：读取字段"));
    }
}
