//! Highlight styles: a CSS class and a colour for every styled token category.

use serde::Serialize;

use crate::lexer::TokenCategory;

use super::config::Theme;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Style {
    pub class: &'static str,
    pub color: String,
}

/// Resolved styling for one editor instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightStyle {
    pub theme: Theme,
    pub background: &'static str,
    pub foreground: String,
    comment: Style,
    string: Style,
    number: Style,
    keyword: Style,
    type_name: Style,
    function: Style,
    atom: Style,
    variable: Style,
    operator: Style,
}

fn style(class: &'static str, color: &str) -> Style {
    Style { class, color: color.to_string() }
}

impl HighlightStyle {
    pub fn new(theme: Theme, text_color: Option<&str>) -> Self {
        let (background, foreground, comment) = match theme {
            Theme::VscodeDark => ("#1e1e1e", "#d4d4d4", "#6a9955"),
            Theme::OneDark => ("#282c34", "#abb2bf", "#7d8799"),
        };
        let foreground = text_color.unwrap_or(foreground);

        Self {
            theme,
            background,
            foreground: foreground.to_string(),
            comment: style("cm-highlight-comment", comment),
            string: style("cm-highlight-string", "#86efac"),
            number: style("cm-highlight-number", "#fde047"),
            keyword: style("cm-highlight-keyword", "#80F4FF"),
            type_name: style("cm-highlight-type", "#FFF2b3"),
            function: style("cm-highlight-function", "#68BEA6"),
            atom: style("cm-highlight-atom", "#a5b4fcff"),
            variable: style("cm-highlight-variable", text_color.unwrap_or("#e2e8f0")),
            operator: style("cm-highlight-operator", "#cbd5f5"),
        }
    }

    /// Style for `category`; `None` for unstyled tokens.
    pub fn style(&self, category: TokenCategory) -> Option<&Style> {
        match category {
            TokenCategory::Comment => Some(&self.comment),
            TokenCategory::String => Some(&self.string),
            TokenCategory::Number => Some(&self.number),
            TokenCategory::Keyword => Some(&self.keyword),
            TokenCategory::Type => Some(&self.type_name),
            TokenCategory::Function => Some(&self.function),
            TokenCategory::Atom => Some(&self.atom),
            TokenCategory::Variable => Some(&self.variable),
            TokenCategory::Operator => Some(&self.operator),
            TokenCategory::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_styled_category_has_a_class() {
        let styles = HighlightStyle::new(Theme::VscodeDark, None);
        for category in TokenCategory::ALL {
            let style = styles.style(category);
            assert_eq!(style.is_some(), category.is_styled());
            if let Some(style) = style {
                assert_eq!(style.class, format!("cm-highlight-{}", category));
            }
        }
        assert_eq!(styles.style(TokenCategory::Keyword).unwrap().color, "#80F4FF");
    }

    #[test]
    fn test_text_color_override() {
        let styles = HighlightStyle::new(Theme::OneDark, Some("#ffffff"));
        assert_eq!(styles.foreground, "#ffffff");
        assert_eq!(styles.style(TokenCategory::Variable).unwrap().color, "#ffffff");
        assert_eq!(styles.background, "#282c34");
    }
}
