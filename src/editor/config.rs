use std::fmt;

use serde::{Deserialize, Serialize};

use crate::language::EditorLanguage;

/// Colour theme. Any name other than `vscodeDark` (or an empty name) selects `oneDark`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    #[default]
    VscodeDark,
    OneDark,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "" | "vscodeDark" => Theme::VscodeDark,
            _ => Theme::OneDark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::VscodeDark => "vscodeDark",
            Theme::OneDark => "oneDark",
        }
    }
}

impl From<String> for Theme {
    fn from(name: String) -> Self {
        Theme::from_name(&name)
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.as_str().to_string()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-supplied editor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub language: EditorLanguage,
    pub theme: Theme,
    /// Overrides the base text colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl EditorConfig {
    pub fn new(language: EditorLanguage) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.language, EditorLanguage::Plain);
        assert_eq!(config.theme, Theme::VscodeDark);
        assert_eq!(config.text_color, None);
    }

    #[test]
    fn test_theme_names() {
        let config: EditorConfig =
            serde_json::from_str(r##"{"language": "oml", "theme": "dracula", "textColor": "#fff"}"##).unwrap();
        assert_eq!(config.language, EditorLanguage::Oml);
        assert_eq!(config.theme, Theme::OneDark);
        assert_eq!(config.text_color.as_deref(), Some("#fff"));

        assert_eq!(Theme::from_name(""), Theme::VscodeDark);
        assert_eq!(serde_json::to_string(&Theme::OneDark).unwrap(), "\"oneDark\"");
    }
}
