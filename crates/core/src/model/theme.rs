use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Display configuration as served by `/api/design`. Every attribute is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
}

/// Theme with every attribute resolved against the literal defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    background_color: String,
    text_color: String,
    font_family: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_BACKGROUND_COLOR.to_owned(),
            text_color: DEFAULT_TEXT_COLOR.to_owned(),
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
        }
    }
}

impl Theme {
    /// Resolve a fetched configuration; blank or missing attributes fall back to defaults.
    #[must_use]
    pub fn resolve(config: &ThemeConfig) -> Self {
        fn pick(value: Option<&String>, fallback: &str) -> String {
            value
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_owned()
        }

        Self {
            background_color: pick(config.background_color.as_ref(), DEFAULT_BACKGROUND_COLOR),
            text_color: pick(config.text_color.as_ref(), DEFAULT_TEXT_COLOR),
            font_family: pick(config.font_family.as_ref(), DEFAULT_FONT_FAMILY),
        }
    }

    #[must_use]
    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    #[must_use]
    pub fn text_color(&self) -> &str {
        &self.text_color
    }

    #[must_use]
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Inline CSS for the presentation root.
    #[must_use]
    pub fn css(&self) -> String {
        format!(
            "background-color: {}; color: {}; font-family: {};",
            self.background_color, self.text_color, self.font_family
        )
    }
}
