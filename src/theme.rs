use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const THEME_KEY: &str = "theme";

/// Page-wide light/dark setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    /// Reads a persisted value; anything unrecognised counts as dark.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("light") => ThemeMode::Light,
            _ => ThemeMode::Dark,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// Glyph for the toggle control: it shows the theme a click switches to.
    pub fn toggle_glyph(&self) -> &'static str {
        match self.other() {
            ThemeMode::Light => "☀",
            ThemeMode::Dark => "☾",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colour palette for one theme mode. Missing entries fall back to the
/// built-in palette for that mode.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Theme {
    // Background colors
    pub base: Option<[u8; 3]>,
    pub surface0: Option<[u8; 3]>,
    pub surface1: Option<[u8; 3]>,

    // Content colors
    pub text: Option<[u8; 3]>,
    pub subtext0: Option<[u8; 3]>,
    pub subtext1: Option<[u8; 3]>,

    // Accents
    pub accent: Option<[u8; 3]>,
    pub heading: Option<[u8; 3]>,
    pub quote: Option<[u8; 3]>,
    pub error: Option<[u8; 3]>,
}

impl Theme {
    /// Catppuccin Mocha, matching the site's dark stylesheet.
    pub fn dark() -> Self {
        Self {
            base: Some([30, 30, 46]),
            surface0: Some([49, 50, 68]),
            surface1: Some([69, 71, 90]),
            text: Some([205, 214, 244]),
            subtext0: Some([166, 173, 200]),
            subtext1: Some([127, 132, 156]),
            accent: Some([203, 166, 247]),
            heading: Some([137, 180, 250]),
            quote: Some([148, 226, 213]),
            error: Some([243, 139, 168]),
        }
    }

    /// Catppuccin Latte.
    pub fn light() -> Self {
        Self {
            base: Some([239, 241, 245]),
            surface0: Some([204, 208, 218]),
            surface1: Some([188, 192, 204]),
            text: Some([76, 79, 105]),
            subtext0: Some([108, 111, 133]),
            subtext1: Some([140, 143, 161]),
            accent: Some([136, 57, 239]),
            heading: Some([30, 102, 245]),
            quote: Some([23, 146, 153]),
            error: Some([210, 15, 57]),
        }
    }

    pub fn builtin(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Fills every unset colour from `fallback`.
    pub fn merged_over(self, fallback: Theme) -> Self {
        Self {
            base: self.base.or(fallback.base),
            surface0: self.surface0.or(fallback.surface0),
            surface1: self.surface1.or(fallback.surface1),
            text: self.text.or(fallback.text),
            subtext0: self.subtext0.or(fallback.subtext0),
            subtext1: self.subtext1.or(fallback.subtext1),
            accent: self.accent.or(fallback.accent),
            heading: self.heading.or(fallback.heading),
            quote: self.quote.or(fallback.quote),
            error: self.error.or(fallback.error),
        }
    }

    fn color(&self, rgb: Option<[u8; 3]>, default: Color) -> Color {
        rgb.map_or(default, |[r, g, b]| Color::Rgb(r, g, b))
    }

    pub fn base_color(&self) -> Color {
        self.color(self.base, Color::Reset)
    }

    pub fn surface0_color(&self) -> Color {
        self.color(self.surface0, Color::Reset)
    }

    pub fn surface1_color(&self) -> Color {
        self.color(self.surface1, Color::DarkGray)
    }

    pub fn text_color(&self) -> Color {
        self.color(self.text, Color::White)
    }

    pub fn subtext0_color(&self) -> Color {
        self.color(self.subtext0, Color::Gray)
    }

    pub fn subtext1_color(&self) -> Color {
        self.color(self.subtext1, Color::DarkGray)
    }

    pub fn accent_color(&self) -> Color {
        self.color(self.accent, Color::Cyan)
    }

    pub fn heading_color(&self) -> Color {
        self.color(self.heading, Color::Blue)
    }

    pub fn quote_color(&self) -> Color {
        self.color(self.quote, Color::Green)
    }

    pub fn error_color(&self) -> Color {
        self.color(self.error, Color::Red)
    }
}

/// Both palettes, selected by the current mode.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeSet {
    pub dark: Theme,
    pub light: Theme,
}

impl Default for ThemeSet {
    fn default() -> Self {
        Self {
            dark: Theme::dark(),
            light: Theme::light(),
        }
    }
}

impl ThemeSet {
    pub fn palette(&self, mode: ThemeMode) -> &Theme {
        match mode {
            ThemeMode::Dark => &self.dark,
            ThemeMode::Light => &self.light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_values() {
        assert_eq!(ThemeMode::from_stored(None), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_stored(Some("light")), ThemeMode::Light);
        assert_eq!(ThemeMode::from_stored(Some("sepia")), ThemeMode::Dark);
    }

    #[test]
    fn test_glyph_points_at_other_theme() {
        assert_eq!(ThemeMode::Dark.toggle_glyph(), "☀");
        assert_eq!(ThemeMode::Light.toggle_glyph(), "☾");
    }

    #[test]
    fn test_partial_override_falls_back() {
        let custom = Theme {
            accent: Some([1, 2, 3]),
            ..Theme::default()
        }
        .merged_over(Theme::dark());
        assert_eq!(custom.accent_color(), Color::Rgb(1, 2, 3));
        assert_eq!(custom.text, Theme::dark().text);
    }
}
