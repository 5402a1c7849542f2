//! Theme management and ANSI escape sequence generation.
//!
//! Built-in themes are the four Catppuccin flavours, compiled into the plugin
//! from `themes/*.toml`. A custom theme can be loaded from any TOML file with
//! the same shape.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark theme with warm tones (default)
//! - `catppuccin-latte`: Light theme with soft pastels
//! - `catppuccin-frappe`: Cool dark theme
//! - `catppuccin-macchiato`: Warm dark theme
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cba6f7"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! accent_fg = "#a6e3a1"
//! error_fg = "#f38ba8"
//! ```

use crate::domain::error::{Result, ZsplashError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings (e.g. `"#cdd6f4"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Header title color.
    pub header_fg: String,
    /// Optional header background color.
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Cursor row and focused chip foreground.
    pub selection_fg: String,
    /// Cursor row and focused chip background.
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer, credits, timestamps and other secondary text.
    pub text_dim: String,

    /// Border and separator line color.
    pub border: String,

    /// Border of the focused search bar.
    pub search_bar_border: String,
    /// History filter match foreground.
    pub match_highlight_fg: String,
    /// History filter match background.
    pub match_highlight_bg: String,

    /// Loading and empty state messages.
    pub empty_state_fg: String,

    /// Signed-in user, checked images and top search counts.
    pub accent_fg: String,

    /// Error banners and the notice line.
    pub error_fg: String,
}

impl Default for ThemeColors {
    /// Catppuccin Mocha.
    fn default() -> Self {
        Self {
            header_fg: "#cba6f7".to_string(),
            header_bg: None,
            selection_fg: "#1e1e2e".to_string(),
            selection_bg: "#f5c2e7".to_string(),
            text_normal: "#cdd6f4".to_string(),
            text_dim: "#6c7086".to_string(),
            border: "#45475a".to_string(),
            search_bar_border: "#f5c2e7".to_string(),
            match_highlight_fg: "#1e1e2e".to_string(),
            match_highlight_bg: "#f9e2af".to_string(),
            empty_state_fg: "#89b4fa".to_string(),
            accent_fg: "#a6e3a1".to_string(),
            error_fg: "#f38ba8".to_string(),
        }
    }
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// Returns `None` for names other than `catppuccin-mocha`,
    /// `catppuccin-latte`, `catppuccin-frappe` and `catppuccin-macchiato`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use zsplash::ui::theme::Theme;
    ///
    /// let theme = Theme::from_name("catppuccin-latte").unwrap();
    /// assert_eq!(theme.name, "catppuccin-latte");
    /// assert!(Theme::from_name("solarized").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "catppuccin-frappe" => include_str!("../../themes/catppuccin-frappe.toml"),
            "catppuccin-macchiato" => include_str!("../../themes/catppuccin-macchiato.toml"),
            _ => return None,
        };

        match toml::from_str(toml_str) {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::warn!(theme = name, error = %e, "built-in theme failed to parse");
                None
            }
        }
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ZsplashError::Theme`] if the file cannot be read or is not a
    /// valid theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            ZsplashError::Theme(format!(
                "failed to read theme file {}: {e}",
                path.as_ref().display()
            ))
        })?;

        toml::from_str(&contents).map_err(|e| ZsplashError::Theme(format!("failed to parse theme TOML: {e}")))
    }

    /// Parses `#rrggbb`; anything else renders as white.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// ANSI 24-bit foreground escape for `hex`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use zsplash::ui::theme::Theme;
    ///
    /// assert_eq!(Theme::fg("#ff8000"), "\u{1b}[38;2;255;128;0m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background escape for `hex`.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Catppuccin Mocha.
    fn default() -> Self {
        Self::from_name("catppuccin-mocha").unwrap_or_else(|| Self {
            name: "catppuccin-mocha".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_themes_parse() {
        for name in [
            "catppuccin-mocha",
            "catppuccin-latte",
            "catppuccin-frappe",
            "catppuccin-macchiato",
        ] {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn default_matches_builtin_mocha() {
        assert_eq!(Theme::default().colors, ThemeColors::default());
    }

    #[test]
    fn invalid_hex_renders_white() {
        assert_eq!(Theme::fg("nope"), "\u{1b}[38;2;255;255;255m");
        assert_eq!(Theme::bg("#zzzzzz"), "\u{1b}[48;2;255;255;255m");
    }

    #[test]
    fn custom_theme_file_loads_and_reports_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(include_str!("../../themes/catppuccin-frappe.toml").as_bytes())
            .unwrap();
        assert_eq!(Theme::from_file(file.path()).unwrap().name, "catppuccin-frappe");

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        broken.write_all(b"name = 3").unwrap();
        assert!(matches!(Theme::from_file(broken.path()), Err(ZsplashError::Theme(_))));
    }
}
