//! Themes supplied by the caller. The core only reads them.

use crate::color::{resolve_color, Rgba};
use crate::error::Fallback;
use crate::palette::Palette;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    Pink,
}

impl ThemeName {
    pub const ALL: [ThemeName; 3] = [ThemeName::Dark, ThemeName::Light, ThemeName::Pink];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeName::Dark => "dark",
            ThemeName::Light => "light",
            ThemeName::Pink => "pink",
        }
    }

    pub fn parse(name: &str) -> Result<Self, Fallback> {
        let lower = name.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| Fallback::new(name, "unknown theme"))
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colors for the page chrome. Entry colors come from the theme's [`Palette`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: ThemeName,
    pub background_color: String,
    pub text_color: String,
    pub border_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self::for_name(ThemeName::default())
    }
}

impl ThemeConfig {
    pub fn for_name(name: ThemeName) -> Self {
        let (bg, text, border) = match name {
            ThemeName::Dark => ("#1f2937", "#f3f4f6", "#4b5563"),
            ThemeName::Light => ("#ffffff", "#111827", "#cccccc"),
            ThemeName::Pink => ("#fff0f6", "#831843", "#f9a8d4"),
        };
        Self {
            name,
            background_color: bg.to_string(),
            text_color: text.to_string(),
            border_color: border.to_string(),
        }
    }

    /// Look a theme up by name, falling back to the default theme.
    pub fn named(name: &str) -> Self {
        match ThemeName::parse(name) {
            Ok(t) => Self::for_name(t),
            Err(fb) => {
                warn!("{}; using {} theme", fb, ThemeName::default());
                Self::default()
            }
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.name)
    }

    pub fn background(&self) -> Rgba {
        resolve_color(&self.background_color)
    }

    pub fn text(&self) -> Rgba {
        resolve_color(&self.text_color)
    }

    pub fn border(&self) -> Rgba {
        resolve_color(&self.border_color)
    }

    /// Fill behind the day-name header.
    pub fn header_fill(&self) -> Rgba {
        match self.name {
            ThemeName::Dark => Rgba::rgb(0x37, 0x41, 0x51),
            ThemeName::Light => Rgba::rgb(0xf8, 0xf9, 0xfa),
            ThemeName::Pink => Rgba::rgb(0xfb, 0xcf, 0xe8),
        }
    }

    /// Fill for the n-th body row: a faint shift from the background on odd rows.
    pub fn row_band(&self, row: usize) -> Rgba {
        let bg = self.background();
        if row % 2 == 0 {
            return bg;
        }
        if bg.luminance() > 0.5 {
            bg.shade(0.975)
        } else {
            bg.shade(1.12)
        }
    }

    /// Outer border and header separator.
    pub fn frame(&self) -> Rgba {
        match self.name {
            ThemeName::Dark => Rgba::rgb(0x11, 0x18, 0x27),
            ThemeName::Light => Rgba::rgb(0x33, 0x33, 0x33),
            ThemeName::Pink => Rgba::rgb(0x9d, 0x17, 0x4d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_dark() {
        assert_eq!(ThemeConfig::named("neon").name, ThemeName::Dark);
        assert_eq!(ThemeConfig::named("Pink").name, ThemeName::Pink);
    }

    #[test]
    fn row_bands_are_subtle() {
        for name in ThemeName::ALL {
            let theme = ThemeConfig::for_name(name);
            let even = theme.row_band(0);
            let odd = theme.row_band(1);
            assert_ne!(even, odd);
            assert!((even.luminance() - odd.luminance()).abs() < 0.08);
        }
    }
}
