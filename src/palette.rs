//! Per-source entry colors.
//!
//! Each theme has one curated, ordered palette. Source `i` always gets entry
//! `i % len`, so a person keeps their color across regenerations and theme
//! switches as long as their position in the input list is unchanged.

use crate::color::{contrast_text, resolve_color};
use crate::theme::ThemeName;

const DARK: [&str; 10] = [
    "#8e44ad", "#27ae60", "#2980b9", "#d35400", "#c0392b", "#f39c12", "#16a085", "#2c3e50",
    "#7f8c8d", "#e74c3c",
];

const LIGHT: [&str; 10] = [
    "#6c5ce7", "#00b894", "#0984e3", "#e17055", "#d63031", "#fdcb6e", "#00cec9", "#2d3436",
    "#a29bfe", "#e84393",
];

const PINK: [&str; 10] = [
    "#e84393", "#b03a80", "#786fa6", "#ff6b81", "#c44569", "#f8a5c2", "#cf6a87", "#574b90",
    "#f19066", "#fd79a8",
];

/// Colors for one source's entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swatch {
    pub background: String,
    /// Darker edge drawn around the entry box
    pub accent: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: &'static [&'static str],
}

impl Palette {
    pub fn for_theme(theme: ThemeName) -> Self {
        let colors: &'static [&'static str] = match theme {
            ThemeName::Dark => &DARK,
            ThemeName::Light => &LIGHT,
            ThemeName::Pink => &PINK,
        };
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Swatch for the source at `index`, wrapping modulo the palette length.
    pub fn resolve(&self, index: usize) -> Swatch {
        let background = self.colors[index % self.colors.len()];
        let base = resolve_color(background);
        Swatch {
            background: background.to_string(),
            accent: base.shade(0.7).to_hex(),
            text: contrast_text(base).to_string(),
        }
    }
}
