//! Color strings and the RGBA values the rasterizer paints with.

use crate::error::Fallback;
use log::warn;

/// Foreground used whenever a color string cannot be understood.
pub const DEFAULT_FOREGROUND: Rgba = Rgba { r: 0, g: 0, b: 0, a: 255 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Perceived brightness in `0.0..=1.0`.
    pub fn luminance(self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }

    /// Scale every channel by `factor`, clamped to the valid range.
    pub fn shade(self, factor: f32) -> Self {
        let f = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Self { r: f(self.r), g: f(self.g), b: f(self.b), a: self.a }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn hex_byte(s: &str) -> Option<u8> {
    u8::from_str_radix(s, 16).ok()
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 | 4 => {
            let mut ch = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            let r = ch.next()??;
            let g = ch.next()??;
            let b = ch.next()??;
            let a = match ch.next() {
                Some(a) => a?,
                None => 255,
            };
            Some(Rgba { r, g, b, a })
        }
        6 | 8 => {
            let r = hex_byte(&hex[0..2])?;
            let g = hex_byte(&hex[2..4])?;
            let b = hex_byte(&hex[4..6])?;
            let a = if hex.len() == 8 { hex_byte(&hex[6..8])? } else { 255 };
            Some(Rgba { r, g, b, a })
        }
        _ => None,
    }
}

fn parse_functional(args: &str, with_alpha: bool) -> Option<Rgba> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let channel = |s: &str| s.parse::<f32>().ok().map(|v| v.round().clamp(0.0, 255.0) as u8);
    let a = if with_alpha {
        let alpha = parts[3].parse::<f32>().ok()?;
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        255
    };
    Some(Rgba { r: channel(parts[0])?, g: channel(parts[1])?, b: channel(parts[2])?, a })
}

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
pub fn parse_color(raw: &str) -> Result<Rgba, Fallback> {
    let s = raw.trim().to_ascii_lowercase();
    let parsed = if let Some(hex) = s.strip_prefix('#') {
        parse_hex(hex)
    } else if let Some(args) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
        parse_functional(args, true)
    } else if let Some(args) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        parse_functional(args, false)
    } else {
        None
    };
    parsed.ok_or_else(|| Fallback::new(raw, "unrecognized color"))
}

/// Like [`parse_color`], substituting [`DEFAULT_FOREGROUND`] on failure.
pub fn resolve_color(raw: &str) -> Rgba {
    parse_color(raw).unwrap_or_else(|fb| {
        warn!("using default foreground: {}", fb);
        DEFAULT_FOREGROUND
    })
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_text(background: Rgba) -> &'static str {
    if background.luminance() > 0.5 {
        "#000000"
    } else {
        "#ffffff"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(parse_color("#8e44ad").unwrap(), Rgba::rgb(0x8e, 0x44, 0xad));
        assert_eq!(parse_color("#fff").unwrap(), Rgba::rgb(255, 255, 255));
        assert_eq!(parse_color("#00000080").unwrap().a, 0x80);
    }

    #[test]
    fn parses_functional_forms() {
        assert_eq!(parse_color("rgb(39, 174, 96)").unwrap(), Rgba::rgb(39, 174, 96));
        let c = parse_color("rgba(0,0,0,0.5)").unwrap();
        assert_eq!(c.a, 128);
    }

    #[test]
    fn unknown_forms_fall_back() {
        let fb = parse_color("papayawhip").unwrap_err();
        assert_eq!(fb.input, "papayawhip");
        assert_eq!(resolve_color("hsl(1,2,3)"), DEFAULT_FOREGROUND);
        assert_eq!(resolve_color("#zzzzzz"), DEFAULT_FOREGROUND);
    }

    #[test]
    fn contrast_picks_readable_text() {
        assert_eq!(contrast_text(Rgba::rgb(0xf3, 0x9c, 0x12)), "#000000");
        assert_eq!(contrast_text(Rgba::rgb(0x2c, 0x3e, 0x50)), "#ffffff");
    }
}
