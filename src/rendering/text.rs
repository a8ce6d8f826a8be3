//! Bitmap text: glyph lookup, exact measurement and ellipsis fitting.
//!
//! Glyphs are the 8x8 public-domain set, scaled nearest-neighbour into a
//! square cell of `size` pixels. Every character advances by exactly `size`,
//! so measuring a string is arithmetic and always agrees with what is drawn.

use font8x8::{UnicodeFonts, BASIC_FONTS};

/// Suffix drawn after a truncated prefix.
pub const ELLIPSIS: &str = "...";

/// Glyph bitmap for `c`: one byte per row, bit 0 is the leftmost pixel.
/// Characters outside the basic set draw as `?`.
pub fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Horizontal smear used for bold text.
pub fn bold_offset(size: u32) -> u32 {
    (size / 8).max(1)
}

/// Rendered width of `text` in pixels.
pub fn measure(text: &str, size: u32, bold: bool) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0;
    }
    n * size + if bold { bold_offset(size) } else { 0 }
}

fn truncated(chars: &[char], len: usize) -> String {
    let mut s: String = chars[..len].iter().collect();
    s.push_str(ELLIPSIS);
    s
}

/// Fit `text` into `max_width` on one line.
///
/// Returns the full string when it fits. Otherwise binary-searches the
/// longest strict prefix that still fits with [`ELLIPSIS`] appended, falling
/// back to the bare ellipsis.
///
/// When even the bare ellipsis is wider than `max_width` the result is empty.
/// This deliberately departs from "ellipsis only": the result must never
/// exceed `max_width`, and that rule wins. The shipped layout never
/// produces a box this narrow.
pub fn fit_text(text: &str, max_width: u32, size: u32, bold: bool) -> String {
    if measure(text, size, bold) <= max_width {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    if measure(ELLIPSIS, size, bold) > max_width {
        return String::new();
    }

    // Invariant: prefix of length `lo` fits; lengths above `hi` do not.
    let (mut lo, mut hi) = (0usize, chars.len() - 1);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if measure(&truncated(&chars, mid), size, bold) <= max_width {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    truncated(&chars, lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurement_is_per_character() {
        assert_eq!(measure("", 12, false), 0);
        assert_eq!(measure("abc", 12, false), 36);
        assert_eq!(measure("abc", 16, true), 50);
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(fit_text("CSE110", 100, 10, false), "CSE110");
    }

    #[test]
    fn long_text_keeps_longest_prefix() {
        // 10px per char, 95px wide: 9 chars fit, so 6 + "..." is the best.
        assert_eq!(fit_text("Alice - CSE110[01]", 95, 10, false), "Alice ...");
    }

    #[test]
    fn only_ellipsis_when_nothing_else_fits() {
        assert_eq!(fit_text("abcdef", 35, 10, false), "...");
    }

    #[test]
    fn empty_when_even_the_ellipsis_overflows() {
        assert_eq!(fit_text("abcdef", 29, 10, false), "");
        assert_eq!(fit_text("abcdef", 0, 10, true), "");
        assert_eq!(fit_text("ab", 29, 10, false), "ab");
    }

    #[test]
    fn unknown_characters_still_have_a_glyph() {
        assert_eq!(glyph('\u{2603}'), glyph('?'));
        assert_ne!(glyph('A'), [0; 8]);
    }
}
