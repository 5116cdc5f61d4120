//! The five-color poster palette.
//!
//! Extraction may yield fewer than five colors. The layout always works on
//! exactly five, so missing slots are filled position by position from a
//! fallback palette and surplus entries are dropped.

use crate::color::Color;

/// Number of colors in a resolved palette.
pub const PALETTE_SIZE: usize = 5;

/// Fallback used by the layout when extraction yields fewer than five colors.
pub const LAYOUT_FALLBACK: [Color; PALETTE_SIZE] = [
    Color::new(0x11, 0x18, 0x27),
    Color::new(0x1e, 0x29, 0x3b),
    Color::new(0x63, 0x66, 0xf1),
    Color::new(0xf4, 0x72, 0xb6),
    Color::new(0xfa, 0xcc, 0x15),
];

/// Fallback returned by the extractor when the image cannot be sampled.
pub const EXTRACTION_FALLBACK: [Color; PALETTE_SIZE] = [
    Color::new(0x0f, 0x17, 0x2a),
    Color::new(0x22, 0x48, 0x70),
    Color::new(0xf4, 0xf6, 0xfb),
    Color::new(0xfe, 0xb1, 0x44),
    Color::new(0xfc, 0x62, 0x55),
];

/// An ordered palette of exactly five colors.
///
/// Slots carry layout roles: primary, secondary, accent, highlight and pop.
///
/// # Example
///
/// ```
/// use poster_palette::{Color, Palette, LAYOUT_FALLBACK};
///
/// let extracted = [Color::new(10, 20, 30), Color::new(200, 100, 50)];
/// let palette = Palette::resolve(&extracted, &LAYOUT_FALLBACK);
///
/// assert_eq!(palette.primary(), Color::new(10, 20, 30));
/// assert_eq!(palette.accent(), LAYOUT_FALLBACK[2]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: [Color; PALETTE_SIZE],
}

impl Palette {
    /// Build a palette from exactly five colors.
    pub const fn new(colors: [Color; PALETTE_SIZE]) -> Self {
        Self { colors }
    }

    /// Merge extracted colors with a fallback: slot `i` takes
    /// `extracted[i]` when present, else `fallback[i]`.
    pub fn resolve(extracted: &[Color], fallback: &[Color; PALETTE_SIZE]) -> Self {
        let mut colors = *fallback;
        for (slot, color) in colors.iter_mut().zip(extracted) {
            *slot = *color;
        }
        Self { colors }
    }

    /// All five colors in rank order.
    #[inline]
    pub fn colors(&self) -> &[Color; PALETTE_SIZE] {
        &self.colors
    }

    #[inline]
    pub fn primary(&self) -> Color {
        self.colors[0]
    }

    #[inline]
    pub fn secondary(&self) -> Color {
        self.colors[1]
    }

    #[inline]
    pub fn accent(&self) -> Color {
        self.colors[2]
    }

    #[inline]
    pub fn highlight(&self) -> Color {
        self.colors[3]
    }

    #[inline]
    pub fn pop(&self) -> Color {
        self.colors[4]
    }

    /// Uppercase hex strings for swatch display.
    pub fn display_hex(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex_upper()).collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(LAYOUT_FALLBACK)
    }
}
