//! Hex color type and the string-level color utilities.
//!
//! Colors travel through the poster pipeline as `#rrggbb` strings. The
//! [`Color`] type holds the parsed channels; the free functions operate on
//! strings and mirror the operations the layout code calls.

use std::fmt;
use std::str::FromStr;

use super::error::{ColorError, FormatProblem};

/// Dark text color, chosen for light backgrounds.
pub const DARK_TEXT: Color = Color::new(0x1f, 0x29, 0x33);

/// Light text color, chosen for dark backgrounds.
pub const LIGHT_TEXT: Color = Color::new(0xf9, 0xfa, 0xfb);

/// Luminance above which [`DARK_TEXT`] is used.
pub const TEXT_LUMINANCE_THRESHOLD: f64 = 0.6;

/// A 24-bit RGB color.
///
/// Parses from `#RRGGBB` or `RRGGBB` (any case) and displays as lowercase
/// `#rrggbb`.
///
/// # Example
///
/// ```
/// use poster_palette::Color;
///
/// let color: Color = "#FEB144".parse().unwrap();
/// assert_eq!(color.to_string(), "#feb144");
/// assert_eq!(color.to_hex_upper(), "#FEB144");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Create a color from 8-bit channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from floating point channels.
    ///
    /// Each channel is rounded to the nearest integer, then clamped to
    /// `0..=255`. Never fails.
    #[inline]
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Uppercase `#RRGGBB` form, used for palette display.
    pub fn to_hex_upper(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Alpha-tagged `rgba(r, g, b, a)` string.
    ///
    /// `alpha` is passed through as given, even outside `0..=1`.
    pub fn to_rgba(self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    /// Tint (positive `amount`) or shade (negative `amount`) this color.
    ///
    /// Positive amounts move each channel toward 255 by
    /// `channel + (255 - channel) * amount`. Negative amounts scale the
    /// channel by `1 + amount`, so `-0.2` keeps 80% of each channel.
    pub fn mix(self, amount: f64) -> Self {
        let mix = |channel: u8| {
            let c = channel as f64;
            let mixed = if amount >= 0.0 {
                c + (255.0 - c) * amount
            } else {
                c + c * amount
            };
            mixed.clamp(0.0, 255.0)
        };
        Self::from_channels(mix(self.r), mix(self.g), mix(self.b))
    }

    /// Perceptual luminance in `0.0..=1.0` (Rec. 601 weights).
    pub fn luminance(self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }

    /// The text color that stays legible on top of this color.
    ///
    /// Always one of [`DARK_TEXT`] or [`LIGHT_TEXT`].
    pub fn readable_text_color(self) -> Self {
        if self.luminance() > TEXT_LUMINANCE_THRESHOLD {
            DARK_TEXT
        } else {
            LIGHT_TEXT
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    /// Parse `#RRGGBB` or `RRGGBB`. Shorthand forms are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);

        let len = digits.chars().count();
        if len != 6 {
            return Err(ColorError::new(s, FormatProblem::InvalidLength(len)));
        }

        // from_str_radix tolerates a leading sign, so check digits first
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorError::new(s, FormatProblem::InvalidHex(bad)));
        }

        let packed = u32::from_str_radix(digits, 16)
            .map_err(|_| ColorError::new(s, FormatProblem::InvalidLength(len)))?;

        Ok(Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        })
    }
}

#[inline]
fn clamp_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Format floating point channels as `#rrggbb`, rounding and clamping.
pub fn to_hex(r: f64, g: f64, b: f64) -> String {
    Color::from_channels(r, g, b).to_hex()
}

/// Parse a 6-digit hex string (leading `#` optional) into channels.
pub fn hex_to_rgb(hex: &str) -> Result<(u8, u8, u8), ColorError> {
    let color: Color = hex.parse()?;
    Ok((color.r, color.g, color.b))
}

/// Build an `rgba(r, g, b, a)` string. `alpha` is not range checked.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Result<String, ColorError> {
    Ok(hex.parse::<Color>()?.to_rgba(alpha))
}

/// Tint or shade a hex color by `amount` in `-1.0..=1.0`.
///
/// See [`Color::mix`] for the exact channel math.
pub fn mix_color(hex: &str, amount: f64) -> Result<String, ColorError> {
    Ok(hex.parse::<Color>()?.mix(amount).to_hex())
}

/// Pick `#1F2933` or `#F9FAFB` for text drawn on `hex`.
pub fn readable_text_color(hex: &str) -> Result<&'static str, ColorError> {
    let color: Color = hex.parse()?;
    Ok(if color.readable_text_color() == DARK_TEXT {
        "#1F2933"
    } else {
        "#F9FAFB"
    })
}

/// Parse a color as accepted by the render surface: `#rrggbb`,
/// `rgb(r, g, b)` or `rgba(r, g, b, a)`.
///
/// Returns the color and its alpha (1.0 unless given).
pub fn parse_css_color(input: &str) -> Result<(Color, f64), ColorError> {
    let trimmed = input.trim();

    let args = trimmed
        .strip_prefix("rgba(")
        .or_else(|| trimmed.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'));

    let Some(args) = args else {
        return Ok((trimmed.parse()?, 1.0));
    };

    let invalid = || ColorError::new(input, FormatProblem::InvalidFunction);
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |s: &str| s.parse::<u8>().map_err(|_| invalid());

    match parts.as_slice() {
        [r, g, b] => Ok((Color::new(channel(r)?, channel(g)?, channel(b)?), 1.0)),
        [r, g, b, a] => {
            let alpha = a.parse::<f64>().map_err(|_| invalid())?;
            Ok((Color::new(channel(r)?, channel(g)?, channel(b)?), alpha))
        }
        _ => Err(invalid()),
    }
}
