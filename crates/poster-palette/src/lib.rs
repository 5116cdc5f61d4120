#![allow(clippy::module_inception)]

//! poster-palette: color math and dominant-color extraction for posters
//!
//! This library provides the two color building blocks of the poster
//! composition pipeline: pure hex color utilities and a histogram-based
//! palette extractor.
//!
//! # Quick Start
//!
//! ```
//! use image::{DynamicImage, Rgba, RgbaImage};
//! use poster_palette::{Palette, PaletteExtractor, LAYOUT_FALLBACK};
//!
//! let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(320, 240, Rgba([250, 250, 250, 255])));
//! let extracted = PaletteExtractor::default().extract(&image, 5);
//! let palette = Palette::resolve(&extracted, &LAYOUT_FALLBACK);
//!
//! assert_eq!(palette.display_hex().len(), 5);
//! assert_eq!(palette.primary().readable_text_color().to_hex_upper(), "#1F2933");
//! ```
//!
//! # Extraction
//!
//! The extractor trades accuracy for bounded cost:
//!
//! 1. Downscale to a 220-wide working raster, keeping the aspect ratio.
//! 2. Sample every 6th pixel of the row-major buffer.
//! 3. Quantize each channel with `round(channel / 32)` into a bucket key.
//! 4. Accumulate count and raw channel sums per bucket.
//! 5. Rank by descending count (stable, so ties keep first-seen order) and
//!    average the raw colors of the top N buckets.
//!
//! No perceptual clustering is performed. Results are deterministic for a
//! given image and stride.
//!
//! # Text Contrast
//!
//! [`Color::readable_text_color`] applies a single Rec. 601 luminance
//! threshold of 0.6 and returns one of exactly two colors,
//! [`DARK_TEXT`] (`#1F2933`) or [`LIGHT_TEXT`] (`#F9FAFB`).

pub mod color;
pub mod extract;
pub mod palette;


pub use color::{
    hex_to_rgb, hex_to_rgba, mix_color, parse_css_color, readable_text_color, to_hex, Color,
    ColorError, FormatProblem, DARK_TEXT, LIGHT_TEXT,
};
pub use extract::{
    downscale_to_width, ColorBucket, Histogram, PaletteExtractor, BUCKET_SIZE, SAMPLE_STRIDE,
    WORKING_WIDTH,
};
pub use palette::{Palette, EXTRACTION_FALLBACK, LAYOUT_FALLBACK, PALETTE_SIZE};
