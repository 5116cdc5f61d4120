//! Palette types
//!
//! The resolved five-color palette and the built-in fallbacks.

mod palette;

pub use palette::{Palette, EXTRACTION_FALLBACK, LAYOUT_FALLBACK, PALETTE_SIZE};
