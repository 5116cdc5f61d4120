//! Color utilities
//!
//! Pure color math on 24-bit hex colors: conversion, alpha strings,
//! tint/shade mixing and contrast-aware text color selection.

mod error;
mod hex;

pub use error::{ColorError, FormatProblem};
pub use hex::{
    hex_to_rgb, hex_to_rgba, mix_color, parse_css_color, readable_text_color, to_hex, Color,
    DARK_TEXT, LIGHT_TEXT, TEXT_LUMINANCE_THRESHOLD,
};
