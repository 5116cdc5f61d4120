//! Test fixtures: images generated in memory.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

pub const PRODUCT_NAME: &str = "Lumen Arc Smart Lamp";
pub const ECO_DESCRIPTION: &str =
    "A sustainable desk lamp made from recycled aluminium with a natural light spectrum.";

fn encode(image: RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image)
        .write_to(&mut out, format)
        .expect("encode fixture");
    out.into_inner()
}

/// Single-color PNG
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    encode(
        RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255])),
        ImageFormat::Png,
    )
}

/// PNG with the left part in `left` and the rest in `right`
pub fn split_png(width: u32, height: u32, left_width: u32, left: [u8; 3], right: [u8; 3]) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, _| {
        let c = if x < left_width { left } else { right };
        Rgba([c[0], c[1], c[2], 255])
    });
    encode(image, ImageFormat::Png)
}

/// A mostly white product shot with a dark product block in the middle
pub fn product_shot_png() -> Vec<u8> {
    let image = RgbaImage::from_fn(400, 300, |x, y| {
        if (120..280).contains(&x) && (80..220).contains(&y) {
            Rgba([30, 64, 175, 255])
        } else {
            Rgba([250, 250, 250, 255])
        }
    });
    encode(image, ImageFormat::Png)
}
