//! Working-size downscale ahead of the histogram pass.
//!
//! Scanning a fixed small raster bounds the cost of extraction regardless
//! of the input resolution.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};

/// Resize `image` to `target_width`, preserving the aspect ratio.
///
/// The height is `round(target_width / (width / height))`, never below 1.
/// Returns `None` for images with a zero dimension.
pub fn downscale_to_width(image: &DynamicImage, target_width: u32) -> Option<RgbaImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || target_width == 0 {
        return None;
    }

    let ratio = width as f64 / height as f64;
    let target_height = ((target_width as f64 / ratio).round() as u32).max(1);

    Some(imageops::resize(
        image,
        target_width,
        target_height,
        FilterType::Triangle,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    #[test]
    fn test_downscale_preserves_aspect_ratio() {
        let out = downscale_to_width(&solid(1000, 500, [10, 20, 30, 255]), 220).unwrap();
        assert_eq!(out.dimensions(), (220, 110));
    }

    #[test]
    fn test_downscale_upsamples_small_images() {
        let out = downscale_to_width(&solid(10, 30, [10, 20, 30, 255]), 220).unwrap();
        assert_eq!(out.dimensions(), (220, 660));
    }

    #[test]
    fn test_downscale_keeps_height_at_least_one() {
        let out = downscale_to_width(&solid(5000, 1, [0, 0, 0, 255]), 220).unwrap();
        assert_eq!(out.dimensions(), (220, 1));
    }

    #[test]
    fn test_downscale_solid_color_is_preserved() {
        let out = downscale_to_width(&solid(640, 480, [200, 100, 50, 255]), 220).unwrap();
        for p in out.pixels() {
            let [r, g, b, a] = p.0;
            assert!(r.abs_diff(200) <= 1 && g.abs_diff(100) <= 1 && b.abs_diff(50) <= 1);
            assert_eq!(a, 255);
        }
    }

    #[test]
    fn test_downscale_rejects_empty_image() {
        let empty = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        assert!(downscale_to_width(&empty, 220).is_none());
    }
}
