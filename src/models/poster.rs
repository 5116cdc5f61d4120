use crate::error::RenderError;
use crate::models::CanvasSpec;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use poster_palette::Palette;
use std::io::Cursor;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// A decoded hero image ready to be embedded in the poster scene.
///
/// `natural_width`/`natural_height` are the source dimensions and drive the
/// fit-within layout. `href` is a PNG data URI, downscaled to fit the canvas
/// when the source is larger.
#[derive(Debug, Clone)]
pub struct HeroImage {
    pub natural_width: u32,
    pub natural_height: u32,
    pub href: String,
}

impl HeroImage {
    pub fn from_image(image: &DynamicImage, canvas: CanvasSpec) -> Result<Self, RenderError> {
        let (natural_width, natural_height) = (image.width(), image.height());
        if natural_width == 0 || natural_height == 0 {
            return Err(RenderError::UnsupportedDimensions {
                width: natural_width,
                height: natural_height,
            });
        }

        let embedded = if natural_width > canvas.width || natural_height > canvas.height {
            image.resize(canvas.width, canvas.height, FilterType::Triangle)
        } else {
            image.clone()
        };

        let mut png = Cursor::new(Vec::new());
        embedded
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;

        tracing::debug!(
            natural_width,
            natural_height,
            embedded_width = embedded.width(),
            embedded_height = embedded.height(),
            "Prepared hero image"
        );

        Ok(Self {
            natural_width,
            natural_height,
            href: format!("data:image/png;base64,{}", STANDARD.encode(png.into_inner())),
        })
    }

    /// Width over height of the source image
    pub fn aspect_ratio(&self) -> f32 {
        self.natural_width as f32 / self.natural_height as f32
    }
}

/// Everything one render needs
#[derive(Debug, Clone)]
pub struct PosterSpec {
    pub product_name: String,
    pub tagline: String,
    pub call_to_action: String,
    pub feature_highlight: String,
    pub hero: Arc<HeroImage>,
    pub palette: Palette,
}

/// Output of a completed render
#[derive(Debug, Clone)]
pub struct RenderedPoster {
    pub pixmap: Pixmap,
    pub png: Vec<u8>,
    pub generated_at: DateTime<Utc>,
}

impl RenderedPoster {
    pub fn new(pixmap: Pixmap, png: Vec<u8>) -> Self {
        Self {
            pixmap,
            png,
            generated_at: Utc::now(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Embeddable preview (`data:image/png;base64,...`)
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }

    /// Download name derived from the product name
    pub fn file_name(&self, product_name: &str, default_stem: &str) -> String {
        poster_file_name(product_name, default_stem)
    }
}

/// Lowercased product name with whitespace runs collapsed to `-`, plus `.png`.
/// Falls back to `default_stem` when the name is blank.
pub fn poster_file_name(product_name: &str, default_stem: &str) -> String {
    let slug = product_name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        format!("{default_stem}.png")
    } else {
        format!("{slug}.png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_file_name_slug() {
        assert_eq!(
            poster_file_name("  Lumen Arc   Smart\tLamp ", "adcraft-poster"),
            "lumen-arc-smart-lamp.png"
        );
    }

    #[test]
    fn test_file_name_default_when_blank() {
        assert_eq!(poster_file_name("   ", "adcraft-poster"), "adcraft-poster.png");
        assert_eq!(poster_file_name("", "campaign"), "campaign.png");
    }

    #[test]
    fn test_hero_image_keeps_natural_size_and_embeds_png() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 20, Rgba([1, 2, 3, 255])));
        let hero = HeroImage::from_image(&image, CanvasSpec::POSTER).unwrap();

        assert_eq!(hero.natural_width, 40);
        assert_eq!(hero.natural_height, 20);
        assert_eq!(hero.aspect_ratio(), 2.0);
        assert!(hero.href.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_hero_image_downscales_large_sources() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(200, 100, Rgba([9, 9, 9, 255])));
        let canvas = CanvasSpec::from_dimensions(50, 50).unwrap();
        let hero = HeroImage::from_image(&image, canvas).unwrap();

        assert_eq!(hero.natural_width, 200);
        let encoded = hero.href.trim_start_matches("data:image/png;base64,");
        let bytes = STANDARD.decode(encoded).unwrap();
        let embedded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((embedded.width(), embedded.height()), (50, 25));
    }

    #[test]
    fn test_data_url_prefix() {
        let pixmap = Pixmap::new(2, 2).unwrap();
        let poster = RenderedPoster::new(pixmap, vec![0x89, b'P', b'N', b'G']);
        assert_eq!(poster.data_url(), "data:image/png;base64,iVBORw==");
        assert_eq!((poster.width(), poster.height()), (2, 2));
    }
}
