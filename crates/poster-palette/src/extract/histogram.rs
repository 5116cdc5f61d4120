//! Quantized color histogram and the dominant-color extractor.

use std::collections::HashMap;

use image::{DynamicImage, RgbaImage};

use super::resize::downscale_to_width;
use crate::color::Color;
use crate::palette::{EXTRACTION_FALLBACK, PALETTE_SIZE};

/// Default width of the working raster.
pub const WORKING_WIDTH: u32 = 220;

/// Default pixel stride: every 6th pixel is sampled.
pub const SAMPLE_STRIDE: usize = 6;

/// Default channel width of one quantization cell.
pub const BUCKET_SIZE: f32 = 32.0;

/// Coarse color-space cell a sampled pixel falls into.
///
/// Each component is `round(channel / bucket_size)`, so with the default
/// size of 32 components range over `0..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl BucketKey {
    fn quantize(r: u8, g: u8, b: u8, bucket_size: f32) -> Self {
        let q = |v: u8| (v as f32 / bucket_size).round() as u16;
        Self {
            r: q(r),
            g: q(g),
            b: q(b),
        }
    }
}

/// Running pixel count and raw channel sums for one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBucket {
    pub key: BucketKey,
    pub count: u32,
    pub r_sum: u64,
    pub g_sum: u64,
    pub b_sum: u64,
}

impl ColorBucket {
    /// Mean raw color of the pixels in this cell (not the cell center).
    pub fn mean(&self) -> Color {
        let n = self.count.max(1) as f64;
        Color::from_channels(
            self.r_sum as f64 / n,
            self.g_sum as f64 / n,
            self.b_sum as f64 / n,
        )
    }
}

/// Bucket accumulator that remembers first-seen order.
///
/// Ranking uses a stable sort, so buckets with equal counts keep the order
/// in which they were first encountered during the scan.
#[derive(Debug, Default)]
pub struct Histogram {
    index: HashMap<BucketKey, usize>,
    buckets: Vec<ColorBucket>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sampled pixel.
    pub fn add(&mut self, r: u8, g: u8, b: u8, bucket_size: f32) {
        let key = BucketKey::quantize(r, g, b, bucket_size);
        match self.index.get(&key) {
            Some(&i) => {
                let bucket = &mut self.buckets[i];
                bucket.count += 1;
                bucket.r_sum += r as u64;
                bucket.g_sum += g as u64;
                bucket.b_sum += b as u64;
            }
            None => {
                self.index.insert(key, self.buckets.len());
                self.buckets.push(ColorBucket {
                    key,
                    count: 1,
                    r_sum: r as u64,
                    g_sum: g as u64,
                    b_sum: b as u64,
                });
            }
        }
    }

    /// Number of populated buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets by descending count, ties in first-seen order.
    pub fn into_ranked(self) -> Vec<ColorBucket> {
        let mut buckets = self.buckets;
        buckets.sort_by(|a, b| b.count.cmp(&a.count));
        buckets
    }
}

/// Dominant-color extractor.
///
/// Downscales to a fixed working width, samples every `sample_stride`-th
/// pixel into a quantized histogram, and returns the mean colors of the
/// most populated buckets.
///
/// # Example
///
/// ```
/// use image::{DynamicImage, Rgba, RgbaImage};
/// use poster_palette::{Color, PaletteExtractor};
///
/// let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 64, Rgba([30, 60, 90, 255])));
/// let colors = PaletteExtractor::default().extract(&image, 5);
///
/// assert_eq!(colors.len(), 1);
/// let Color { r, g, b } = colors[0];
/// assert!(r.abs_diff(30) <= 1 && g.abs_diff(60) <= 1 && b.abs_diff(90) <= 1);
/// ```
#[derive(Debug, Clone)]
pub struct PaletteExtractor {
    working_width: u32,
    sample_stride: usize,
    bucket_size: f32,
    fallback: [Color; PALETTE_SIZE],
}

impl Default for PaletteExtractor {
    fn default() -> Self {
        Self {
            working_width: WORKING_WIDTH,
            sample_stride: SAMPLE_STRIDE,
            bucket_size: BUCKET_SIZE,
            fallback: EXTRACTION_FALLBACK,
        }
    }
}

impl PaletteExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of the working raster (default 220).
    pub fn with_working_width(mut self, width: u32) -> Self {
        self.working_width = width;
        self
    }

    /// Sample every `stride`-th pixel (default 6). Zero is treated as 1.
    pub fn with_sample_stride(mut self, stride: usize) -> Self {
        self.sample_stride = stride.max(1);
        self
    }

    /// Channel width of one quantization cell (default 32).
    pub fn with_bucket_size(mut self, size: f32) -> Self {
        self.bucket_size = if size > 0.0 { size } else { BUCKET_SIZE };
        self
    }

    /// Colors returned when the image cannot be sampled.
    pub fn with_fallback(mut self, fallback: [Color; PALETTE_SIZE]) -> Self {
        self.fallback = fallback;
        self
    }

    /// Up to `count` dominant colors of `image`, most populated first.
    ///
    /// Images with fewer populated buckets than `count` return fewer
    /// colors; padding is left to the caller. An image that cannot be
    /// sampled yields the fallback sequence truncated to `count`.
    pub fn extract(&self, image: &DynamicImage, count: usize) -> Vec<Color> {
        match downscale_to_width(image, self.working_width) {
            Some(working) => self.extract_from_rgba(&working, count),
            None => self.fallback_colors(count),
        }
    }

    /// Extraction over an already downscaled RGBA raster.
    pub fn extract_from_rgba(&self, pixels: &RgbaImage, count: usize) -> Vec<Color> {
        let histogram = self.histogram(pixels);
        if histogram.is_empty() {
            return self.fallback_colors(count);
        }

        histogram
            .into_ranked()
            .iter()
            .take(count)
            .map(ColorBucket::mean)
            .collect()
    }

    /// Build the sampled histogram of a raster.
    ///
    /// Fully transparent pixels count as black.
    pub fn histogram(&self, pixels: &RgbaImage) -> Histogram {
        let mut histogram = Histogram::new();
        for pixel in pixels.pixels().step_by(self.sample_stride.max(1)) {
            let [r, g, b, a] = pixel.0;
            if a == 0 {
                histogram.add(0, 0, 0, self.bucket_size);
            } else {
                histogram.add(r, g, b, self.bucket_size);
            }
        }
        histogram
    }

    fn fallback_colors(&self, count: usize) -> Vec<Color> {
        self.fallback.iter().take(count).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn raster(pixels: &[[u8; 4]]) -> RgbaImage {
        let mut img = RgbaImage::new(pixels.len() as u32, 1);
        for (i, p) in pixels.iter().enumerate() {
            img.put_pixel(i as u32, 0, Rgba(*p));
        }
        img
    }

    #[test]
    fn test_quantize_rounds_half_up() {
        assert_eq!(BucketKey::quantize(15, 16, 255, 32.0), BucketKey { r: 0, g: 1, b: 8 });
        assert_eq!(BucketKey::quantize(48, 47, 0, 32.0), BucketKey { r: 2, g: 1, b: 0 });
    }

    #[test]
    fn test_bucket_mean_is_raw_average() {
        let mut histogram = Histogram::new();
        histogram.add(100, 0, 0, 32.0);
        histogram.add(110, 0, 0, 32.0);
        histogram.add(105, 3, 0, 32.0);
        let ranked = histogram.into_ranked();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].count, 3);
        assert_eq!(ranked[0].mean(), Color::new(105, 1, 0));
    }

    #[test]
    fn test_ranking_ties_keep_first_seen_order() {
        let mut histogram = Histogram::new();
        histogram.add(0, 0, 255, 32.0);
        histogram.add(255, 0, 0, 32.0);
        histogram.add(0, 255, 0, 32.0);
        histogram.add(0, 255, 0, 32.0);

        let ranked: Vec<Color> = histogram.into_ranked().iter().map(ColorBucket::mean).collect();
        assert_eq!(
            ranked,
            vec![Color::new(0, 255, 0), Color::new(0, 0, 255), Color::new(255, 0, 0)]
        );
    }

    #[test]
    fn test_stride_samples_every_sixth_pixel() {
        // Pixels 0 and 6 are red; everything in between is blue and skipped
        let mut pixels = vec![[0, 0, 255, 255]; 12];
        pixels[0] = [255, 0, 0, 255];
        pixels[6] = [255, 0, 0, 255];

        let colors = PaletteExtractor::default().extract_from_rgba(&raster(&pixels), 5);
        assert_eq!(colors, vec![Color::new(255, 0, 0)]);
    }

    #[test]
    fn test_transparent_pixels_count_as_black() {
        let pixels = vec![[200, 200, 200, 0]; 6];
        let colors = PaletteExtractor::default()
            .with_sample_stride(1)
            .extract_from_rgba(&raster(&pixels), 5);
        assert_eq!(colors, vec![Color::new(0, 0, 0)]);
    }

    #[test]
    fn test_count_limits_output() {
        let pixels = [[0, 0, 0, 255], [255, 255, 255, 255], [255, 0, 0, 255]];
        let colors = PaletteExtractor::default()
            .with_sample_stride(1)
            .extract_from_rgba(&raster(&pixels), 2);
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn test_empty_image_returns_fallback() {
        let empty = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        let colors = PaletteExtractor::default().extract(&empty, 3);
        assert_eq!(colors, EXTRACTION_FALLBACK[..3].to_vec());
    }

    #[test]
    fn test_zero_count_returns_nothing() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255])));
        assert!(PaletteExtractor::default().extract(&img, 0).is_empty());
    }
}
