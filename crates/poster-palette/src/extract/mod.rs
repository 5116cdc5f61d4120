//! Palette extraction
//!
//! Histogram quantization over a downscaled copy of the input image.

mod histogram;
mod resize;

pub use histogram::{
    BucketKey, ColorBucket, Histogram, PaletteExtractor, BUCKET_SIZE, SAMPLE_STRIDE,
    WORKING_WIDTH,
};
pub use resize::downscale_to_width;
