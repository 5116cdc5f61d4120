use crate::error::RenderError;

/// Largest edge accepted for a poster canvas.
pub const MAX_CANVAS_EDGE: u32 = 8192;

/// Pixel dimensions of the poster canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
}

impl CanvasSpec {
    /// Portrait 4:5 poster: 1080x1350
    pub const POSTER: Self = Self {
        width: 1080,
        height: 1350,
    };

    /// Validate custom dimensions
    pub fn from_dimensions(width: u32, height: u32) -> Result<Self, RenderError> {
        match (width, height) {
            (1..=MAX_CANVAS_EDGE, 1..=MAX_CANVAS_EDGE) => Ok(Self { width, height }),
            _ => Err(RenderError::UnsupportedDimensions { width, height }),
        }
    }

    pub fn width_f(&self) -> f32 {
        self.width as f32
    }

    pub fn height_f(&self) -> f32 {
        self.height as f32
    }
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self::POSTER
    }
}
