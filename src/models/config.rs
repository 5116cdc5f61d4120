use crate::assets::AssetLoader;
use crate::error::RenderError;
use crate::models::CanvasSpec;
use poster_palette::{
    Color, Palette, PaletteExtractor, BUCKET_SIZE, EXTRACTION_FALLBACK, LAYOUT_FALLBACK,
    PALETTE_SIZE, SAMPLE_STRIDE, WORKING_WIDTH,
};
use serde::Deserialize;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,

    #[serde(default)]
    pub palette: PaletteConfig,

    #[serde(default)]
    pub typography: TypographyConfig,

    #[serde(default)]
    pub branding: BrandingConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub copy: CopyConfig,
}

/// Poster canvas size in pixels
#[derive(Debug, Deserialize, Clone)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: u32,
    #[serde(default = "default_canvas_height")]
    pub height: u32,
}

fn default_canvas_width() -> u32 {
    CanvasSpec::POSTER.width
}

fn default_canvas_height() -> u32 {
    CanvasSpec::POSTER.height
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
        }
    }
}

/// Palette extraction tunables and fallbacks
#[derive(Debug, Deserialize, Clone)]
pub struct PaletteConfig {
    /// Number of dominant colors requested from the extractor
    #[serde(default = "default_palette_count")]
    pub count: usize,

    /// Layout fallback used to pad short palettes (hex strings)
    #[serde(default = "default_layout_fallback")]
    pub fallback: Vec<String>,

    /// Palette returned when extraction yields nothing
    #[serde(default = "default_extraction_fallback")]
    pub extraction_fallback: Vec<String>,

    #[serde(default = "default_working_width")]
    pub working_width: u32,

    #[serde(default = "default_sample_stride")]
    pub sample_stride: usize,

    /// Channel width of one histogram cell
    #[serde(default = "default_bucket_size")]
    pub bucket_size: f32,
}

fn default_palette_count() -> usize {
    PALETTE_SIZE
}

fn default_layout_fallback() -> Vec<String> {
    LAYOUT_FALLBACK.iter().map(|c| c.to_hex_upper()).collect()
}

fn default_extraction_fallback() -> Vec<String> {
    EXTRACTION_FALLBACK.iter().map(|c| c.to_hex_upper()).collect()
}

fn default_working_width() -> u32 {
    WORKING_WIDTH
}

fn default_sample_stride() -> usize {
    SAMPLE_STRIDE
}

fn default_bucket_size() -> f32 {
    BUCKET_SIZE
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            count: default_palette_count(),
            fallback: default_layout_fallback(),
            extraction_fallback: default_extraction_fallback(),
            working_width: default_working_width(),
            sample_stride: default_sample_stride(),
            bucket_size: default_bucket_size(),
        }
    }
}

/// Font family stack used for all poster text
#[derive(Debug, Deserialize, Clone)]
pub struct TypographyConfig {
    #[serde(default = "default_families")]
    pub families: Vec<String>,
}

fn default_families() -> Vec<String> {
    vec![
        "Manrope".to_string(),
        "Inter".to_string(),
        "DejaVu Sans".to_string(),
        "sans-serif".to_string(),
    ]
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            families: default_families(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrandingConfig {
    /// Label printed on the ribbon badge
    #[serde(default = "default_ribbon_label")]
    pub ribbon_label: String,

    /// Download name used when the product name is blank (without extension)
    #[serde(default = "default_file_name")]
    pub default_file_name: String,
}

fn default_ribbon_label() -> String {
    "Autonomous Poster Agent".to_string()
}

fn default_file_name() -> String {
    "adcraft-poster".to_string()
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            ribbon_label: default_ribbon_label(),
            default_file_name: default_file_name(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExportConfig {
    /// Re-compress exported PNGs with oxipng
    #[serde(default)]
    pub optimize: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CopyConfig {
    /// Fixed seed for copy generation; random when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        width = config.canvas.width,
                        height = config.canvas.height,
                        palette_count = config.palette.count,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    pub fn canvas_spec(&self) -> Result<CanvasSpec, RenderError> {
        CanvasSpec::from_dimensions(self.canvas.width, self.canvas.height)
    }

    /// Layout fallback palette, or the built-in one if the configured list is invalid
    pub fn layout_fallback(&self) -> Palette {
        Palette::new(parse_fallback(&self.palette.fallback, &LAYOUT_FALLBACK, "fallback"))
    }

    /// Build an extractor from the palette section
    pub fn extractor(&self) -> PaletteExtractor {
        let fallback = parse_fallback(
            &self.palette.extraction_fallback,
            &EXTRACTION_FALLBACK,
            "extraction_fallback",
        );
        PaletteExtractor::new()
            .with_working_width(self.palette.working_width)
            .with_sample_stride(self.palette.sample_stride)
            .with_bucket_size(self.palette.bucket_size)
            .with_fallback(fallback)
    }
}

fn parse_fallback(
    entries: &[String],
    builtin: &[Color; PALETTE_SIZE],
    field: &str,
) -> [Color; PALETTE_SIZE] {
    if entries.len() != PALETTE_SIZE {
        tracing::warn!(
            field,
            count = entries.len(),
            "Palette fallback needs exactly five colors, using built-in"
        );
        return *builtin;
    }
    let mut colors = *builtin;
    for (slot, entry) in colors.iter_mut().zip(entries) {
        match entry.parse::<Color>() {
            Ok(color) => *slot = color,
            Err(e) => {
                tracing::warn!(field, %e, "Invalid palette fallback, using built-in");
                return *builtin;
            }
        }
    }
    colors
}
