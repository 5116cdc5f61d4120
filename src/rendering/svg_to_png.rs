use crate::error::RenderError;
use crate::models::CanvasSpec;
use resvg::usvg::{self, Transform};
use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Preferred faces for the generic families, first installed one wins
const SANS_SERIF_CANDIDATES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];
const SERIF_CANDIDATES: &[&str] = &[
    "DejaVu Serif",
    "Liberation Serif",
    "Noto Serif",
    "Times New Roman",
];
const MONOSPACE_CANDIDATES: &[&str] = &[
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Noto Sans Mono",
    "Courier New",
];

/// Rasterizes poster scenes to RGBA and encodes them as PNG.
pub struct SvgRenderer {
    /// Font database for text rendering, shared with text measurement
    fontdb: Arc<fontdb::Database>,
}

impl SvgRenderer {
    /// Create a new SVG renderer with fonts loaded from the provided data
    ///
    /// Provided fonts are loaded before system fonts.
    pub fn with_fonts(fonts: Vec<(String, std::borrow::Cow<'static, [u8]>)>) -> Self {
        let mut fontdb = fontdb::Database::new();

        for (name, data) in fonts {
            fontdb.load_font_data(data.into_owned());
            tracing::debug!(font = %name, "Loaded font");
        }

        // Load system fonts as fallback
        fontdb.load_system_fonts();

        tracing::info!(
            font_count = fontdb.len(),
            "Loaded fonts for poster text rendering"
        );
        if fontdb.is_empty() {
            tracing::warn!("No fonts available, poster text will not be drawn");
        }

        set_generic_families(&mut fontdb);

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Shared handle to the font database
    pub fn fontdb(&self) -> Arc<fontdb::Database> {
        self.fontdb.clone()
    }

    /// Render a scene to an RGBA pixmap and its PNG encoding.
    ///
    /// With `optimize`, the PNG is re-compressed with oxipng; if that fails
    /// the plain encoding is kept.
    pub fn render_to_png(
        &self,
        svg_data: &[u8],
        canvas: CanvasSpec,
        optimize: bool,
    ) -> Result<(Pixmap, Vec<u8>), RenderError> {
        let pixmap = self.rasterize_svg(svg_data, canvas)?;
        let png_bytes = encode_png(&pixmap)?;

        if !optimize {
            return Ok((pixmap, png_bytes));
        }

        // Re-compress with oxipng (zopfli + adaptive filter selection)
        let optimized = match oxipng::optimize_from_memory(
            &png_bytes,
            &oxipng::Options {
                strip: oxipng::StripChunks::Safe,
                ..Default::default()
            },
        ) {
            Ok(optimized) => {
                tracing::debug!(
                    before = png_bytes.len(),
                    after = optimized.len(),
                    "Optimized poster PNG"
                );
                optimized
            }
            Err(e) => {
                tracing::warn!(%e, "PNG optimization failed, keeping plain encoding");
                png_bytes
            }
        };
        Ok((pixmap, optimized))
    }

    /// Parse and rasterize SVG to an RGBA pixmap of the canvas size
    pub fn rasterize_svg(&self, svg_data: &[u8], canvas: CanvasSpec) -> Result<Pixmap, RenderError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg_data, &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        let svg_size = tree.size();
        let scale_x = canvas.width as f32 / svg_size.width();
        let scale_y = canvas.height as f32 / svg_size.height();
        let scale = scale_x.min(scale_y);

        let scaled_width = svg_size.width() * scale;
        let scaled_height = svg_size.height() * scale;
        let offset_x = (canvas.width as f32 - scaled_width) / 2.0;
        let offset_y = (canvas.height as f32 - scaled_height) / 2.0;

        let mut pixmap =
            Pixmap::new(canvas.width, canvas.height).ok_or(RenderError::PixmapAllocation)?;

        let transform = Transform::from_scale(scale, scale).post_translate(offset_x, offset_y);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

/// Point `sans-serif`, `serif` and `monospace` at installed faces.
///
/// fontdb maps them to Arial, Times New Roman and Courier New by default,
/// which are missing on most Linux hosts; resvg then drops the text.
fn set_generic_families(fontdb: &mut fontdb::Database) {
    let mut installed: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    for face in fontdb.faces() {
        if let Some((name, _)) = face.families.first() {
            if seen.insert(name.clone()) {
                installed.push(name.clone());
            }
        }
    }
    tracing::debug!(families = ?installed, "Available font families");

    let pick = |candidates: &[&str]| {
        candidates
            .iter()
            .find(|candidate| seen.contains(**candidate))
            .map(|name| name.to_string())
    };

    let Some(sans_serif) = pick(SANS_SERIF_CANDIDATES).or_else(|| installed.first().cloned())
    else {
        return;
    };
    let serif = pick(SERIF_CANDIDATES).unwrap_or_else(|| sans_serif.clone());
    let monospace = pick(MONOSPACE_CANDIDATES).unwrap_or_else(|| sans_serif.clone());

    tracing::debug!(
        sans_serif = %sans_serif,
        serif = %serif,
        monospace = %monospace,
        "Generic font families"
    );
    fontdb.set_sans_serif_family(sans_serif);
    fontdb.set_serif_family(serif);
    fontdb.set_monospace_family(monospace);
}

/// Encode a premultiplied pixmap as straight-alpha 8-bit RGBA PNG.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let c = pixel.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&rgba)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
