use crate::error::RenderError;
use crate::models::{AppConfig, CanvasSpec, PosterSpec, RenderedPoster};
use crate::rendering::{FontMetrics, PosterCompositor, RenderSurface, SvgRenderer};
use std::sync::{Arc, Mutex};

/// Turns a poster spec into pixels; blocking, run it through [`render_off_runtime`]
pub trait PosterRenderer: Send + Sync {
    fn canvas(&self) -> CanvasSpec;
    fn render_blocking(&self, spec: &PosterSpec) -> Result<RenderedPoster, RenderError>;
}

/// Render off the async runtime
///
/// Uses spawn_blocking to avoid blocking the async runtime during
/// CPU-intensive rasterization and encoding.
pub async fn render_off_runtime(
    renderer: Arc<dyn PosterRenderer>,
    spec: PosterSpec,
) -> Result<RenderedPoster, RenderError> {
    tokio::task::spawn_blocking(move || renderer.render_blocking(&spec))
        .await
        .map_err(|e| RenderError::SvgParse(format!("Render task failed: {e}")))?
}

/// Composes poster specs and rasterizes them
///
/// The render surface is owned here and reused across renders; the mutex
/// keeps one render on it at a time.
#[derive(Clone)]
pub struct RenderService {
    svg_renderer: Arc<SvgRenderer>,
    surface: Arc<Mutex<RenderSurface>>,
    compositor: Arc<PosterCompositor>,
    optimize: bool,
}

impl RenderService {
    pub fn new(
        svg_renderer: Arc<SvgRenderer>,
        canvas: CanvasSpec,
        families: Vec<String>,
        compositor: PosterCompositor,
        optimize: bool,
    ) -> Self {
        let metrics = Arc::new(FontMetrics::new(svg_renderer.fontdb(), families.clone()));
        if !metrics.resolves_any_family() {
            tracing::warn!(
                families = ?families,
                "No configured font family resolves, poster text will not be drawn"
            );
        }
        Self {
            svg_renderer,
            surface: Arc::new(Mutex::new(RenderSurface::new(canvas, metrics, families))),
            compositor: Arc::new(compositor),
            optimize,
        }
    }

    /// Build from configuration, sharing the renderer's font database
    pub fn from_config(
        svg_renderer: Arc<SvgRenderer>,
        config: &AppConfig,
    ) -> Result<Self, RenderError> {
        Ok(Self::new(
            svg_renderer,
            config.canvas_spec()?,
            config.typography.families.clone(),
            PosterCompositor::new(config.branding.ribbon_label.clone()),
            config.export.optimize,
        ))
    }

    /// Replace the surface, e.g. to inject custom text metrics
    pub fn with_surface(mut self, surface: RenderSurface) -> Self {
        self.surface = Arc::new(Mutex::new(surface));
        self
    }

    pub fn canvas(&self) -> CanvasSpec {
        self.lock_surface().canvas()
    }

    /// Compose and rasterize on the current thread
    pub fn render_blocking(&self, spec: &PosterSpec) -> Result<RenderedPoster, RenderError> {
        let (svg, canvas) = {
            let mut surface = self.lock_surface();
            self.compositor.compose(&mut surface, spec)?;
            (surface.to_svg(), surface.canvas())
        };

        let (pixmap, png) = self
            .svg_renderer
            .render_to_png(svg.as_bytes(), canvas, self.optimize)?;

        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            bytes = png.len(),
            "Rendered poster"
        );
        Ok(RenderedPoster::new(pixmap, png))
    }

    pub async fn render(&self, spec: PosterSpec) -> Result<RenderedPoster, RenderError> {
        render_off_runtime(Arc::new(self.clone()), spec).await
    }

    fn lock_surface(&self) -> std::sync::MutexGuard<'_, RenderSurface> {
        // compose() resets the surface, so a poisoned one is still usable
        self.surface.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PosterRenderer for RenderService {
    fn canvas(&self) -> CanvasSpec {
        RenderService::canvas(self)
    }

    fn render_blocking(&self, spec: &PosterSpec) -> Result<RenderedPoster, RenderError> {
        RenderService::render_blocking(self, spec)
    }
}
