//! Poster generation pipeline
//!
//! The studio owns one editing session: the brief, the uploaded hero image,
//! the extracted palette, generated copy and the last rendered poster.
//!
//! Generation is validated up front, then decodes and extracts off the async
//! runtime. Every generation (and every upload) takes a new ticket; a
//! generation whose ticket is no longer current when its work completes is
//! discarded instead of applied. Rendering is gated: it only happens once an
//! image, a palette, a tagline and a CTA are all present.

use crate::error::{StudioError, MISSING_BRIEF_MESSAGE, MISSING_IMAGE_MESSAGE};
use crate::models::{poster_file_name, AppConfig, HeroImage, PosterSpec, RenderedPoster};
use crate::services::copywriter::{AgentInsight, Copywriter, InsightRequest};
use crate::services::media::{decode_image, sniff_image};
use crate::services::renderer::{render_off_runtime, PosterRenderer, RenderService};
use image::{DynamicImage, ImageFormat};
use poster_palette::{Color, Palette, PaletteExtractor};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use utoipa::ToSchema;

pub const IDLE_MESSAGE: &str =
    "Agent idle. Feed it product context and trigger generation to craft a poster.";
pub const RUNNING_MESSAGE: &str = "Running autonomous design pipeline\u{2026}";
pub const DONE_MESSAGE: &str = "Poster rendered. Download and ship your campaign.";

/// Source of dominant colors for a decoded image
pub trait PaletteSource: Send + Sync {
    fn extract(&self, image: &DynamicImage, count: usize) -> Vec<Color>;
}

impl PaletteSource for PaletteExtractor {
    fn extract(&self, image: &DynamicImage, count: usize) -> Vec<Color> {
        PaletteExtractor::extract(self, image, count)
    }
}

#[derive(Debug, Clone)]
struct Upload {
    bytes: Arc<Vec<u8>>,
    format: ImageFormat,
}

#[derive(Default)]
struct Session {
    product_name: String,
    description: String,
    upload: Option<Upload>,
    hero: Option<Arc<HeroImage>>,
    palette: Vec<Color>,
    tagline: String,
    call_to_action: String,
    feature_highlight: String,
    insights: Vec<AgentInsight>,
    poster: Option<Arc<RenderedPoster>>,
    status: Option<String>,
    generating: bool,
}

impl Session {
    /// Forget everything a generation produced
    fn roll_back(&mut self) {
        self.hero = None;
        self.palette.clear();
        self.tagline.clear();
        self.call_to_action.clear();
        self.insights.clear();
        self.poster = None;
    }
}

/// Result of a generation request that passed validation
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    Completed(Arc<RenderedPoster>),
    /// A newer upload or generation started before this one finished
    Superseded,
}

/// Partial update of the generated copy
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CopyEdit {
    pub product_name: Option<String>,
    pub tagline: Option<String>,
    pub call_to_action: Option<String>,
    pub feature_highlight: Option<String>,
}

/// Read-only view of the session
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionSnapshot {
    pub product_name: String,
    pub description: String,
    pub has_image: bool,
    /// Extracted colors, uppercase, most dominant first (may be fewer than five)
    pub palette: Vec<String>,
    /// The five colors the layout uses
    pub resolved_palette: Vec<String>,
    pub tagline: String,
    pub call_to_action: String,
    pub feature_highlight: String,
    pub insights: Vec<AgentInsight>,
    pub status: String,
    pub generating: bool,
    pub has_poster: bool,
    pub poster_file_name: Option<String>,
    /// RFC 3339 time of the last render
    pub generated_at: Option<String>,
}

/// PNG export of the current poster
#[derive(Debug, Clone)]
pub struct PosterDownload {
    pub file_name: String,
    pub png: Vec<u8>,
}

pub struct Studio {
    session: RwLock<Session>,
    ticket: AtomicU64,
    extractor: Arc<dyn PaletteSource>,
    renderer: Arc<dyn PosterRenderer>,
    copywriter: Mutex<Copywriter>,
    layout_fallback: Palette,
    palette_count: usize,
    default_file_stem: String,
}

impl Studio {
    pub fn new(
        config: &AppConfig,
        renderer: Arc<dyn PosterRenderer>,
        extractor: Arc<dyn PaletteSource>,
    ) -> Self {
        let mut copywriter = Copywriter::with_seed(config.copy.seed);
        let session = Session {
            feature_highlight: copywriter.describe_feature_highlight(),
            ..Default::default()
        };
        Self {
            session: RwLock::new(session),
            ticket: AtomicU64::new(0),
            extractor,
            renderer,
            copywriter: Mutex::new(copywriter),
            layout_fallback: config.layout_fallback(),
            palette_count: config.palette.count,
            default_file_stem: config.branding.default_file_name.clone(),
        }
    }

    /// Studio using the configured histogram extractor
    pub fn from_config(config: &AppConfig, renderer: RenderService) -> Self {
        Self::new(config, Arc::new(renderer), Arc::new(config.extractor()))
    }

    fn copywriter(&self) -> std::sync::MutexGuard<'_, Copywriter> {
        self.copywriter.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_ticket(&self) -> u64 {
        self.ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.ticket.load(Ordering::SeqCst) == ticket
    }

    /// Accept a new hero image.
    ///
    /// Non-image uploads are rejected before anything changes. A valid upload
    /// clears the palette, poster and insights, rolls a new feature highlight
    /// and invalidates generations still in flight.
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        declared_type: Option<&str>,
    ) -> Result<(), StudioError> {
        let format = sniff_image(&bytes, declared_type)?;
        let feature_highlight = self.copywriter().describe_feature_highlight();

        let mut session = self.session.write().await;
        self.next_ticket();
        session.upload = Some(Upload {
            bytes: Arc::new(bytes),
            format,
        });
        session.hero = None;
        session.palette.clear();
        session.poster = None;
        session.insights.clear();
        session.feature_highlight = feature_highlight;
        session.status = None;
        session.generating = false;

        tracing::info!(format = ?format, "Hero image uploaded");
        Ok(())
    }

    /// Set the product name and description. A changed name re-renders.
    pub async fn set_brief(
        &self,
        product_name: String,
        description: String,
    ) -> Result<Option<Arc<RenderedPoster>>, StudioError> {
        let name_changed = {
            let mut session = self.session.write().await;
            let changed = session.product_name != product_name;
            session.product_name = product_name;
            session.description = description;
            changed
        };

        if name_changed {
            self.recompose().await
        } else {
            Ok(None)
        }
    }

    /// Apply user edits to the copy and re-render without re-extracting
    pub async fn edit_copy(&self, edit: CopyEdit) -> Result<Option<Arc<RenderedPoster>>, StudioError> {
        {
            let mut session = self.session.write().await;
            if let Some(name) = edit.product_name {
                session.product_name = name;
            }
            if let Some(tagline) = edit.tagline {
                session.tagline = tagline;
            }
            if let Some(cta) = edit.call_to_action {
                session.call_to_action = cta;
            }
            if let Some(highlight) = edit.feature_highlight {
                session.feature_highlight = highlight;
            }
        }
        self.recompose().await
    }

    /// Run the full pipeline: validate, decode, extract, write copy, render.
    ///
    /// `seed` pins the copy for this run; otherwise the studio's own random
    /// source is used.
    pub async fn generate(&self, seed: Option<u64>) -> Result<GenerationOutcome, StudioError> {
        let (ticket, upload, product_name, description) = {
            let mut session = self.session.write().await;
            if session.product_name.trim().is_empty() || session.description.trim().is_empty() {
                session.status = Some(MISSING_BRIEF_MESSAGE.to_string());
                return Err(StudioError::InvalidInput(MISSING_BRIEF_MESSAGE));
            }
            let Some(upload) = session.upload.clone() else {
                session.status = Some(MISSING_IMAGE_MESSAGE.to_string());
                return Err(StudioError::InvalidInput(MISSING_IMAGE_MESSAGE));
            };

            session.generating = true;
            session.status = Some(RUNNING_MESSAGE.to_string());
            (
                self.next_ticket(),
                upload,
                session.product_name.clone(),
                session.description.clone(),
            )
        };

        tracing::debug!(ticket, "Generation started");

        let extracted = self.decode_and_extract(upload).await;

        if !self.is_current(ticket) {
            tracing::warn!(ticket, "Discarding superseded generation");
            return Ok(GenerationOutcome::Superseded);
        }

        let (hero, palette) = match extracted {
            Ok(result) => result,
            Err(e) => {
                let mut session = self.session.write().await;
                if self.is_current(ticket) {
                    session.roll_back();
                    session.generating = false;
                    session.status = Some(e.status_message());
                }
                tracing::warn!(ticket, error = %e, "Generation failed");
                return Err(e);
            }
        };

        let palette_hex: Vec<String> = palette.iter().map(|c| c.to_hex_upper()).collect();
        let write_copy = |writer: &mut Copywriter| {
            let tagline = writer.craft_tagline(&product_name, &description);
            let call_to_action = writer.craft_call_to_action(&description);
            let insights = writer.generate_insights(&InsightRequest {
                product_name: &product_name,
                description: &description,
                palette: &palette_hex,
                tagline: &tagline,
                call_to_action: &call_to_action,
            });
            (tagline, call_to_action, insights)
        };
        let (tagline, call_to_action, insights) = match seed {
            Some(seed) => write_copy(&mut Copywriter::seeded(seed)),
            None => write_copy(&mut *self.copywriter()),
        };

        let spec = {
            let mut session = self.session.write().await;
            if !self.is_current(ticket) {
                tracing::warn!(ticket, "Discarding superseded generation");
                return Ok(GenerationOutcome::Superseded);
            }
            session.hero = Some(hero);
            session.palette = palette;
            session.tagline = tagline;
            session.call_to_action = call_to_action;
            session.insights = insights;
            self.poster_spec(&session)
        };

        let Some(spec) = spec else {
            // Only reachable with an empty palette, which extraction never returns
            let mut session = self.session.write().await;
            session.roll_back();
            session.generating = false;
            session.status = Some(IDLE_MESSAGE.to_string());
            return Err(StudioError::DecodeFailure("no palette extracted".to_string()));
        };

        let rendered = render_off_runtime(self.renderer.clone(), spec).await;

        let mut session = self.session.write().await;
        if !self.is_current(ticket) {
            tracing::warn!(ticket, "Discarding superseded render");
            return Ok(GenerationOutcome::Superseded);
        }
        session.generating = false;
        match rendered {
            Ok(poster) => {
                let poster = Arc::new(poster);
                session.poster = Some(poster.clone());
                session.status = Some(DONE_MESSAGE.to_string());
                tracing::info!(
                    ticket,
                    product = %session.product_name,
                    palette = ?palette_hex,
                    "Poster generated"
                );
                Ok(GenerationOutcome::Completed(poster))
            }
            Err(e) => {
                let e = StudioError::from(e);
                session.roll_back();
                session.status = Some(e.status_message());
                tracing::warn!(ticket, error = %e, "Poster render failed");
                Err(e)
            }
        }
    }

    async fn decode_and_extract(
        &self,
        upload: Upload,
    ) -> Result<(Arc<HeroImage>, Vec<Color>), StudioError> {
        let extractor = self.extractor.clone();
        let canvas = self.renderer.canvas();
        let count = self.palette_count;

        tokio::task::spawn_blocking(move || {
            let image = decode_image(&upload.bytes, upload.format)?;
            let hero = HeroImage::from_image(&image, canvas)
                .map_err(|e| StudioError::DecodeFailure(e.to_string()))?;
            let palette = extractor.extract(&image, count);
            tracing::debug!(colors = palette.len(), "Extracted palette");
            Ok((Arc::new(hero), palette))
        })
        .await
        .map_err(|e| StudioError::DecodeFailure(format!("decode task failed: {e}")))?
    }

    /// The render input, if every gated input is present
    fn poster_spec(&self, session: &Session) -> Option<PosterSpec> {
        let hero = session.hero.clone()?;
        if session.palette.is_empty()
            || session.tagline.is_empty()
            || session.call_to_action.is_empty()
        {
            return None;
        }
        Some(PosterSpec {
            product_name: session.product_name.clone(),
            tagline: session.tagline.clone(),
            call_to_action: session.call_to_action.clone(),
            feature_highlight: session.feature_highlight.clone(),
            hero,
            palette: Palette::resolve(&session.palette, self.layout_fallback.colors()),
        })
    }

    /// Re-render from the current session; a no-op until the gate opens
    pub async fn recompose(&self) -> Result<Option<Arc<RenderedPoster>>, StudioError> {
        let ticket = self.ticket.load(Ordering::SeqCst);
        let Some(spec) = self.poster_spec(&*self.session.read().await) else {
            tracing::debug!("Render skipped, inputs incomplete");
            return Ok(None);
        };

        let poster = Arc::new(render_off_runtime(self.renderer.clone(), spec).await?);

        let mut session = self.session.write().await;
        if !self.is_current(ticket) {
            tracing::warn!("Discarding render from before a newer upload");
            return Ok(None);
        }
        session.poster = Some(poster.clone());
        Ok(Some(poster))
    }

    /// The current poster as a named PNG
    pub async fn download(&self) -> Option<PosterDownload> {
        let session = self.session.read().await;
        let poster = session.poster.as_ref()?;
        Some(PosterDownload {
            file_name: poster.file_name(&session.product_name, &self.default_file_stem),
            png: poster.png.clone(),
        })
    }

    /// The current poster as an embeddable data URL
    pub async fn preview(&self) -> Option<String> {
        self.session.read().await.poster.as_ref().map(|p| p.data_url())
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.read().await;
        let resolved = Palette::resolve(&session.palette, self.layout_fallback.colors());
        SessionSnapshot {
            product_name: session.product_name.clone(),
            description: session.description.clone(),
            has_image: session.upload.is_some(),
            palette: session.palette.iter().map(|c| c.to_hex_upper()).collect(),
            resolved_palette: resolved.display_hex(),
            tagline: session.tagline.clone(),
            call_to_action: session.call_to_action.clone(),
            feature_highlight: session.feature_highlight.clone(),
            insights: session.insights.clone(),
            status: session
                .status
                .clone()
                .unwrap_or_else(|| IDLE_MESSAGE.to_string()),
            generating: session.generating,
            has_poster: session.poster.is_some(),
            poster_file_name: session
                .poster
                .as_ref()
                .map(|_| poster_file_name(&session.product_name, &self.default_file_stem)),
            generated_at: session.poster.as_ref().map(|p| p.generated_at.to_rfc3339()),
        }
    }
}
