//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api::{self, ApiDoc};
use crate::assets::AssetLoader;
use crate::error::RenderError;
use crate::models::AppConfig;
use crate::rendering::SvgRenderer;
use crate::services::{RenderService, Studio};

/// Largest accepted upload body
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub studio: Arc<Studio>,
}

impl FromRef<AppState> for Arc<Studio> {
    fn from_ref(state: &AppState) -> Self {
        state.studio.clone()
    }
}

/// Create application state from an asset loader.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> anyhow::Result<AppState> {
    let config = AppConfig::load_from_assets(&asset_loader);
    let svg_renderer = Arc::new(SvgRenderer::with_fonts(asset_loader.get_fonts()));
    Ok(build_app_state(config, svg_renderer)?)
}

/// Wire the studio from an already loaded configuration.
pub fn build_app_state(
    config: AppConfig,
    svg_renderer: Arc<SvgRenderer>,
) -> Result<AppState, RenderError> {
    let renderer = RenderService::from_config(svg_renderer, &config)?;
    let studio = Arc::new(Studio::from_config(&config, renderer));

    Ok(AppState {
        config: Arc::new(config),
        studio,
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Studio endpoints
        .route("/api/image", post(api::handle_upload_image))
        .route("/api/brief", axum::routing::put(api::handle_set_brief))
        .route("/api/generate", post(api::handle_generate))
        .route("/api/copy", axum::routing::patch(api::handle_edit_copy))
        .route("/api/session", get(api::handle_session))
        // Poster output
        .route("/api/poster", get(api::handle_poster))
        .route("/api/poster/preview", get(api::handle_preview))
        // OpenAPI document
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
}
