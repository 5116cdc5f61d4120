use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::headers::HeaderMapExt;
use crate::error::ApiError;
use crate::services::{CopyEdit, GenerationOutcome, SessionSnapshot, Studio};

/// Request body for the product brief
#[derive(Debug, Deserialize, ToSchema)]
pub struct BriefRequest {
    /// Product name used in the headline and download name
    #[serde(default)]
    pub product_name: String,
    /// Free-text description; drives the brand voice
    #[serde(default)]
    pub description: String,
}

/// Query parameters for generation
#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    /// Fixed seed for the generated copy
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Response from the generate endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    /// "completed", or "superseded" when a newer upload or generation won
    pub outcome: String,
    pub session: SessionSnapshot,
}

/// Upload the hero product image
///
/// The body is the raw image. PNG, JPEG and WebP are accepted; anything else
/// is rejected without touching the current session.
#[utoipa::path(
    post,
    path = "/api/image",
    request_body(content = Vec<u8>, content_type = "application/octet-stream", description = "Raw image bytes"),
    responses(
        (status = 200, description = "Image accepted", body = SessionSnapshot),
        (status = 415, description = "Not a supported image"),
    ),
    params(
        ("Content-Type" = Option<String>, Header, description = "Declared media type, e.g. image/png"),
    ),
    tag = "Studio"
)]
pub async fn handle_upload_image(
    State(studio): State<Arc<Studio>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let declared = headers.content_type();
    tracing::info!(bytes = body.len(), declared = ?declared, "Image upload received");

    studio.upload_image(body.to_vec(), declared).await?;
    Ok(Json(studio.snapshot().await))
}

/// Set the product name and description
#[utoipa::path(
    put,
    path = "/api/brief",
    request_body = BriefRequest,
    responses(
        (status = 200, description = "Brief stored", body = SessionSnapshot),
    ),
    tag = "Studio"
)]
pub async fn handle_set_brief(
    State(studio): State<Arc<Studio>>,
    Json(brief): Json<BriefRequest>,
) -> Result<impl IntoResponse, ApiError> {
    studio.set_brief(brief.product_name, brief.description).await?;
    Ok(Json(studio.snapshot().await))
}

/// Run the design pipeline
///
/// Extracts the palette, writes copy and renders the poster. Returns 400 when
/// the brief or the image is missing and 422 when the image cannot be decoded.
#[utoipa::path(
    post,
    path = "/api/generate",
    responses(
        (status = 200, description = "Generation finished", body = GenerateResponse),
        (status = 400, description = "Brief or image missing"),
        (status = 422, description = "Image could not be decoded"),
    ),
    params(
        ("seed" = Option<u64>, Query, description = "Fixed seed for the generated copy"),
    ),
    tag = "Studio"
)]
pub async fn handle_generate(
    State(studio): State<Arc<Studio>>,
    Query(query): Query<GenerateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = match studio.generate(query.seed).await? {
        GenerationOutcome::Completed(_) => "completed",
        GenerationOutcome::Superseded => "superseded",
    };

    Ok(Json(GenerateResponse {
        outcome: outcome.to_string(),
        session: studio.snapshot().await,
    }))
}

/// Edit the generated copy and re-render
#[utoipa::path(
    patch,
    path = "/api/copy",
    request_body = CopyEdit,
    responses(
        (status = 200, description = "Copy updated", body = SessionSnapshot),
    ),
    tag = "Studio"
)]
pub async fn handle_edit_copy(
    State(studio): State<Arc<Studio>>,
    Json(edit): Json<CopyEdit>,
) -> Result<impl IntoResponse, ApiError> {
    studio.edit_copy(edit).await?;
    Ok(Json(studio.snapshot().await))
}

/// Current session state
#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Session state", body = SessionSnapshot),
    ),
    tag = "Studio"
)]
pub async fn handle_session(State(studio): State<Arc<Studio>>) -> Json<SessionSnapshot> {
    Json(studio.snapshot().await)
}
