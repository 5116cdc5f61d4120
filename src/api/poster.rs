use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::headers::attachment;
use crate::error::ApiError;
use crate::services::Studio;

/// Inline preview of the rendered poster
#[derive(Debug, Serialize, ToSchema)]
pub struct PreviewResponse {
    /// `data:image/png;base64,...`
    pub data_url: String,
    pub file_name: String,
}

/// Download the rendered poster as PNG
#[utoipa::path(
    get,
    path = "/api/poster",
    responses(
        (status = 200, description = "PNG poster", content_type = "image/png"),
        (status = 404, description = "No poster has been rendered yet"),
    ),
    tag = "Poster"
)]
pub async fn handle_poster(State(studio): State<Arc<Studio>>) -> Result<Response, ApiError> {
    let download = studio.download().await.ok_or(ApiError::PosterNotReady)?;

    tracing::info!(
        file_name = %download.file_name,
        size = download.png.len(),
        "Serving poster download"
    );

    Ok((
        [
            (header::CONTENT_TYPE, header::HeaderValue::from_static("image/png")),
            (header::CONTENT_DISPOSITION, attachment(&download.file_name)),
        ],
        download.png,
    )
        .into_response())
}

/// Poster preview as a data URL
#[utoipa::path(
    get,
    path = "/api/poster/preview",
    responses(
        (status = 200, description = "Preview available", body = PreviewResponse),
        (status = 404, description = "No poster has been rendered yet"),
    ),
    tag = "Poster"
)]
pub async fn handle_preview(
    State(studio): State<Arc<Studio>>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let data_url = studio.preview().await.ok_or(ApiError::PosterNotReady)?;
    let file_name = studio
        .snapshot()
        .await
        .poster_file_name
        .ok_or(ApiError::PosterNotReady)?;

    Ok(Json(PreviewResponse {
        data_url,
        file_name,
    }))
}
