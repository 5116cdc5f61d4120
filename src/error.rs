use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use poster_palette::ColorError;
use serde_json::json;
use thiserror::Error;

/// Messages shown to the user when the generation pipeline refuses to run.
pub const MISSING_BRIEF_MESSAGE: &str =
    "Feed the agent a product name and description before generating.";
pub const MISSING_IMAGE_MESSAGE: &str = "Upload a hero product image to anchor the composition.";
pub const UNSUPPORTED_MEDIA_MESSAGE: &str = "Please upload an image file (PNG, JPG, or WebP).";
pub const DECODE_FAILURE_MESSAGE: &str =
    "The agent hit a snag while reading that image. Try another file or smaller size.";

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Color error: {0}")]
    Color(#[from] ColorError),
}

impl StudioError {
    /// The status line a user sees for this failure.
    pub fn status_message(&self) -> String {
        match self {
            StudioError::InvalidInput(message) => (*message).to_string(),
            StudioError::UnsupportedMedia(_) => UNSUPPORTED_MEDIA_MESSAGE.to_string(),
            StudioError::DecodeFailure(_) => DECODE_FAILURE_MESSAGE.to_string(),
            StudioError::Render(e) => format!("Rendering failed: {e}"),
            StudioError::Color(e) => format!("Rendering failed: {e}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Color error: {0}")]
    Color(#[from] ColorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Studio(#[from] StudioError),

    #[error("No poster has been rendered yet")]
    PosterNotReady,
}

impl From<RenderError> for ApiError {
    fn from(e: RenderError) -> Self {
        ApiError::Studio(StudioError::Render(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Studio(e) => {
                let status = match e {
                    StudioError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    StudioError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    StudioError::DecodeFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    StudioError::Render(_) | StudioError::Color(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.status_message())
            }
            ApiError::PosterNotReady => (StatusCode::NOT_FOUND, self.to_string()),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
