pub mod headers;
pub mod poster;
pub mod session;

use utoipa::OpenApi;

pub use poster::{handle_poster, handle_preview, PreviewResponse};
pub use poster::{__path_handle_poster, __path_handle_preview};
pub use session::{
    handle_edit_copy, handle_generate, handle_session, handle_set_brief, handle_upload_image,
    BriefRequest, GenerateQuery, GenerateResponse,
};
pub use session::{
    __path_handle_edit_copy, __path_handle_generate, __path_handle_session,
    __path_handle_set_brief, __path_handle_upload_image,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "AdCraft API",
        description = "Autonomous poster composition for product launches",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        handle_upload_image,
        handle_set_brief,
        handle_generate,
        handle_edit_copy,
        handle_session,
        handle_poster,
        handle_preview,
    ),
    components(schemas(
        BriefRequest,
        GenerateResponse,
        PreviewResponse,
        crate::services::CopyEdit,
        crate::services::SessionSnapshot,
        crate::services::AgentInsight,
    )),
    tags(
        (name = "Studio", description = "Brief, image upload and poster generation"),
        (name = "Poster", description = "Rendered poster retrieval")
    )
)]
pub struct ApiDoc;
