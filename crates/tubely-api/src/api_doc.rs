//! OpenAPI documentation

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use tubely_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Thumbnail and video uploads for Tubely. Uploads take a multipart body and a bearer token, and return the updated video record."
    ),
    paths(
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::video_upload::upload_video,
        handlers::video_get::get_video,
    ),
    components(
        schemas(
            models::Video,
            models::AspectCategory,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "uploads", description = "Thumbnail and video uploads"),
        (name = "videos", description = "Video records")
    )
)]
pub struct ApiDoc;
