use super::upload::handle_upload;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tubely_core::models::{UploadKind, Video};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{video_id}",
    tag = "uploads",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "File in the `thumbnail` field (image/jpeg or image/png)"),
    responses(
        (status = 200, description = "Thumbnail stored and linked", body = Video),
        (status = 400, description = "Unsupported media type, missing field or unknown video", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let video = handle_upload(&state, video_id, UploadKind::Thumbnail, &headers, multipart).await?;
    Ok(Json(video))
}
