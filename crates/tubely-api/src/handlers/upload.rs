//! Shared multipart handling for the upload endpoints

use crate::auth::bearer_token;
use crate::error::HttpAppError;
use crate::services::upload::{UploadBody, UploadStage};
use crate::state::AppState;
use axum::extract::Multipart;
use axum::http::HeaderMap;
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use tubely_core::models::{UploadKind, Video};
use uuid::Uuid;

/// Find the file field for `kind` and run it through the upload pipeline.
///
/// The caller is authorized before the body is read. The field is streamed
/// straight into staging; other fields are skipped.
pub(crate) async fn handle_upload(
    state: &AppState,
    video_id: Uuid,
    kind: UploadKind,
    headers: &HeaderMap,
    mut multipart: Multipart,
) -> Result<Video, HttpAppError> {
    let credential = bearer_token(headers);
    let video = state
        .pipeline
        .authorize(video_id, credential.as_deref())
        .await?;

    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| HttpAppError::from(e).with_context(video_id, UploadStage::Validating))?;
        let Some(field) = field else {
            break;
        };
        if field.name() != Some(kind.field_name()) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let reader = StreamReader::new(Box::pin(field.map_err(std::io::Error::other)));
        let body = UploadBody {
            content_type,
            reader,
        };

        return Ok(state
            .pipeline
            .run_authorized(video, kind, Some(body))
            .await?);
    }

    Ok(state
        .pipeline
        .run_authorized::<tokio::io::Empty>(video, kind, None)
        .await?)
}
