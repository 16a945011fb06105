//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. `AppError`,
//! `UploadFailure` and multipart errors all render through the same path
//! (status, body, logging).

use crate::services::upload::{UploadFailure, UploadStage};
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tubely_core::{AppError, ErrorMetadata, LogLevel};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    /// Video the failed upload targeted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<Uuid>,
    /// Pipeline stage the upload failed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

/// Where an upload failed, for operator diagnosis
#[derive(Debug, Clone, Copy)]
pub struct FailureContext {
    pub video_id: Uuid,
    pub stage: UploadStage,
}

/// Wrapper type for AppError to implement IntoResponse
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    pub context: Option<FailureContext>,
}

impl HttpAppError {
    /// Attach the upload a failure belongs to.
    pub fn with_context(mut self, video_id: Uuid, stage: UploadStage) -> Self {
        self.context = Some(FailureContext { video_id, stage });
        self
    }
}

impl From<AppError> for HttpAppError {
    fn from(error: AppError) -> Self {
        HttpAppError {
            error,
            context: None,
        }
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
        .into()
    }
}

impl From<UploadFailure> for HttpAppError {
    fn from(failure: UploadFailure) -> Self {
        let context = FailureContext {
            video_id: failure.video_id,
            stage: failure.stage,
        };
        HttpAppError {
            error: failure.into_app_error(),
            context: Some(context),
        }
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let message = format!("Invalid multipart body: {}", err.body_text());
        let error = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(message)
        } else {
            AppError::InvalidInput(message)
        };
        error.into()
    }
}

fn log_error(error: &AppError, context: Option<&FailureContext>) {
    let error_type = error.error_type();
    let video_id = context.map(|c| c.video_id.to_string());
    let stage = context.map(|c| c.stage.as_str());
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, video_id = ?video_id, stage = ?stage, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, video_id = ?video_id, stage = ?stage, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, video_id = ?video_id, stage = ?stage, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl HttpAppError {
    fn to_error_response(&self, is_production: bool) -> ErrorResponse {
        let app_error = &self.error;
        // Sensitive errors never carry details: they may name files or hosts.
        let show_details = !is_production && !app_error.is_sensitive();

        ErrorResponse {
            error: app_error.client_message(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
            video_id: self.context.map(|c| c.video_id),
            stage: self.context.map(|c| c.stage.to_string()),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.error, self.context.as_ref());

        (status, Json(self.to_error_response(is_production_env()))).into_response()
    }
}
