use std::fmt::{Display, Formatter, Result as FmtResult};
use tokio::io::AsyncRead;
use tubely_core::models::UploadKind;
use tubely_core::AppError;
use tubely_processing::{ClassifyError, ValidationError};
use tubely_storage::StorageError;
use uuid::Uuid;

/// Stage of an upload pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Validating,
    Staging,
    Classifying,
    Persisting,
    Linking,
    Done,
}

impl UploadStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStage::Validating => "validating",
            UploadStage::Staging => "staging",
            UploadStage::Classifying => "classifying",
            UploadStage::Persisting => "persisting",
            UploadStage::Linking => "linking",
            UploadStage::Done => "done",
        }
    }
}

impl Display for UploadStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// The file part of an upload request
pub struct UploadBody<R> {
    /// Content type declared for the part, passed to the store verbatim.
    pub content_type: Option<String>,
    pub reader: R,
}

/// Everything the pipeline needs from one HTTP request
pub struct UploadRequest<R> {
    pub video_id: Uuid,
    pub kind: UploadKind,
    pub credential: Option<String>,
    /// `None` when the multipart body had no field named after `kind`.
    pub file: Option<UploadBody<R>>,
}

/// Reason an upload failed
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Caller does not own the video")]
    Forbidden,

    #[error("Video not found")]
    NotFound,

    #[error("Failed to load video: {0}")]
    Lookup(AppError),

    #[error("Missing multipart field '{0}'")]
    MissingFile(&'static str),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Upload exceeds the {max} byte limit")]
    TooLarge { max: u64 },

    #[error("Upload is empty")]
    EmptyFile,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Classification(#[from] ClassifyError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to update video record: {0}")]
    RecordUpdate(AppError),
}

/// Terminal failure of a pipeline run
#[derive(Debug)]
pub struct UploadFailure {
    pub video_id: Uuid,
    pub stage: UploadStage,
    pub error: UploadError,
}

impl Display for UploadFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "upload for video {} failed while {}: {}",
            self.video_id, self.stage, self.error
        )
    }
}

impl std::error::Error for UploadFailure {}

impl UploadFailure {
    /// Map the failure onto the application error taxonomy.
    pub fn into_app_error(self) -> AppError {
        match self.error {
            UploadError::Unauthenticated(msg) => AppError::Unauthorized(msg),
            UploadError::Forbidden => {
                AppError::Forbidden("You do not have access to this video".to_string())
            }
            UploadError::NotFound => AppError::VideoNotFound(self.video_id),
            UploadError::Lookup(err) => err,
            UploadError::MissingFile(field) => {
                AppError::InvalidInput(format!("Missing multipart field '{}'", field))
            }
            UploadError::Validation(err) => AppError::UnsupportedMediaType(err.to_string()),
            UploadError::TooLarge { max } => {
                AppError::PayloadTooLarge(format!("File exceeds the {} byte limit", max))
            }
            UploadError::EmptyFile => AppError::InvalidInput("File is empty".to_string()),
            UploadError::Io(err) => AppError::Internal(format!("Staging I/O failed: {}", err)),
            UploadError::Classification(err) => AppError::Classification(err.to_string()),
            UploadError::Storage(err) => AppError::Storage(err.to_string()),
            UploadError::RecordUpdate(err) => AppError::RecordUpdate(err.to_string()),
        }
    }
}

/// Readers the pipeline can stage from
pub trait UploadReader: AsyncRead + Unpin + Send {}

impl<T: AsyncRead + Unpin + Send> UploadReader for T {}
