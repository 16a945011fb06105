//! Staged upload pipeline
//!
//! One pipeline run per request. Handlers that read the body lazily call
//! `authorize` first, so identity and ownership failures win over body errors.
//!
//! `Validating -> Staging -> Classifying (video only) -> Persisting -> Linking -> Done`.
//! Any stage may fail; the failure carries the video id and the stage it happened in.
//! The request-scoped staging file is owned by the state value and removed when that
//! value is dropped, on every exit path.

mod pipeline;
mod staging;
mod types;

pub use pipeline::{AuthorizedVideo, UploadLimits, UploadPipeline};
pub use staging::StagingFile;
pub use types::{UploadBody, UploadError, UploadFailure, UploadReader, UploadRequest, UploadStage};
