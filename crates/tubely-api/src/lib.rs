//! Tubely API Library
//!
//! This crate provides the HTTP handlers, the staged upload pipeline and
//! application setup.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod services;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::upload::{UploadFailure, UploadLimits, UploadPipeline, UploadStage};
pub use state::AppState;
