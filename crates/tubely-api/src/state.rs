use crate::auth::IdentityVerifier;
use crate::services::upload::UploadPipeline;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoStore;
use tubely_storage::BlobStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoStore>,
    pub verifier: Arc<dyn IdentityVerifier>,
    /// Durable store for videos
    pub blob_store: Arc<dyn BlobStore>,
    pub pipeline: Arc<UploadPipeline>,
}
