//! Service initialization and application state setup

use super::storage::Stores;
use crate::auth::JwtVerifier;
use crate::services::upload::{UploadLimits, UploadPipeline};
use crate::state::AppState;
use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{AspectClassifier, AspectRatioTable, FfprobeProbe};

pub fn initialize_services(config: &Config, pool: PgPool, stores: Stores) -> Result<Arc<AppState>> {
    let videos = Arc::new(VideoRepository::new(pool));
    let verifier = Arc::new(JwtVerifier::new(config.jwt_secret()));

    let probe = FfprobeProbe::new(config.ffprobe_path().to_string())
        .context("Failed to configure ffprobe")?;
    let classifier = AspectClassifier::new(Arc::new(probe), AspectRatioTable::default());

    let limits = UploadLimits {
        max_thumbnail_bytes: config.max_thumbnail_size_bytes() as u64,
        max_video_bytes: config.max_video_size_bytes() as u64,
    };

    let pipeline = UploadPipeline::new(
        videos.clone(),
        verifier.clone(),
        stores.blob_store.clone(),
        stores.asset_store,
        classifier,
        config.staging_dir(),
        limits,
    );

    tracing::info!(
        max_thumbnail_bytes = limits.max_thumbnail_bytes,
        max_video_bytes = limits.max_video_bytes,
        ffprobe_path = %config.ffprobe_path(),
        "Upload pipeline initialized"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        videos,
        verifier,
        blob_store: stores.blob_store,
        pipeline: Arc::new(pipeline),
    }))
}
