//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{create_asset_store, create_blob_store, BlobStore};

/// The two stores an upload can land in
pub struct Stores {
    /// Durable store for videos (S3 or local)
    pub blob_store: Arc<dyn BlobStore>,
    /// Local asset root for thumbnails, served at `/assets`
    pub asset_store: Arc<dyn BlobStore>,
}

/// Create the asset root and staging directory if absent, then open both stores.
pub async fn setup_storage(config: &Config) -> Result<Stores> {
    tracing::info!("Initializing storage...");

    let asset_store = create_asset_store(config)
        .await
        .context("Failed to initialize asset root")?;

    tokio::fs::create_dir_all(config.staging_dir())
        .await
        .with_context(|| format!("Failed to create staging directory {}", config.staging_dir()))?;

    let blob_store = create_blob_store(config)
        .await
        .context("Failed to initialize blob store")?;

    tracing::info!(
        backend = ?blob_store.backend_type(),
        assets_root = %config.assets_root(),
        staging_dir = %config.staging_dir(),
        "Storage initialized successfully"
    );

    Ok(Stores {
        blob_store,
        asset_store,
    })
}
