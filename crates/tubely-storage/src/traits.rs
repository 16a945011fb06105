//! Blob storage abstraction trait
//!
//! This module defines the BlobStore trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Owned async reader handed to [`BlobStore::put_stream`].
pub type BlobReader = Pin<Box<dyn AsyncRead + Send + Unpin>>;

/// Durable blob storage
///
/// All storage backends (S3, local filesystem) implement this trait. The upload
/// pipeline only ever writes whole objects under keys it has chosen itself.
///
/// A successful `put`/`put_stream` means the backend acknowledged the write; only
/// then may the URL from [`BlobStore::url_for`] be handed out.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `data` at `key`, recording `content_type` as the object's content type.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()>;

    /// Write everything `reader` yields at `key`. Returns the number of bytes stored.
    ///
    /// `content_length` is a hint; backends must not trust it over the reader.
    async fn put_stream(
        &self,
        key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: BlobReader,
    ) -> StorageResult<u64>;

    /// Read an object fully into memory
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Retrievable URL for `key`
    fn url_for(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
