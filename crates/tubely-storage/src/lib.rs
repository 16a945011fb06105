//! Tubely Storage Library
//!
//! This crate provides the blob storage abstraction and its implementations for
//! Tubely: S3 (via `object_store`) and the local filesystem.
//!
//! # Storage key format
//!
//! Keys are relative paths produced by [`keys::asset_path`], optionally under a
//! category directory: `{category}/{name}.{ext}` for videos, `{name}.{ext}` for
//! thumbnails. Keys must not contain `..` or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-local")]
pub use factory::create_asset_store;
pub use factory::create_blob_store;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{BlobReader, BlobStore, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
