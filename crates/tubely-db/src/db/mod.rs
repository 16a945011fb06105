//! Database repositories for data access layer
//!
//! The pipeline only reads and updates video records, through the `VideoStore`
//! trait; `VideoRepository` is its PostgreSQL implementation.

pub mod video;

pub use video::{VideoRepository, VideoStore};
