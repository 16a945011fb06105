//! Tubely database access.

pub mod db;

pub use db::{VideoRepository, VideoStore};
