pub mod thumbnail_upload;
mod upload;
pub mod video_get;
pub mod video_upload;
