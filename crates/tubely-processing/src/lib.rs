//! Tubely Processing Library
//!
//! Media-type validation and video aspect-ratio classification for uploads.

pub mod validator;
pub mod video;

// Re-export commonly used types
pub use validator::{parse_media_type, MediaTypeValidator, ValidationError};
pub use video::{
    AspectClassifier, AspectRatioTable, ClassifyError, FfprobeProbe, Probe, RatioBucket,
    StreamDims,
};
