use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Aspect-ratio bucket assigned to an uploaded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AspectCategory {
    Landscape,
    Portrait,
    Other,
}

impl AspectCategory {
    /// Directory prefix used for blob keys of videos in this category.
    pub fn dir_name(&self) -> &'static str {
        match self {
            AspectCategory::Landscape => "landscape",
            AspectCategory::Portrait => "portrait",
            AspectCategory::Other => "other",
        }
    }
}

impl Display for AspectCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.dir_name())
    }
}

/// Which asset of a video an upload targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Thumbnail,
    Video,
}

impl UploadKind {
    /// Name of the multipart field carrying the file.
    pub fn field_name(&self) -> &'static str {
        match self {
            UploadKind::Thumbnail => "thumbnail",
            UploadKind::Video => "video",
        }
    }
}

impl Display for UploadKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.field_name())
    }
}

/// Per-upload description of a stored asset. Never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub relative_path: String,
    pub media_type: String,
    pub classification: Option<AspectCategory>,
}

impl AssetDescriptor {
    /// Storage key: the relative path, under the category directory when classified.
    pub fn storage_key(&self) -> String {
        match self.classification {
            Some(category) => format!("{}/{}", category.dir_name(), self.relative_path),
            None => self.relative_path.clone(),
        }
    }
}
