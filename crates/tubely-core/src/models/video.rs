use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::asset::UploadKind;

/// A video record. Owned by the videos table; uploads only ever attach URLs to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub user_id: Uuid,
}

impl Video {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Point the field matching `kind` at `url` and bump `updated_at`.
    pub fn attach_asset(&mut self, kind: UploadKind, url: String) {
        match kind {
            UploadKind::Thumbnail => self.thumbnail_url = Some(url),
            UploadKind::Video => self.video_url = Some(url),
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_video(user_id: Uuid) -> Video {
        let now = Utc::now();
        Video {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title: "Boots".to_string(),
            description: String::new(),
            thumbnail_url: None,
            video_url: None,
            user_id,
        }
    }

    #[test]
    fn test_attach_asset_sets_matching_field() {
        let mut video = sample_video(Uuid::new_v4());
        let before = video.updated_at;

        video.attach_asset(UploadKind::Thumbnail, "http://localhost/assets/a.png".into());
        assert_eq!(
            video.thumbnail_url.as_deref(),
            Some("http://localhost/assets/a.png")
        );
        assert!(video.video_url.is_none());

        video.attach_asset(UploadKind::Video, "https://b.s3.r.amazonaws.com/k".into());
        assert_eq!(
            video.video_url.as_deref(),
            Some("https://b.s3.r.amazonaws.com/k")
        );
        assert!(video.updated_at >= before);
    }

    #[test]
    fn test_ownership() {
        let owner = Uuid::new_v4();
        let video = sample_video(owner);
        assert!(video.is_owned_by(owner));
        assert!(!video.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn test_video_json_shape() {
        let video = sample_video(Uuid::new_v4());
        let json = serde_json::to_value(&video).expect("serialize");
        assert!(json.get("thumbnail_url").is_some());
        assert!(json.get("video_url").is_some());
        assert!(json.get("user_id").and_then(|v| v.as_str()).is_some());
    }
}
