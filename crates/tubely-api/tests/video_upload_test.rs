//! Video upload integration tests.
//!
//! Run with: `cargo test -p tubely-api --test video_upload_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::doubles::FailingBlobStore;
use helpers::fixtures::create_minimal_mp4;
use helpers::{files_under, setup_test_app, setup_test_app_with, TestAppOptions, BLOB_BASE_URL};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tubely_processing::StreamDims;
use uuid::Uuid;

fn video_form(data: Vec<u8>, mime: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name("boots.mp4")
        .mime_type(mime);
    MultipartForm::new()
        .add_text("note", "ignored")
        .add_part("video", part)
}

fn with_streams(streams: Vec<StreamDims>) -> TestAppOptions {
    TestAppOptions {
        streams,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_upload_landscape_video() {
    let app = setup_test_app().await;
    let mp4 = create_minimal_mp4();

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", app.video_id))
        .add_header("Authorization", format!("Bearer {}", app.owner_token()))
        .multipart(video_form(mp4.clone(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<serde_json::Value>();
    let url = body["video_url"].as_str().expect("video_url").to_string();
    assert!(url.starts_with(&format!("{}/landscape/", BLOB_BASE_URL)));
    assert!(url.ends_with(".mp4"));
    assert_eq!(app.video().video_url.as_deref(), Some(url.as_str()));

    let key = url.trim_start_matches(&format!("{}/", BLOB_BASE_URL));
    let stored = std::fs::read(app.blobs_dir.join(key)).expect("stored blob");
    assert_eq!(stored, mp4);
}

#[tokio::test]
async fn test_upload_portrait_video_uses_portrait_directory() {
    let app = setup_test_app_with(with_streams(vec![StreamDims::new(1080, 1920)])).await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", app.video_id))
        .add_header("Authorization", format!("Bearer {}", app.owner_token()))
        .multipart(video_form(create_minimal_mp4(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 200);
    let video = app.video();
    let url = video.video_url.expect("video_url");
    assert!(url.starts_with(&format!("{}/portrait/", BLOB_BASE_URL)));

    let files = files_under(&app.blobs_dir);
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("portrait"));
}

#[tokio::test]
async fn test_upload_square_video_goes_to_other() {
    let app = setup_test_app_with(with_streams(vec![StreamDims::new(1000, 1000)])).await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", app.video_id))
        .add_header("Authorization", format!("Bearer {}", app.owner_token()))
        .multipart(video_form(create_minimal_mp4(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 200);
    let url = app.video().video_url.expect("video_url");
    assert!(url.starts_with(&format!("{}/other/", BLOB_BASE_URL)));
}

#[tokio::test]
async fn test_upload_audio_only_video_goes_to_other() {
    let app = setup_test_app_with(with_streams(vec![StreamDims::new(0, 0)])).await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", app.video_id))
        .add_header("Authorization", format!("Bearer {}", app.owner_token()))
        .multipart(video_form(create_minimal_mp4(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 200);
    let url = app.video().video_url.expect("video_url");
    assert!(url.starts_with(&format!("{}/other/", BLOB_BASE_URL)));
}

#[tokio::test]
async fn test_staged_file_removed_after_upload() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", app.video_id))
        .add_header("Authorization", format!("Bearer {}", app.owner_token()))
        .multipart(video_form(create_minimal_mp4(), "video/mp4"))
        .await;
    assert_eq!(response.status_code(), 200);

    let seen: Vec<PathBuf> = app.probe.seen_paths();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with(&app.staging_dir));
    assert!(!seen[0].exists());
    assert!(files_under(&app.staging_dir).is_empty());
}

#[tokio::test]
async fn test_upload_video_rejects_image_type() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", app.video_id))
        .add_header("Authorization", format!("Bearer {}", app.owner_token()))
        .multipart(video_form(create_minimal_mp4(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert!(app.probe.seen_paths().is_empty());
}

#[tokio::test]
async fn test_upload_video_without_streams_fails_classification() {
    let app = setup_test_app_with(with_streams(Vec::new())).await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", app.video_id))
        .add_header("Authorization", format!("Bearer {}", app.owner_token()))
        .multipart(video_form(create_minimal_mp4(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["code"], "CLASSIFICATION_ERROR");
    assert_eq!(body["stage"], "classifying");
    assert!(body.get("details").is_none());
    assert!(app.video().video_url.is_none());
    assert!(files_under(&app.blobs_dir).is_empty());
    assert!(files_under(&app.staging_dir).is_empty());
}

#[tokio::test]
async fn test_storage_failure_leaves_record_untouched() {
    let app = setup_test_app_with(TestAppOptions {
        blob_store: Some(Arc::new(FailingBlobStore)),
        ..Default::default()
    })
    .await;
    let before = app.video();

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", app.video_id))
        .add_header("Authorization", format!("Bearer {}", app.owner_token()))
        .multipart(video_form(create_minimal_mp4(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert_eq!(body["stage"], "persisting");
    assert_eq!(app.video(), before);
    assert_eq!(app.videos.update_count(), 0);
    assert!(files_under(&app.staging_dir).is_empty());
}

#[tokio::test]
async fn test_record_update_failure_discards_blob() {
    let app = setup_test_app_with(TestAppOptions {
        fail_record_updates: true,
        ..Default::default()
    })
    .await;

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", app.video_id))
        .add_header("Authorization", format!("Bearer {}", app.owner_token()))
        .multipart(video_form(create_minimal_mp4(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["code"], "RECORD_UPDATE_ERROR");
    assert_eq!(body["stage"], "linking");

    // The orphaned blob is deleted in the background.
    for _ in 0..50 {
        if files_under(&app.blobs_dir).is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(files_under(&app.blobs_dir).is_empty());
}

#[tokio::test]
async fn test_upload_video_for_other_users_video_is_forbidden() {
    let app = setup_test_app().await;
    let stranger = app.token_for(Uuid::new_v4());

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", app.video_id))
        .add_header("Authorization", format!("Bearer {}", stranger))
        .multipart(video_form(create_minimal_mp4(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 403);
    assert!(app.video().video_url.is_none());
    assert!(files_under(&app.blobs_dir).is_empty());
    assert!(app.probe.seen_paths().is_empty());
}

#[tokio::test]
async fn test_upload_video_too_large() {
    let app = setup_test_app().await;
    let oversized = vec![0u8; helpers::MAX_VIDEO_BYTES + 1];

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", app.video_id))
        .add_header("Authorization", format!("Bearer {}", app.owner_token()))
        .multipart(video_form(oversized, "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(app.probe.seen_paths().is_empty());
    assert!(files_under(&app.staging_dir).is_empty());
}
