//! Video read, health and OpenAPI integration tests.
//!
//! Run with: `cargo test -p tubely-api --test videos_test`

mod helpers;

use helpers::setup_test_app;
use uuid::Uuid;

#[tokio::test]
async fn test_get_video_as_owner() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&format!("/api/videos/{}", app.video_id))
        .add_header("Authorization", format!("Bearer {}", app.owner_token()))
        .await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["title"], "Boots in the rain");
    assert_eq!(body["user_id"].as_str(), Some(app.owner.to_string().as_str()));
}

#[tokio::test]
async fn test_get_video_requires_token() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&format!("/api/videos/{}", app.video_id))
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_get_video_of_other_user_is_forbidden() {
    let app = setup_test_app().await;
    let stranger = app.token_for(Uuid::new_v4());

    let response = app
        .client()
        .get(&format!("/api/videos/{}", app.video_id))
        .add_header("Authorization", format!("Bearer {}", stranger))
        .await;

    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_get_unknown_video_is_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&format!("/api/videos/{}", Uuid::new_v4()))
        .add_header("Authorization", format!("Bearer {}", app.owner_token()))
        .await;

    assert_eq!(response.status_code(), 404);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_health_and_liveness() {
    let app = setup_test_app().await;

    let live = app.client().get("/live").await;
    assert_eq!(live.status_code(), 200);
    assert_eq!(live.json::<serde_json::Value>()["status"], "alive");

    let health = app.client().get("/health").await;
    assert_eq!(health.status_code(), 200);
    let body = health.json::<serde_json::Value>();
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["storage"], "healthy");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<serde_json::Value>();
    assert!(body["paths"]["/api/video_upload/{video_id}"].is_object());
    assert!(body["paths"]["/api/thumbnail_upload/{video_id}"].is_object());
}
