//! Integration tests for the submission workflow.
//!
//! Tests verify:
//! - Submissions are hidden until approved
//! - Rejected submissions are never persisted
//! - Approval of unknown ids
//! - Error response shapes and status codes

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use artwall::submission::SubmissionStore;

use super::test_utils::{body_json, upload_url, TestApp};

// =============================================================================
// Listing and Approval
// =============================================================================

#[tokio::test]
async fn test_empty_gallery() {
    let app = TestApp::new();

    let response = app.get("/api/artworks").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_pending_submission_is_not_listed() {
    let app = TestApp::new();
    app.submit("Sunset", "Alice", &upload_url("abc")).await;

    let json = body_json(app.get("/api/artworks").await).await;
    assert_eq!(json, json!([]));

    let rows = app.store.all().await;
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].is_approved);
}

#[tokio::test]
async fn test_submit_then_approve_round_trip() {
    let app = TestApp::new();
    let id = app.submit("  Sunset  ", "Alice", &upload_url("abc")).await;

    let response = app.patch(&format!("/api/artworks/{}/approve", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Artwork approved");

    let json = body_json(app.get("/api/artworks").await).await;
    let artworks = json.as_array().unwrap();
    assert_eq!(artworks.len(), 1);
    assert_eq!(artworks[0]["id"], id);
    assert_eq!(artworks[0]["title"], "Sunset");
    assert_eq!(artworks[0]["artist"], "Alice");
    assert_eq!(artworks[0]["imageUrl"], upload_url("abc"));
    assert_eq!(artworks[0]["isApproved"], true);
    assert!(artworks[0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_list_all_includes_pending_newest_first() {
    let app = TestApp::new();
    let older = app.submit("Genesis Block", "Satoshi", &upload_url("one")).await;
    let newer = app.submit("Blue Period", "Carol", &upload_url("two")).await;

    let all = app.store.list_all().await.unwrap();
    let ids: Vec<_> = all.iter().map(|s| s.id.to_string()).collect();
    assert_eq!(ids, vec![newer.clone(), older.clone()]);
    assert!(all.iter().all(|s| !s.is_approved));
    assert!(app.store.list_approved().await.unwrap().is_empty());

    app.approve(&older).await;

    let all = app.store.list_all().await.unwrap();
    let ids: Vec<_> = all.iter().map(|s| s.id.to_string()).collect();
    assert_eq!(ids, vec![newer.clone(), older.clone()]);
    assert!(all[1].is_approved);
    assert!(!all[0].is_approved);

    let approved = app.store.list_approved().await.unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id.to_string(), older);
}

#[tokio::test]
async fn test_approve_is_idempotent() {
    let app = TestApp::new();
    let id = app.submit("Sunset", "Alice", &upload_url("abc")).await;

    app.approve(&id).await;
    app.approve(&id).await;

    let json = body_json(app.get("/api/artworks").await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_approved_listed_oldest_first() {
    let app = TestApp::new();
    let first = app.submit("Genesis Block", "Satoshi", &upload_url("one")).await;
    let _pending = app.submit("Waiting", "Bob", &upload_url("two")).await;
    let third = app.submit("Blue Period", "Carol", &upload_url("three")).await;

    // Approve in reverse order; listing still follows submission order
    app.approve(&third).await;
    app.approve(&first).await;

    let json = body_json(app.get("/api/artworks").await).await;
    let titles: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Genesis Block", "Blue Period"]);
}

#[tokio::test]
async fn test_submission_response_shape() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/artworks",
            json!({"title": "Sunset", "artist": "Alice", "imageUrl": upload_url("abc")}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Artwork submitted for review");
    assert!(uuid::Uuid::parse_str(json["id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_image_url_is_stored_canonical() {
    let app = TestApp::new();
    app.submit(
        "Sunset",
        "Alice",
        "https://other-host/.private/uploads/abc?X-Amz-Signature=xyz",
    )
    .await;

    let rows = app.store.all().await;
    assert_eq!(rows[0].image_url, upload_url("abc"));
}

// =============================================================================
// Rejections
// =============================================================================

#[tokio::test]
async fn test_denylisted_title_rejected() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/artworks",
            json!({"title": "XXX Collection", "artist": "Bob", "imageUrl": upload_url("abc")}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "community_guidelines");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("community guidelines"));

    assert!(app.store.all().await.is_empty());
}

#[tokio::test]
async fn test_denylisted_artist_rejected() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/artworks",
            json!({"title": "Portrait", "artist": "NSFW Studio", "imageUrl": upload_url("abc")}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.all().await.is_empty());
}

#[tokio::test]
async fn test_public_image_path_rejected() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/artworks",
            json!({"title": "Sunset", "artist": "Alice", "imageUrl": "https://store/public/abc.png"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "invalid_image_url");
    assert_eq!(json["message"], "Invalid image URL");
    assert!(app.store.all().await.is_empty());
}

#[tokio::test]
async fn test_upload_segment_outside_path_rejected() {
    let app = TestApp::new();

    for url in [
        "https://evil.example/cat.png?x=.private/uploads/",
        "https://evil.example/cat.png#.private/uploads/",
        "https://store/.private/uploads/../other/secret",
    ] {
        let response = app
            .post_json(
                "/api/artworks",
                json!({"title": "Sunset", "artist": "Alice", "imageUrl": url}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "url {}", url);
        let json = body_json(response).await;
        assert_eq!(json["error"], "invalid_image_url");
    }

    assert!(app.store.all().await.is_empty());
}

#[tokio::test]
async fn test_shape_violations_rejected() {
    let app = TestApp::new();
    let long_title = "a".repeat(101);
    let long_artist = "b".repeat(51);

    let cases = [
        json!({"title": "", "artist": "Alice", "imageUrl": upload_url("abc")}),
        json!({"title": "   ", "artist": "Alice", "imageUrl": upload_url("abc")}),
        json!({"title": long_title, "artist": "Alice", "imageUrl": upload_url("abc")}),
        json!({"title": "Sunset", "artist": "", "imageUrl": upload_url("abc")}),
        json!({"title": "Sunset", "artist": long_artist, "imageUrl": upload_url("abc")}),
        json!({"title": "Sunset", "artist": "Alice", "imageUrl": "not a url"}),
    ];

    for body in cases {
        let response = app.post_json("/api/artworks", body.clone()).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "expected 400 for {}",
            body
        );
        let json = body_json(response).await;
        assert_eq!(json["error"], "validation_error");
    }

    assert!(app.store.all().await.is_empty());
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = TestApp::new();

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/artworks")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "invalid_request");
    assert_eq!(json["message"], "Invalid artwork data");

    let response = app
        .post_json("/api/artworks", json!({"title": "Sunset", "artist": "Alice"}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(app.store.all().await.is_empty());
}

#[tokio::test]
async fn test_approve_unknown_id() {
    let app = TestApp::new();

    let response = app
        .patch(&format!("/api/artworks/{}/approve", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Artwork not found");

    let response = app.patch("/api/artworks/not-a-uuid/approve").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Store Failures
// =============================================================================

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let app = TestApp::new();
    app.store.set_failing(true);

    let response = app.get("/api/artworks").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "internal_error");
    assert_eq!(json["message"], "Failed to fetch artworks");

    let response = app
        .post_json(
            "/api/artworks",
            json!({"title": "Sunset", "artist": "Alice", "imageUrl": upload_url("abc")}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Failed to submit artwork");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}
