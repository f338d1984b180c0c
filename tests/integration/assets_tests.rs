//! Integration tests for static gallery assets.

use axum::http::StatusCode;

use super::test_utils::{body_bytes, TestApp};

#[tokio::test]
async fn test_asset_served() {
    let app = TestApp::new();
    std::fs::write(app.assets.path().join("banner.svg"), "<svg/>").unwrap();

    let response = app.get("/assets/banner.svg").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/svg+xml");

    let body = body_bytes(response).await;
    assert_eq!(&body[..], b"<svg/>");
}

#[tokio::test]
async fn test_missing_asset_not_found() {
    let app = TestApp::new();

    let response = app.get("/assets/missing.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_asset_traversal_not_served() {
    let app = TestApp::new();
    let outside = app.assets.path().parent().unwrap().join("artwall-secret.txt");
    std::fs::write(&outside, "secret").unwrap();

    let response = app.get("/assets/../artwall-secret.txt").await;
    assert_ne!(response.status(), StatusCode::OK);

    std::fs::remove_file(outside).unwrap();
}
