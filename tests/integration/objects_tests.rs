//! Integration tests for uploads and gated object serving.
//!
//! Tests verify:
//! - Upload URLs point into the private uploads namespace
//! - Objects are only served for approved submissions
//! - Missing and unapproved objects are indistinguishable
//! - Security headers on served objects

use axum::http::StatusCode;

use super::test_utils::{body_bytes, body_json, upload_key, upload_url, TestApp, BASE_URL};

// =============================================================================
// Upload URLs
// =============================================================================

#[tokio::test]
async fn test_upload_url_issued() {
    let app = TestApp::new();

    let response = app
        .send(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/objects/upload")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let url = json["uploadURL"].as_str().unwrap();
    let prefix = format!("{}/.private/uploads/", BASE_URL);
    assert!(url.starts_with(&prefix), "unexpected upload URL {}", url);
    assert!(url.contains("X-Amz-Expires=900"));

    let entity = url[prefix.len()..].split('?').next().unwrap();
    assert!(uuid::Uuid::parse_str(entity).is_ok());
}

#[tokio::test]
async fn test_upload_urls_are_unique() {
    let app = TestApp::new();
    let mut urls = Vec::new();
    for _ in 0..3 {
        let response = app.post_json("/api/objects/upload", serde_json::json!({})).await;
        let json = body_json(response).await;
        urls.push(json["uploadURL"].as_str().unwrap().to_string());
    }
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 3);
}

// =============================================================================
// Gated Serving
// =============================================================================

#[tokio::test]
async fn test_approved_object_is_served() {
    let app = TestApp::new();
    app.backend
        .put(upload_key("abc"), vec![0x89, b'P', b'N', b'G'], "image/png")
        .await;
    let id = app.submit("Sunset", "Alice", &upload_url("abc")).await;
    app.approve(&id).await;

    let response = app.get("/objects/uploads/abc").await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers["content-type"], "image/png");
    assert_eq!(headers["content-length"], "4");
    assert_eq!(headers["cache-control"], "private, max-age=3600");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["content-security-policy"], "default-src 'none'");

    let body = body_bytes(response).await;
    assert_eq!(&body[..], &[0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_query_string_ignored_when_serving() {
    let app = TestApp::new();
    app.backend.put(upload_key("abc"), "data", "image/jpeg").await;
    let id = app.submit("Sunset", "Alice", &upload_url("abc")).await;
    app.approve(&id).await;

    let response = app.get("/objects/uploads/abc?v=2").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unapproved_and_missing_objects_are_indistinguishable() {
    let app = TestApp::new();

    // Stored and linked, but pending
    app.backend.put(upload_key("pending"), "data", "image/png").await;
    app.submit("Sunset", "Alice", &upload_url("pending")).await;

    // Stored but never submitted
    app.backend.put(upload_key("orphan"), "data", "image/png").await;

    let pending = app.get("/objects/uploads/pending").await;
    let orphan = app.get("/objects/uploads/orphan").await;
    let missing = app.get("/objects/uploads/does-not-exist").await;

    assert_eq!(pending.status(), StatusCode::NOT_FOUND);
    assert_eq!(orphan.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let pending = body_bytes(pending).await;
    let orphan = body_bytes(orphan).await;
    let missing = body_bytes(missing).await;
    assert_eq!(pending, missing);
    assert_eq!(orphan, missing);

    let json: serde_json::Value = serde_json::from_slice(&missing).unwrap();
    assert_eq!(json["message"], "Image not found or not approved");
}

#[tokio::test]
async fn test_approval_unlocks_object() {
    let app = TestApp::new();
    app.backend.put(upload_key("abc"), "data", "image/png").await;
    let id = app.submit("Sunset", "Alice", &upload_url("abc")).await;

    assert_eq!(
        app.get("/objects/uploads/abc").await.status(),
        StatusCode::NOT_FOUND
    );

    app.approve(&id).await;

    assert_eq!(app.get("/objects/uploads/abc").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_traversal_paths_not_found() {
    let app = TestApp::new();
    app.backend.put(".private/secret", "data", "text/plain").await;

    for uri in [
        "/objects/uploads/../secret",
        "/objects/uploads/%2E%2E/secret",
        "/objects/uploads//abc",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {}", uri);
    }
}

#[tokio::test]
async fn test_object_lookup_store_failure() {
    let app = TestApp::new();
    app.backend.put(upload_key("abc"), "data", "image/png").await;
    app.store.set_failing(true);

    let response = app.get("/objects/uploads/abc").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
