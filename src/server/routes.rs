//! Router configuration for the gallery server.
//!
//! # Route Structure
//!
//! ```text
//! /health                            - Health check
//! /assets/{filename}                 - Static gallery assets
//! /api/artworks                      - List approved (GET), submit (POST)
//! /api/artworks/{id}/approve         - Approve a submission (PATCH)
//! /api/objects/upload                - Issue a presigned upload URL (POST)
//! /objects/{*object_path}            - Serve an approved image
//! ```
//!
//! # Example
//!
//! ```ignore
//! use artwall::objects::{create_s3_client, ObjectGateway, S3ObjectBackend};
//! use artwall::server::{create_router, RouterConfig};
//! use artwall::submission::PgSubmissionStore;
//!
//! let store = PgSubmissionStore::connect("postgres://localhost/artwall", 5).await?;
//! let client = create_s3_client(None, "us-east-1").await;
//! let gateway = ObjectGateway::new(
//!     S3ObjectBackend::new(client, "gallery".to_string()),
//!     "https://gallery.s3.amazonaws.com",
//! );
//!
//! let router = create_router(store, gateway, RouterConfig::new("./attached_assets"));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    routing::{get, patch, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    approve_artwork_handler, create_artwork_handler, health_handler, list_artworks_handler,
    object_handler, upload_url_handler, AppState,
};
use crate::objects::{ObjectBackend, ObjectGateway};
use crate::submission::SubmissionStore;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Directory served under `/assets`
    pub assets_dir: PathBuf,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Cache-Control max-age in seconds for served objects
    pub cache_max_age: u32,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration serving assets from `assets_dir`.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Cache max-age is 1 hour (3600 seconds)
    /// - Tracing is enabled
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            cors_origins: None,
            cache_max_age: 3600,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the Cache-Control max-age in seconds.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// The submission store and object gateway are injected here and shared by
/// every handler through [`AppState`].
pub fn create_router<S, B>(submissions: S, objects: ObjectGateway<B>, config: RouterConfig) -> Router
where
    S: SubmissionStore + 'static,
    B: ObjectBackend + 'static,
{
    let app_state =
        AppState::new(submissions, objects).with_cache_max_age(config.cache_max_age);

    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/artworks",
            get(list_artworks_handler::<S, B>).post(create_artwork_handler::<S, B>),
        )
        .route(
            "/api/artworks/{id}/approve",
            patch(approve_artwork_handler::<S, B>),
        )
        .route("/api/objects/upload", post(upload_url_handler::<S, B>))
        .route("/objects/{*object_path}", get(object_handler::<S, B>))
        .nest_service("/assets", ServeDir::new(&config.assets_dir))
        .with_state(app_state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
