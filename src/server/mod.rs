//! HTTP server layer for the gallery.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │      /api/artworks   /api/objects/upload   /objects/{*path}     │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌──────────────────────────────┐ │
//! │  │        handlers          │  │           routes             │ │
//! │  │ (requests, access gate)  │  │  (router config, CORS)       │ │
//! │  └──────────────────────────┘  └──────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    approve_artwork_handler, create_artwork_handler, health_handler, list_artworks_handler,
    object_handler, upload_url_handler, ApiError, AppState, ErrorResponse, HealthResponse,
    MessageResponse, SubmissionCreatedResponse, UploadUrlResponse,
};
pub use routes::{create_router, RouterConfig};
