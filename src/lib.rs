//! # artwall
//!
//! Backend for a moderated community art gallery.
//!
//! Artists upload images straight to S3-compatible object storage through
//! presigned URLs, then submit the artwork's metadata. Submissions stay hidden
//! until a moderator approves them, and stored images are only ever served for
//! approved submissions.
//!
//! ## Features
//!
//! - **Moderated submissions**: shape validation, private-upload path check,
//!   keyword denylist and sanitization before anything is persisted
//! - **Direct uploads**: time-limited presigned PUT URLs into a private namespace
//! - **Gated serving**: images are streamed only when linked to an approved
//!   submission; anything else is an indistinguishable 404
//! - **Postgres storage**: sqlx with embedded migrations
//!
//! ## Architecture
//!
//! - [`submission`] - submission model, validation filter and stores
//! - [`objects`] - object storage gateway and S3 backend
//! - [`server`] - Axum handlers and router
//! - [`config`] - CLI and configuration types
//! - [`error`] - error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use artwall::{create_router, create_s3_client, ObjectGateway, PgSubmissionStore};
//! use artwall::{RouterConfig, S3ObjectBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PgSubmissionStore::connect("postgres://localhost/artwall", 5).await?;
//!     store.migrate().await?;
//!
//!     let client = create_s3_client(None, "us-east-1").await;
//!     let gateway = ObjectGateway::new(
//!         S3ObjectBackend::new(client, "gallery".to_string()),
//!         "https://gallery.s3.amazonaws.com",
//!     );
//!
//!     let router = create_router(store, gateway, RouterConfig::new("./attached_assets"));
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod objects;
pub mod server;
pub mod submission;

// Re-export commonly used types
pub use config::{ApproveConfig, CheckConfig, Cli, Command, ListConfig, ServeConfig};
pub use error::{StorageError, StoreError, ValidationError};
pub use objects::{
    create_s3_client, ObjectBackend, ObjectGateway, ObjectHandle, ObjectMeta, ObjectReader,
    ObjectStream, S3ObjectBackend,
};
pub use server::{create_router, ApiError, AppState, ErrorResponse, RouterConfig};
pub use submission::{
    ArtworkSubmission, NewSubmission, PgSubmissionStore, SubmissionFilter, SubmissionInput,
    SubmissionStore,
};
