//! Object storage layer.
//!
//! Uploaded images never pass through this server: clients PUT them directly
//! to a presigned URL inside the private uploads namespace. This module issues
//! those URLs and, on the read side, maps `/objects/...` request paths back to
//! stored objects and streams their bytes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │             ObjectGateway               │
//! │  (upload URLs, path normalization,      │
//! │   resolve, stream)                      │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          ObjectBackend Trait            │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//!             ┌─────────────────┐
//!             │ S3ObjectBackend │
//!             └─────────────────┘
//! ```

mod gateway;
mod s3;

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use tokio::io::AsyncRead;

use crate::error::StorageError;

pub use gateway::{ObjectGateway, DEFAULT_PRIVATE_DIR, DEFAULT_UPLOAD_URL_TTL, OBJECTS_PREFIX};
pub use s3::{create_s3_client, S3ObjectBackend};

/// Readable object body returned by a backend.
pub type ObjectReader = Pin<Box<dyn AsyncRead + Send>>;

/// Chunked object bytes, ready to become an HTTP body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Metadata known about a stored object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Size in bytes, if reported by the backend
    pub size: Option<u64>,

    /// MIME type recorded at upload time
    pub content_type: Option<String>,
}

/// A resolved, existing object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHandle {
    /// Object key within the bucket
    pub key: String,

    /// Metadata captured while resolving
    pub meta: ObjectMeta,
}

/// An open object stream plus the headers needed to serve it.
pub struct ObjectStream {
    pub content_type: String,
    pub content_length: Option<u64>,
    pub body: ByteStream,
}

impl std::fmt::Debug for ObjectStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStream")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Trait for the raw operations the gateway needs from an object store.
///
/// This abstraction allows the gateway to work with different storage backends
/// (S3, in-memory test doubles, etc.) without being tied to a specific client.
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    /// Issue a URL that allows a single PUT of `key` until `ttl` elapses.
    async fn presign_put(&self, key: &str, ttl: Duration) -> Result<String, StorageError>;

    /// Fetch metadata for `key`, or `StorageError::NotFound`.
    async fn head(&self, key: &str) -> Result<ObjectMeta, StorageError>;

    /// Open `key` for reading.
    async fn open(&self, key: &str) -> Result<ObjectReader, StorageError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
