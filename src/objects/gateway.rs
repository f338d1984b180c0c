//! Object storage gateway.
//!
//! # Path Conventions
//!
//! Objects live under a private directory in the bucket. Uploads land at
//! `{private_dir}/uploads/{uuid}` and are addressed three ways:
//!
//! ```text
//! bucket key      .private/uploads/3f2a...
//! request path    /objects/uploads/3f2a...
//! canonical URL   {public_base_url}/.private/uploads/3f2a...
//! ```
//!
//! The canonical URL is what gets stored as a submission's `image_url`, and
//! [`ObjectGateway::normalize_path`] maps both request paths and raw object
//! URLs onto it so the approval lookup is an exact string match.

use std::time::Duration;

use futures::TryStreamExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, error};
use url::Url;
use uuid::Uuid;

use super::{ObjectBackend, ObjectHandle, ObjectStream};
use crate::error::StorageError;

/// Request path prefix for serving stored objects.
pub const OBJECTS_PREFIX: &str = "/objects/";

/// Default private directory inside the bucket.
pub const DEFAULT_PRIVATE_DIR: &str = ".private";

/// Default lifetime of presigned upload URLs (15 minutes).
pub const DEFAULT_UPLOAD_URL_TTL: Duration = Duration::from_secs(900);

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Issues upload URLs and resolves, normalizes and streams stored objects.
#[derive(Debug, Clone)]
pub struct ObjectGateway<B: ObjectBackend> {
    backend: B,
    public_base_url: String,
    private_dir: String,
    upload_ttl: Duration,
}

impl<B: ObjectBackend> ObjectGateway<B> {
    /// Create a gateway whose canonical object URLs start with `public_base_url`.
    pub fn new(backend: B, public_base_url: impl Into<String>) -> Self {
        Self {
            backend,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            private_dir: DEFAULT_PRIVATE_DIR.to_string(),
            upload_ttl: DEFAULT_UPLOAD_URL_TTL,
        }
    }

    /// Use a different private directory inside the bucket.
    pub fn with_private_dir(mut self, private_dir: impl AsRef<str>) -> Self {
        self.private_dir = private_dir.as_ref().trim_matches('/').to_string();
        self
    }

    /// Set how long presigned upload URLs stay valid.
    pub fn with_upload_ttl(mut self, ttl: Duration) -> Self {
        self.upload_ttl = ttl;
        self
    }

    /// The private directory inside the bucket.
    pub fn private_dir(&self) -> &str {
        &self.private_dir
    }

    /// Issue a presigned PUT URL for a fresh key in the private uploads namespace.
    pub async fn get_upload_url(&self) -> Result<String, StorageError> {
        let key = format!("{}/uploads/{}", self.private_dir, Uuid::new_v4());
        debug!(key = %key, ttl_secs = self.upload_ttl.as_secs(), "Issuing upload URL");
        self.backend.presign_put(&key, self.upload_ttl).await
    }

    /// Map an `/objects/...` request path to its bucket key.
    ///
    /// Paths outside `/objects/`, empty entities and `.`/`..` segments are
    /// treated as not found.
    pub fn entity_key(&self, request_path: &str) -> Result<String, StorageError> {
        let path = strip_query(request_path);
        let entity = path
            .strip_prefix(OBJECTS_PREFIX)
            .filter(|entity| !entity.is_empty())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))?;

        let decoded = urlencoding::decode(entity)
            .map_err(|_| StorageError::NotFound(path.to_string()))?;

        let has_bad_segment = decoded
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
        if has_bad_segment {
            return Err(StorageError::NotFound(path.to_string()));
        }

        Ok(format!("{}/{}", self.private_dir, decoded))
    }

    /// Find the stored object addressed by a request path.
    pub async fn resolve_entity(&self, request_path: &str) -> Result<ObjectHandle, StorageError> {
        let key = self.entity_key(request_path)?;
        let meta = self.backend.head(&key).await?;
        Ok(ObjectHandle { key, meta })
    }

    /// Canonicalize a request path or object URL.
    ///
    /// - `/objects/<entity>` becomes `{public_base_url}/{private_dir}/<entity>`
    /// - any URL whose path contains `/{private_dir}/` is rebased onto
    ///   `public_base_url` with its query and fragment dropped
    /// - anything else is returned without its query and fragment
    ///
    /// The result is idempotent: normalizing a canonical URL returns it unchanged.
    pub fn normalize_path(&self, path: &str) -> String {
        let path = strip_query(path.trim());

        if let Some(entity) = path.strip_prefix(OBJECTS_PREFIX) {
            return self.canonical_url(entity);
        }

        if let Ok(url) = Url::parse(path) {
            let marker = format!("/{}/", self.private_dir);
            if let Some(pos) = url.path().find(&marker) {
                let entity = &url.path()[pos + marker.len()..];
                return self.canonical_url(entity);
            }
        }

        path.to_string()
    }

    /// Canonicalize a submitted image URL, requiring it to address an object
    /// inside `{public_base_url}/{private_dir}/uploads/`.
    ///
    /// Returns `None` for anything else, including URLs that only mention the
    /// uploads directory in their query or fragment.
    pub fn canonical_upload_url(&self, image_url: &str) -> Option<String> {
        let canonical = self.normalize_path(image_url);
        let prefix = format!("{}/{}/uploads/", self.public_base_url, self.private_dir);

        let entity = canonical.strip_prefix(&prefix)?;
        let has_bad_segment = entity
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
        if has_bad_segment {
            return None;
        }

        Some(canonical)
    }

    /// Open a resolved object for streaming.
    ///
    /// Errors after the first byte surface as body errors, which aborts the
    /// response instead of ending it cleanly.
    pub async fn stream(&self, handle: &ObjectHandle) -> Result<ObjectStream, StorageError> {
        let reader = self.backend.open(&handle.key).await?;
        let key = handle.key.clone();

        let body = ReaderStream::new(reader).inspect_err(move |e| {
            error!(key = %key, "Object stream failed mid-transfer: {}", e);
        });

        Ok(ObjectStream {
            content_type: handle
                .meta
                .content_type
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            content_length: handle.meta.size,
            body: Box::pin(body),
        })
    }

    fn canonical_url(&self, entity: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.private_dir, entity)
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}
