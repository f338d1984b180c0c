use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;

use super::{ObjectBackend, ObjectMeta, ObjectReader};
use crate::error::StorageError;

/// S3-backed implementation of [`ObjectBackend`].
///
/// Works against AWS S3 or any S3-compatible service (MinIO, R2, etc.).
#[derive(Clone)]
pub struct S3ObjectBackend {
    client: Client,
    bucket: String,
}

impl S3ObjectBackend {
    /// Create a backend for the given bucket.
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn location(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

impl std::fmt::Debug for S3ObjectBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectBackend")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ObjectBackend for S3ObjectBackend {
    async fn presign_put(&self, key: &str, ttl: Duration) -> Result<String, StorageError> {
        let presigning =
            PresigningConfig::expires_in(ttl).map_err(|e| StorageError::Presign(e.to_string()))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        Ok(request.uri().to_string())
    }

    async fn head(&self, key: &str) -> Result<ObjectMeta, StorageError> {
        let head = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let is_not_found = e
                    .as_service_error()
                    .map(|se| se.is_not_found())
                    .unwrap_or(false);

                // Some S3-compatible services return a bare 404 without a modeled error
                let status_is_404 = e
                    .raw_response()
                    .map(|r| r.status().as_u16() == 404)
                    .unwrap_or(false);

                if is_not_found || status_is_404 {
                    return StorageError::NotFound(self.location(key));
                }

                StorageError::S3(e.to_string())
            })?;

        Ok(ObjectMeta {
            size: head.content_length().and_then(|len| u64::try_from(len).ok()),
            content_type: head.content_type().map(str::to_string),
        })
    }

    async fn open(&self, key: &str) -> Result<ObjectReader, StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let is_no_such_key = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false);

                if is_no_such_key {
                    return StorageError::NotFound(self.location(key));
                }

                StorageError::S3(e.to_string())
            })?;

        Ok(Box::pin(resp.body.into_async_read()))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}

/// Create an S3 client with optional custom endpoint and region.
///
/// Use a custom endpoint for S3-compatible services like MinIO:
/// ```ignore
/// let client = create_s3_client(Some("http://localhost:9000"), "us-east-1").await;
/// ```
pub async fn create_s3_client(endpoint_url: Option<&str>, region: &str) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let mut config_loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;

    // S3-compatible services usually need path-style addressing
    let s3_config = if endpoint_url.is_some() {
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build()
    } else {
        aws_sdk_s3::config::Builder::from(&sdk_config).build()
    };

    Client::from_conf(s3_config)
}
