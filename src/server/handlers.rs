//! HTTP request handlers for the gallery API.
//!
//! # Endpoints
//!
//! - `GET /api/artworks` - List approved artworks
//! - `POST /api/artworks` - Submit an artwork for review
//! - `PATCH /api/artworks/{id}/approve` - Approve a submission
//! - `POST /api/objects/upload` - Issue a presigned upload URL
//! - `GET /objects/{*object_path}` - Serve an approved image
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, OriginalUri, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{StorageError, StoreError, ValidationError};
use crate::objects::{ObjectBackend, ObjectGateway};
use crate::submission::{ArtworkSubmission, SubmissionFilter, SubmissionInput, SubmissionStore};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state passed to all handlers via Axum's State extractor.
pub struct AppState<S: SubmissionStore, B: ObjectBackend> {
    /// Submission persistence
    pub submissions: Arc<S>,

    /// Object storage gateway
    pub objects: Arc<ObjectGateway<B>>,

    /// Validation/moderation rules for new submissions
    pub filter: Arc<SubmissionFilter>,

    /// Cache-Control max-age for served objects, in seconds
    pub cache_max_age: u32,
}

impl<S: SubmissionStore, B: ObjectBackend> AppState<S, B> {
    /// Create application state.
    ///
    /// The submission filter requires image URLs inside the gateway's private
    /// uploads directory.
    pub fn new(submissions: S, objects: ObjectGateway<B>) -> Self {
        let filter = SubmissionFilter::for_private_dir(objects.private_dir());
        Self {
            submissions: Arc::new(submissions),
            objects: Arc::new(objects),
            filter: Arc::new(filter),
            cache_max_age: 3600,
        }
    }

    /// Set the Cache-Control max-age for served objects.
    pub fn with_cache_max_age(mut self, cache_max_age: u32) -> Self {
        self.cache_max_age = cache_max_age;
        self
    }
}

impl<S: SubmissionStore, B: ObjectBackend> Clone for AppState<S, B> {
    fn clone(&self) -> Self {
        Self {
            submissions: Arc::clone(&self.submissions),
            objects: Arc::clone(&self.objects),
            filter: Arc::clone(&self.filter),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "validation_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Response to a successful submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionCreatedResponse {
    pub message: String,
    pub id: Uuid,
}

/// Response carrying a presigned upload URL.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadUrlResponse {
    #[serde(rename = "uploadURL")]
    pub upload_url: String,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Message used for every object 404, approved or not.
const OBJECT_UNAVAILABLE_MESSAGE: &str = "Image not found or not approved";

/// Errors returned by the API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Submission rejected by the validation/moderation filter
    Validation(ValidationError),

    /// Request body was not a valid submission payload
    InvalidBody(String),

    /// No submission with the requested id
    SubmissionNotFound,

    /// Object missing, or not linked to an approved submission
    ObjectUnavailable,

    /// Submission store failure; `context` is the only text sent to the client
    Store {
        context: &'static str,
        source: StoreError,
    },

    /// Object store failure; `context` is the only text sent to the client
    Storage {
        context: &'static str,
        source: StorageError,
    },
}

impl ApiError {
    fn store(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| ApiError::Store { context, source }
    }

    fn storage(context: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| ApiError::Storage { context, source }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

/// Convert ApiError to HTTP response.
///
/// - 4xx errors are logged at WARN level (404s at DEBUG)
/// - 5xx errors are logged at ERROR level with the underlying cause, while the
///   client only sees a generic message
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                err.error_type(),
                err.to_string(),
            ),

            ApiError::InvalidBody(reason) => {
                debug!("Rejected request body: {}", reason);
                (
                    StatusCode::BAD_REQUEST,
                    "invalid_request",
                    "Invalid artwork data".to_string(),
                )
            }

            ApiError::SubmissionNotFound => (
                StatusCode::NOT_FOUND,
                "not_found",
                "Artwork not found".to_string(),
            ),

            ApiError::ObjectUnavailable => (
                StatusCode::NOT_FOUND,
                "not_found",
                OBJECT_UNAVAILABLE_MESSAGE.to_string(),
            ),

            ApiError::Store { context, source } => {
                error!(error = %source, "{}", context);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    context.to_string(),
                )
            }

            ApiError::Storage { context, source } => {
                error!(error = %source, "{}", context);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    context.to_string(),
                )
            }
        };

        if status == StatusCode::NOT_FOUND {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                message
            );
        } else if status.is_client_error() {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle public gallery listing.
///
/// # Endpoint
///
/// `GET /api/artworks`
///
/// # Response
///
/// `200 OK` with the approved submissions, oldest first. Pending submissions
/// are never included.
pub async fn list_artworks_handler<S: SubmissionStore, B: ObjectBackend>(
    State(state): State<AppState<S, B>>,
) -> Result<Json<Vec<ArtworkSubmission>>, ApiError> {
    let artworks = state
        .submissions
        .list_approved()
        .await
        .map_err(ApiError::store("Failed to fetch artworks"))?;

    Ok(Json(artworks))
}

/// Handle artwork submissions.
///
/// # Endpoint
///
/// `POST /api/artworks` with `{"title", "artist", "imageUrl"}`
///
/// # Response
///
/// - `201 Created`: `{"message", "id"}`, the record awaits approval
/// - `400 Bad Request`: malformed body, validation, path convention or
///   community-guidelines failure (nothing is persisted)
/// - `500 Internal Server Error`: storage failure
pub async fn create_artwork_handler<S: SubmissionStore, B: ObjectBackend>(
    State(state): State<AppState<S, B>>,
    payload: Result<Json<SubmissionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionCreatedResponse>), ApiError> {
    let Json(input) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;

    let mut submission = state.filter.check(&input)?;
    submission.image_url = state
        .objects
        .canonical_upload_url(&submission.image_url)
        .ok_or(ValidationError::InvalidImagePath)?;

    let artwork = state
        .submissions
        .create(submission)
        .await
        .map_err(ApiError::store("Failed to submit artwork"))?;

    info!(id = %artwork.id, "Artwork submitted for review");

    Ok((
        StatusCode::CREATED,
        Json(SubmissionCreatedResponse {
            message: "Artwork submitted for review".to_string(),
            id: artwork.id,
        }),
    ))
}

/// Handle approval of a submission.
///
/// # Endpoint
///
/// `PATCH /api/artworks/{id}/approve`
///
/// # Response
///
/// - `200 OK`: `{"message"}`
/// - `404 Not Found`: id is not a UUID or matches no submission
/// - `500 Internal Server Error`: storage failure
pub async fn approve_artwork_handler<S: SubmissionStore, B: ObjectBackend>(
    State(state): State<AppState<S, B>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::SubmissionNotFound)?;

    let approved = state
        .submissions
        .approve(id)
        .await
        .map_err(ApiError::store("Failed to approve artwork"))?;

    if !approved {
        return Err(ApiError::SubmissionNotFound);
    }

    info!(id = %id, "Artwork approved");

    Ok(Json(MessageResponse {
        message: "Artwork approved".to_string(),
    }))
}

/// Handle upload URL requests.
///
/// # Endpoint
///
/// `POST /api/objects/upload`
///
/// # Response
///
/// `200 OK` with `{"uploadURL"}`, a presigned PUT into the private uploads
/// namespace.
pub async fn upload_url_handler<S: SubmissionStore, B: ObjectBackend>(
    State(state): State<AppState<S, B>>,
) -> Result<Json<UploadUrlResponse>, ApiError> {
    let upload_url = state
        .objects
        .get_upload_url()
        .await
        .map_err(ApiError::storage("Failed to get upload URL"))?;

    Ok(Json(UploadUrlResponse { upload_url }))
}

/// Serve a stored object if, and only if, it belongs to an approved submission.
///
/// # Endpoint
///
/// `GET /objects/{*object_path}`
///
/// # Response
///
/// - `200 OK`: object bytes with hardening headers
/// - `404 Not Found`: object missing, unlinked or unapproved (one response
///   for all three)
/// - `500 Internal Server Error`: storage or database failure
///
/// # Headers
///
/// - `Content-Type` from the object metadata
/// - `Cache-Control: private, max-age={cache_max_age}`
/// - `X-Content-Type-Options: nosniff`
/// - `X-Frame-Options: DENY`
/// - `Content-Security-Policy: default-src 'none'`
pub async fn object_handler<S: SubmissionStore, B: ObjectBackend>(
    State(state): State<AppState<S, B>>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, ApiError> {
    let request_path = uri.path();

    let handle = match state.objects.resolve_entity(request_path).await {
        Ok(handle) => handle,
        Err(StorageError::NotFound(_)) => return Err(ApiError::ObjectUnavailable),
        Err(e) => return Err(ApiError::storage("Internal server error")(e)),
    };

    let canonical = state.objects.normalize_path(request_path);
    let submission = state
        .submissions
        .find_by_image_url(&canonical)
        .await
        .map_err(ApiError::store("Internal server error"))?;

    match submission {
        Some(artwork) if artwork.is_approved => {}
        _ => return Err(ApiError::ObjectUnavailable),
    }

    let object = state
        .objects
        .stream(&handle)
        .await
        .map_err(ApiError::storage("Internal server error"))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&object.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    if let Some(len) = object.content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_str(&format!("private, max-age={}", state.cache_max_age))
            .unwrap_or_else(|_| HeaderValue::from_static("private")),
    );
    apply_security_headers(&mut headers);

    Ok((StatusCode::OK, headers, Body::from_stream(object.body)).into_response())
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn apply_security_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'"),
    );
}

// =============================================================================
// Tests
// =============================================================================
