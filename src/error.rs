use thiserror::Error;

/// Errors that can occur when talking to the object store
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Object not found (or the request path does not address an object)
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Error from S3 or S3-compatible storage
    #[error("S3 error: {0}")]
    S3(String),

    /// Network or connection error while streaming
    #[error("Connection error: {0}")]
    Connection(String),

    /// Failed to issue a presigned upload URL
    #[error("Presign error: {0}")]
    Presign(String),
}

/// Errors raised by the submission store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure at startup
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Rejections produced while validating and moderating a submission.
///
/// Every variant maps to HTTP 400 and its message is shown to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Title must be under {max} characters")]
    TitleTooLong { max: usize },

    #[error("Artist name is required")]
    ArtistRequired,

    #[error("Artist name must be under {max} characters")]
    ArtistTooLong { max: usize },

    #[error("Must be a valid URL")]
    InvalidUrl,

    /// URL does not point into the private uploads namespace
    #[error("Invalid image URL")]
    InvalidImagePath,

    /// Title or artist matched the keyword denylist
    #[error("Content violates community guidelines. No nudity or sexually explicit content allowed.")]
    CommunityGuidelines,
}

impl ValidationError {
    /// Stable identifier used as the `error` field of the JSON body.
    pub fn error_type(&self) -> &'static str {
        match self {
            ValidationError::TitleRequired
            | ValidationError::TitleTooLong { .. }
            | ValidationError::ArtistRequired
            | ValidationError::ArtistTooLong { .. }
            | ValidationError::InvalidUrl => "validation_error",
            ValidationError::InvalidImagePath => "invalid_image_url",
            ValidationError::CommunityGuidelines => "community_guidelines",
        }
    }
}
