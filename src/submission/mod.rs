//! Artwork submissions and their moderation workflow.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └──────────┬──────────────────┬───────────┘
//!            │                  │
//!            ▼                  ▼
//! ┌────────────────────┐  ┌─────────────────────┐
//! │  SubmissionFilter  │  │  SubmissionStore    │
//! │  (shape, path,     │─▶│  (create, list,     │
//! │   denylist, trim)  │  │   approve, lookup)  │
//! └────────────────────┘  └──────────┬──────────┘
//!                                    │
//!                                    ▼
//!                         ┌─────────────────────┐
//!                         │  PgSubmissionStore  │
//!                         └─────────────────────┘
//! ```
//!
//! Records enter the store with `is_approved = false`. The only transition is
//! an explicit [`SubmissionStore::approve`] call; nothing is ever deleted.

mod filter;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

pub use filter::{
    SubmissionFilter, DEFAULT_UPLOAD_SEGMENT, DENYLISTED_KEYWORDS, MAX_ARTIST_LEN, MAX_TITLE_LEN,
};
pub use postgres::{connect_pool, PgSubmissionStore};

// =============================================================================
// Types
// =============================================================================

/// A persisted artwork submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkSubmission {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    /// Canonical object URL inside the private uploads namespace
    pub image_url: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Raw fields as submitted by a client, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    pub title: String,
    pub artist: String,
    pub image_url: String,
}

/// Sanitized fields ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub title: String,
    pub artist: String,
    pub image_url: String,
}

// =============================================================================
// SubmissionStore Trait
// =============================================================================

/// Persistence for artwork submissions.
///
/// Implementations must keep `id` and `created_at` server-generated and must
/// create every record unapproved.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Approved submissions, oldest first.
    async fn list_approved(&self) -> Result<Vec<ArtworkSubmission>, StoreError>;

    /// Every submission, newest first.
    async fn list_all(&self) -> Result<Vec<ArtworkSubmission>, StoreError>;

    /// Persist a new, unapproved submission.
    async fn create(&self, submission: NewSubmission) -> Result<ArtworkSubmission, StoreError>;

    /// Mark a submission approved.
    ///
    /// Returns `false` when no submission has the given id.
    async fn approve(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Find the submission linked to a canonical object URL.
    async fn find_by_image_url(
        &self,
        image_url: &str,
    ) -> Result<Option<ArtworkSubmission>, StoreError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
