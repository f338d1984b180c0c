//! Postgres-backed submission store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;
use uuid::Uuid;

use super::{ArtworkSubmission, NewSubmission, SubmissionStore};
use crate::error::StoreError;

/// Column list for artwork_submissions queries.
const SUBMISSION_COLUMNS: &str = "id, title, artist, image_url, is_approved, created_at";

/// Open a connection pool to the submissions database.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// [`SubmissionStore`] over an `artwork_submissions` Postgres table.
#[derive(Debug, Clone)]
pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and return a store.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        Ok(Self::new(connect_pool(database_url, max_connections).await?))
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn list_approved(&self) -> Result<Vec<ArtworkSubmission>, StoreError> {
        let query = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM artwork_submissions
             WHERE is_approved = TRUE
             ORDER BY created_at ASC"
        );
        let rows = sqlx::query_as::<_, ArtworkSubmission>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_all(&self) -> Result<Vec<ArtworkSubmission>, StoreError> {
        let query = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM artwork_submissions
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, ArtworkSubmission>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, submission: NewSubmission) -> Result<ArtworkSubmission, StoreError> {
        let query = format!(
            "INSERT INTO artwork_submissions (title, artist, image_url)
             VALUES ($1, $2, $3)
             RETURNING {SUBMISSION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ArtworkSubmission>(&query)
            .bind(&submission.title)
            .bind(&submission.artist)
            .bind(&submission.image_url)
            .fetch_one(&self.pool)
            .await?;

        info!(id = %row.id, "Artwork submission created");
        Ok(row)
    }

    async fn approve(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE artwork_submissions SET is_approved = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_image_url(
        &self,
        image_url: &str,
    ) -> Result<Option<ArtworkSubmission>, StoreError> {
        let query = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM artwork_submissions
             WHERE image_url = $1
             ORDER BY is_approved DESC, created_at ASC
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, ArtworkSubmission>(&query)
            .bind(image_url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
