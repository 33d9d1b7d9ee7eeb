//! Contribution repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use classpulse_core::error::{AppError, ErrorKind};
use classpulse_core::result::AppResult;
use classpulse_core::types::pagination::{PageRequest, PageResponse};
use classpulse_entity::note::{Contribution, NewContribution};

use crate::repositories::ContributionRepository;

/// PostgreSQL-backed contribution repository.
#[derive(Debug, Clone)]
pub struct PgContributionRepository {
    pool: PgPool,
}

impl PgContributionRepository {
    /// Create a new contribution repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContributionRepository for PgContributionRepository {
    async fn create(&self, new: &NewContribution) -> AppResult<Contribution> {
        sqlx::query_as::<_, Contribution>(
            "INSERT INTO contributions (note_id, user_id, content, content_type, tags) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(new.note_id)
        .bind(new.user_id)
        .bind(&new.content)
        .bind(new.content_type)
        .bind(&new.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create contribution", e))
    }

    async fn find_by_note(
        &self,
        note_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Contribution>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM contributions WHERE note_id = $1")
                .bind(note_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count contributions", e)
                })?;

        let contributions = sqlx::query_as::<_, Contribution>(
            "SELECT * FROM contributions WHERE note_id = $1 \
             ORDER BY contributed_at LIMIT $2 OFFSET $3",
        )
        .bind(note_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list contributions", e))?;

        Ok(PageResponse::new(
            contributions,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
