//! Poll repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use classpulse_core::error::{AppError, ErrorKind};
use classpulse_core::result::AppResult;
use classpulse_core::types::pagination::{PageRequest, PageResponse};
use classpulse_entity::poll::{NewPoll, Poll};

use crate::repositories::PollRepository;

/// PostgreSQL-backed poll repository.
#[derive(Debug, Clone)]
pub struct PgPollRepository {
    pool: PgPool,
}

impl PgPollRepository {
    /// Create a new poll repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PollRepository for PgPollRepository {
    async fn create(&self, new: &NewPoll) -> AppResult<Poll> {
        let options = serde_json::to_value(&new.options)
            .map_err(|e| AppError::with_source(ErrorKind::Serialization, "Bad poll options", e))?;

        sqlx::query_as::<_, Poll>(
            "INSERT INTO polls (title, question, options, created_by, subject, department_id, \
             content_id, tags, timer_duration_seconds, expires_at, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, TRUE) RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.question)
        .bind(options)
        .bind(new.created_by)
        .bind(&new.subject)
        .bind(new.department_id)
        .bind(new.content_id)
        .bind(&new.tags)
        .bind(new.timer_duration_seconds)
        .bind(new.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create poll", e))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Poll>> {
        sqlx::query_as::<_, Poll>("SELECT * FROM polls WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find poll", e))
    }

    async fn set_inactive(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("UPDATE polls SET is_active = FALSE WHERE id = $1 AND is_active")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to close poll", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_active(
        &self,
        subject: Option<&str>,
        department_id: Option<i64>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Poll>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM polls WHERE is_active \
             AND ($1::TEXT IS NULL OR subject = $1) \
             AND ($2::BIGINT IS NULL OR department_id = $2)",
        )
        .bind(subject)
        .bind(department_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count polls", e))?;

        let polls = sqlx::query_as::<_, Poll>(
            "SELECT * FROM polls WHERE is_active \
             AND ($1::TEXT IS NULL OR subject = $1) \
             AND ($2::BIGINT IS NULL OR department_id = $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(subject)
        .bind(department_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list polls", e))?;

        Ok(PageResponse::new(
            polls,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
