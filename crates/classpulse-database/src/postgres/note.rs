//! Note session repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use classpulse_core::error::{AppError, ErrorKind};
use classpulse_core::result::AppResult;
use classpulse_core::types::pagination::{PageRequest, PageResponse};
use classpulse_entity::note::{NewNoteSession, NoteSession};

use crate::repositories::NoteSessionRepository;

/// PostgreSQL-backed note session repository.
#[derive(Debug, Clone)]
pub struct PgNoteSessionRepository {
    pool: PgPool,
}

impl PgNoteSessionRepository {
    /// Create a new note session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteSessionRepository for PgNoteSessionRepository {
    async fn create(&self, new: &NewNoteSession) -> AppResult<NoteSession> {
        sqlx::query_as::<_, NoteSession>(
            "INSERT INTO note_sessions (title, content, created_by, subject, department_id, \
             is_active_session, is_active) \
             VALUES ($1, $2, $3, $4, $5, TRUE, TRUE) RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.content)
        .bind(new.created_by)
        .bind(&new.subject)
        .bind(new.department_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create note session", e))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<NoteSession>> {
        sqlx::query_as::<_, NoteSession>("SELECT * FROM note_sessions WHERE id = $1 AND is_active")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find note session", e)
            })
    }

    async fn update_status(
        &self,
        id: i64,
        is_active_session: bool,
        ends_at: Option<DateTime<Utc>>,
    ) -> AppResult<NoteSession> {
        sqlx::query_as::<_, NoteSession>(
            "UPDATE note_sessions SET is_active_session = $2, ends_at = COALESCE($3, ends_at) \
             WHERE id = $1 AND is_active RETURNING *",
        )
        .bind(id)
        .bind(is_active_session)
        .bind(ends_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update session status", e)
        })
    }

    async fn soft_delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE note_sessions SET is_active = FALSE, is_active_session = FALSE \
             WHERE id = $1 AND is_active",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete session", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_active(
        &self,
        subject: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<NoteSession>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM note_sessions WHERE is_active \
             AND ($1::TEXT IS NULL OR subject = $1)",
        )
        .bind(subject)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count sessions", e))?;

        let sessions = sqlx::query_as::<_, NoteSession>(
            "SELECT * FROM note_sessions WHERE is_active \
             AND ($1::TEXT IS NULL OR subject = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(subject)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sessions", e))?;

        Ok(PageResponse::new(
            sessions,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
