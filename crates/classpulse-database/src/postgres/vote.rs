//! Vote repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use classpulse_core::error::{AppError, ErrorKind};
use classpulse_core::result::AppResult;
use classpulse_entity::poll::Vote;

use crate::repositories::VoteRepository;

/// PostgreSQL-backed vote repository.
#[derive(Debug, Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    /// Create a new vote repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    async fn upsert(&self, poll_id: i64, user_id: i64, option_index: i32) -> AppResult<Vote> {
        sqlx::query_as::<_, Vote>(
            "INSERT INTO votes (poll_id, user_id, option_index) VALUES ($1, $2, $3) \
             ON CONFLICT (poll_id, user_id) \
             DO UPDATE SET option_index = EXCLUDED.option_index, voted_at = NOW() \
             RETURNING *",
        )
        .bind(poll_id)
        .bind(user_id)
        .bind(option_index)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record vote", e))
    }

    async fn find_by_poll(&self, poll_id: i64) -> AppResult<Vec<Vote>> {
        sqlx::query_as::<_, Vote>("SELECT * FROM votes WHERE poll_id = $1 ORDER BY voted_at")
            .bind(poll_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list votes", e))
    }
}
