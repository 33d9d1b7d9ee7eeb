//! Course content repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use classpulse_core::error::{AppError, ErrorKind};
use classpulse_core::result::AppResult;
use classpulse_entity::content::ContentSummary;

use crate::repositories::ContentRepository;

/// PostgreSQL-backed content repository.
#[derive(Debug, Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    /// Create a new content repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn find_by_tag_overlap(
        &self,
        tags: &[String],
        limit: i64,
    ) -> AppResult<Vec<ContentSummary>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, ContentSummary>(
            "SELECT * FROM contents WHERE tags && $1 ORDER BY id LIMIT $2",
        )
        .bind(tags)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search contents", e))
    }
}
