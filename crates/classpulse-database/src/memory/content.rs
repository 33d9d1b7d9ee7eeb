//! In-memory course content repository.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use classpulse_core::result::AppResult;
use classpulse_entity::content::ContentSummary;

use crate::repositories::ContentRepository;

/// In-memory content store.
#[derive(Debug, Default)]
pub struct MemoryContentRepository {
    contents: DashMap<i64, ContentSummary>,
    next_id: AtomicI64,
}

impl MemoryContentRepository {
    /// Create an empty content store.
    pub fn new() -> Self {
        Self {
            contents: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Seed a content item (development and tests).
    pub fn insert(&self, title: &str, subject: &str, tags: Vec<String>) -> ContentSummary {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let summary = ContentSummary {
            id,
            title: title.to_string(),
            subject: subject.to_string(),
            tags,
        };
        self.contents.insert(id, summary.clone());
        summary
    }
}

#[async_trait]
impl ContentRepository for MemoryContentRepository {
    async fn find_by_tag_overlap(
        &self,
        tags: &[String],
        limit: i64,
    ) -> AppResult<Vec<ContentSummary>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches: Vec<ContentSummary> = self
            .contents
            .iter()
            .filter(|entry| entry.value().tags.iter().any(|t| tags.contains(t)))
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|c| c.id);
        matches.truncate(limit.max(0) as usize);
        Ok(matches)
    }
}
