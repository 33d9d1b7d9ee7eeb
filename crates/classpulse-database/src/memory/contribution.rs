//! In-memory contribution repository.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use classpulse_core::result::AppResult;
use classpulse_core::types::pagination::{PageRequest, PageResponse};
use classpulse_entity::note::{Contribution, NewContribution};

use crate::repositories::ContributionRepository;

/// In-memory contribution store.
#[derive(Debug, Default)]
pub struct MemoryContributionRepository {
    contributions: DashMap<i64, Contribution>,
    next_id: AtomicI64,
}

impl MemoryContributionRepository {
    /// Create an empty contribution store.
    pub fn new() -> Self {
        Self {
            contributions: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl ContributionRepository for MemoryContributionRepository {
    async fn create(&self, new: &NewContribution) -> AppResult<Contribution> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let contribution = Contribution {
            id,
            note_id: new.note_id,
            user_id: new.user_id,
            content: new.content.clone(),
            content_type: new.content_type,
            tags: new.tags.clone(),
            contributed_at: Utc::now(),
        };
        self.contributions.insert(id, contribution.clone());
        Ok(contribution)
    }

    async fn find_by_note(
        &self,
        note_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Contribution>> {
        let mut contributions: Vec<Contribution> = self
            .contributions
            .iter()
            .filter(|entry| entry.value().note_id == note_id)
            .map(|entry| entry.value().clone())
            .collect();
        contributions.sort_by(|a, b| a.contributed_at.cmp(&b.contributed_at).then(a.id.cmp(&b.id)));

        let total = contributions.len() as u64;
        let items = contributions
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }
}
