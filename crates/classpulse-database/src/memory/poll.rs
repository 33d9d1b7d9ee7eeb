//! In-memory poll repository.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use classpulse_core::result::AppResult;
use classpulse_core::types::pagination::{PageRequest, PageResponse};
use classpulse_entity::poll::{NewPoll, Poll};

use crate::repositories::PollRepository;

/// In-memory poll store.
#[derive(Debug, Default)]
pub struct MemoryPollRepository {
    polls: DashMap<i64, Poll>,
    next_id: AtomicI64,
}

impl MemoryPollRepository {
    /// Create an empty poll store.
    pub fn new() -> Self {
        Self {
            polls: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl PollRepository for MemoryPollRepository {
    async fn create(&self, new: &NewPoll) -> AppResult<Poll> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let poll = Poll {
            id,
            title: new.title.clone(),
            question: new.question.clone(),
            options: new.options.clone(),
            created_by: new.created_by,
            subject: new.subject.clone(),
            department_id: new.department_id,
            content_id: new.content_id,
            tags: new.tags.clone(),
            timer_duration_seconds: new.timer_duration_seconds,
            expires_at: new.expires_at,
            is_active: true,
            created_at: Utc::now(),
        };
        self.polls.insert(id, poll.clone());
        Ok(poll)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Poll>> {
        Ok(self.polls.get(&id).map(|entry| entry.value().clone()))
    }

    async fn set_inactive(&self, id: i64) -> AppResult<bool> {
        if let Some(mut poll) = self.polls.get_mut(&id) {
            if poll.is_active {
                poll.is_active = false;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn find_active(
        &self,
        subject: Option<&str>,
        department_id: Option<i64>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Poll>> {
        let mut polls: Vec<Poll> = self
            .polls
            .iter()
            .filter(|entry| {
                let p = entry.value();
                p.is_active
                    && subject.is_none_or(|s| p.subject == s)
                    && department_id.is_none_or(|d| p.department_id == Some(d))
            })
            .map(|entry| entry.value().clone())
            .collect();
        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = polls.len() as u64;
        let items = polls
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_poll() -> NewPoll {
        NewPoll {
            title: "Quick check".into(),
            question: "Which law applies?".into(),
            options: vec![
                classpulse_entity::poll::PollOption {
                    index: 0,
                    text: "Ohm".into(),
                },
                classpulse_entity::poll::PollOption {
                    index: 1,
                    text: "Newton".into(),
                },
            ],
            created_by: 1,
            subject: "Physics".into(),
            department_id: Some(5),
            content_id: None,
            tags: vec!["physics".into()],
            timer_duration_seconds: 30,
            expires_at: Utc::now() + Duration::seconds(30),
        }
    }

    #[tokio::test]
    async fn test_set_inactive_is_exactly_once() {
        let repo = MemoryPollRepository::new();
        let poll = repo.create(&sample_poll()).await.unwrap();

        assert!(repo.set_inactive(poll.id).await.unwrap());
        assert!(!repo.set_inactive(poll.id).await.unwrap());
        assert!(!repo.find_by_id(poll.id).await.unwrap().unwrap().is_active);
    }

    #[tokio::test]
    async fn test_find_active_filters_department() {
        let repo = MemoryPollRepository::new();
        repo.create(&sample_poll()).await.unwrap();
        let mut other = sample_poll();
        other.department_id = Some(7);
        repo.create(&other).await.unwrap();

        let page = repo
            .find_active(None, Some(5), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].department_id, Some(5));
    }
}
