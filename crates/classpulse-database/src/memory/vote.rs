//! In-memory vote repository.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use classpulse_core::result::AppResult;
use classpulse_entity::poll::Vote;

use crate::repositories::VoteRepository;

/// In-memory vote store keyed by `(poll_id, user_id)`.
#[derive(Debug, Default)]
pub struct MemoryVoteRepository {
    votes: DashMap<(i64, i64), Vote>,
    next_id: AtomicI64,
}

impl MemoryVoteRepository {
    /// Create an empty vote store.
    pub fn new() -> Self {
        Self {
            votes: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl VoteRepository for MemoryVoteRepository {
    async fn upsert(&self, poll_id: i64, user_id: i64, option_index: i32) -> AppResult<Vote> {
        let mut entry = self.votes.entry((poll_id, user_id)).or_insert_with(|| Vote {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            poll_id,
            user_id,
            option_index,
            voted_at: Utc::now(),
        });
        entry.option_index = option_index;
        entry.voted_at = Utc::now();
        Ok(entry.clone())
    }

    async fn find_by_poll(&self, poll_id: i64) -> AppResult<Vec<Vote>> {
        let mut votes: Vec<Vote> = self
            .votes
            .iter()
            .filter(|entry| entry.value().poll_id == poll_id)
            .map(|entry| entry.value().clone())
            .collect();
        votes.sort_by(|a, b| a.voted_at.cmp(&b.voted_at).then(a.id.cmp(&b.id)));
        Ok(votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_overwrites_previous_choice() {
        let repo = MemoryVoteRepository::new();

        let first = repo.upsert(1, 42, 0).await.unwrap();
        let second = repo.upsert(1, 42, 1).await.unwrap();

        assert_eq!(first.id, second.id);
        let votes = repo.find_by_poll(1).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].option_index, 1);
    }
}
