//! In-memory note session repository.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use classpulse_core::error::AppError;
use classpulse_core::result::AppResult;
use classpulse_core::types::pagination::{PageRequest, PageResponse};
use classpulse_entity::note::{NewNoteSession, NoteSession};

use crate::repositories::NoteSessionRepository;

/// In-memory note session store.
#[derive(Debug, Default)]
pub struct MemoryNoteSessionRepository {
    sessions: DashMap<i64, NoteSession>,
    next_id: AtomicI64,
}

impl MemoryNoteSessionRepository {
    /// Create an empty session store.
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl NoteSessionRepository for MemoryNoteSessionRepository {
    async fn create(&self, new: &NewNoteSession) -> AppResult<NoteSession> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let session = NoteSession {
            id,
            title: new.title.clone(),
            content: new.content.clone(),
            created_by: new.created_by,
            subject: new.subject.clone(),
            department_id: new.department_id,
            is_active_session: true,
            ends_at: None,
            is_active: true,
            created_at: Utc::now(),
        };
        self.sessions.insert(id, session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<NoteSession>> {
        Ok(self
            .sessions
            .get(&id)
            .filter(|entry| entry.value().is_active)
            .map(|entry| entry.value().clone()))
    }

    async fn update_status(
        &self,
        id: i64,
        is_active_session: bool,
        ends_at: Option<DateTime<Utc>>,
    ) -> AppResult<NoteSession> {
        let mut entry = self
            .sessions
            .get_mut(&id)
            .filter(|entry| entry.value().is_active)
            .ok_or_else(|| AppError::not_found(format!("Note session {id} not found")))?;

        entry.is_active_session = is_active_session;
        if let Some(at) = ends_at {
            entry.ends_at = Some(at);
        }
        Ok(entry.clone())
    }

    async fn soft_delete(&self, id: i64) -> AppResult<bool> {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            if session.is_active {
                session.is_active = false;
                session.is_active_session = false;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn find_active(
        &self,
        subject: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<NoteSession>> {
        let mut sessions: Vec<NoteSession> = self
            .sessions
            .iter()
            .filter(|entry| {
                let s = entry.value();
                s.is_active && subject.is_none_or(|sub| s.subject == sub)
            })
            .map(|entry| entry.value().clone())
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = sessions.len() as u64;
        let items = sessions
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

    fn sample_session() -> NewNoteSession {
        NewNoteSession {
            title: "Lecture notes".into(),
            content: "Chapter 4".into(),
            created_by: 9,
            subject: "Math".into(),
            department_id: None,
        }
    }

    #[tokio::test]
    async fn test_soft_delete_hides_session() {
        let repo = MemoryNoteSessionRepository::new();
        let session = repo.create(&sample_session()).await.unwrap();

        assert!(repo.soft_delete(session.id).await.unwrap());
        assert!(repo.find_by_id(session.id).await.unwrap().is_none());
        assert!(!repo.soft_delete(session.id).await.unwrap());
    }
}
