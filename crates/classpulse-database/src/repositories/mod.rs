//! Repository contracts the service layer programs against.
//!
//! Each trait has a PostgreSQL implementation in [`crate::postgres`] and an
//! in-memory one in [`crate::memory`]. Entity ids are integers assigned by
//! the backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use classpulse_core::result::AppResult;
use classpulse_core::types::pagination::{PageRequest, PageResponse};
use classpulse_entity::content::ContentSummary;
use classpulse_entity::note::{Contribution, NewContribution, NewNoteSession, NoteSession};
use classpulse_entity::poll::{NewPoll, Poll, Vote};

/// Poll persistence.
#[async_trait]
pub trait PollRepository: Send + Sync + 'static {
    /// Persist a new poll and return it with its assigned id.
    async fn create(&self, new: &NewPoll) -> AppResult<Poll>;

    /// Find a poll by id.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Poll>>;

    /// Atomically flip `is_active` from true to false.
    ///
    /// Returns `true` only for the call that performed the transition, so
    /// concurrent closes (timer vs. manual) resolve to exactly one winner.
    async fn set_inactive(&self, id: i64) -> AppResult<bool>;

    /// List active polls, optionally filtered by subject and department.
    async fn find_active(
        &self,
        subject: Option<&str>,
        department_id: Option<i64>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Poll>>;
}

/// Vote persistence. One row per `(poll_id, user_id)`.
#[async_trait]
pub trait VoteRepository: Send + Sync + 'static {
    /// Insert the caller's vote, or overwrite their previous one
    /// (last vote wins).
    async fn upsert(&self, poll_id: i64, user_id: i64, option_index: i32) -> AppResult<Vote>;

    /// All votes recorded for a poll.
    async fn find_by_poll(&self, poll_id: i64) -> AppResult<Vec<Vote>>;
}

/// Note session persistence.
#[async_trait]
pub trait NoteSessionRepository: Send + Sync + 'static {
    /// Persist a new session and return it with its assigned id.
    async fn create(&self, new: &NewNoteSession) -> AppResult<NoteSession>;

    /// Find a session by id. Soft-deleted sessions are not returned.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<NoteSession>>;

    /// Set the session's accepting-contributions flag, stamping `ends_at`
    /// on deactivation.
    async fn update_status(
        &self,
        id: i64,
        is_active_session: bool,
        ends_at: Option<DateTime<Utc>>,
    ) -> AppResult<NoteSession>;

    /// Soft-delete a session. Returns `false` if it was already deleted
    /// or never existed.
    async fn soft_delete(&self, id: i64) -> AppResult<bool>;

    /// List non-deleted sessions, optionally filtered by subject.
    async fn find_active(
        &self,
        subject: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<NoteSession>>;
}

/// Contribution persistence. Append-only.
#[async_trait]
pub trait ContributionRepository: Send + Sync + 'static {
    /// Persist a new contribution and return it with its assigned id.
    async fn create(&self, new: &NewContribution) -> AppResult<Contribution>;

    /// List a session's contributions in submission order.
    async fn find_by_note(
        &self,
        note_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Contribution>>;
}

/// Course content lookups for related-content suggestions.
#[async_trait]
pub trait ContentRepository: Send + Sync + 'static {
    /// Find content items sharing at least one tag with the given set.
    async fn find_by_tag_overlap(
        &self,
        tags: &[String],
        limit: i64,
    ) -> AppResult<Vec<ContentSummary>>;
}
