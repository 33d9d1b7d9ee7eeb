//! # classpulse-database
//!
//! Persistence layer for ClassPulse. Defines the repository contracts the
//! services program against and provides two backends:
//!
//! - `postgres` — sqlx-backed repositories for production
//! - `memory` — an in-process store used by tests and single-node
//!   development (no core logic depends on the storage engine)

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repositories;

use std::sync::Arc;

use sqlx::PgPool;

use repositories::{
    ContentRepository, ContributionRepository, NoteSessionRepository, PollRepository,
    VoteRepository,
};

/// Bundle of all repositories behind trait objects.
///
/// Constructed once at startup and handed to the service layer, so the
/// services never know which backend is serving them.
#[derive(Clone)]
pub struct Repositories {
    /// Poll persistence.
    pub polls: Arc<dyn PollRepository>,
    /// Vote persistence.
    pub votes: Arc<dyn VoteRepository>,
    /// Note session persistence.
    pub notes: Arc<dyn NoteSessionRepository>,
    /// Contribution persistence.
    pub contributions: Arc<dyn ContributionRepository>,
    /// Course content lookups.
    pub contents: Arc<dyn ContentRepository>,
}

impl Repositories {
    /// Build the PostgreSQL-backed repository set.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            polls: Arc::new(postgres::poll::PgPollRepository::new(pool.clone())),
            votes: Arc::new(postgres::vote::PgVoteRepository::new(pool.clone())),
            notes: Arc::new(postgres::note::PgNoteSessionRepository::new(pool.clone())),
            contributions: Arc::new(postgres::contribution::PgContributionRepository::new(
                pool.clone(),
            )),
            contents: Arc::new(postgres::content::PgContentRepository::new(pool)),
        }
    }

    /// Build the in-memory repository set.
    pub fn memory() -> Self {
        Self {
            polls: Arc::new(memory::poll::MemoryPollRepository::new()),
            votes: Arc::new(memory::vote::MemoryVoteRepository::new()),
            notes: Arc::new(memory::note::MemoryNoteSessionRepository::new()),
            contributions: Arc::new(memory::contribution::MemoryContributionRepository::new()),
            contents: Arc::new(memory::content::MemoryContentRepository::new()),
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish()
    }
}
