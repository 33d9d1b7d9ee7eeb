//! # classpulse-entity
//!
//! Persisted domain models shared by the database, service, realtime,
//! and API crates.

pub mod content;
pub mod note;
pub mod poll;
pub mod user;

pub use content::ContentSummary;
pub use note::{ContentKind, Contribution, NewContribution, NewNoteSession, NoteSession};
pub use poll::{NewPoll, Poll, PollOption, Vote};
pub use user::UserRole;
