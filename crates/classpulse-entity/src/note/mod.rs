//! Collaborative note session models.

pub mod contribution;
pub mod model;

pub use contribution::{ContentKind, Contribution, NewContribution};
pub use model::{NewNoteSession, NoteSession};
