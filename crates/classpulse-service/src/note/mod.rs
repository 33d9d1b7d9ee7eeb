//! Collaborative note sessions and contributions.

pub mod service;

pub use service::{AddContributionInput, CreateSessionInput, NoteService};
