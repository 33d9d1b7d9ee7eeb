//! # classpulse-service
//!
//! Business logic riding on the real-time hub:
//!
//! - Poll lifecycle: creation, voting, timed/manual close, tallying
//! - Collaborative note sessions and append-only contributions
//! - Tag collaborator clients with a local keyword fallback
//!
//! Services own all persistence calls for their entities and emit every
//! state change through the broadcast dispatcher.

pub mod context;
pub mod note;
pub mod poll;
pub mod tags;

pub use context::RequestContext;
pub use note::service::NoteService;
pub use poll::service::PollService;
