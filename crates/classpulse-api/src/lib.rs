//! # classpulse-api
//!
//! HTTP and WebSocket surface for ClassPulse. Thin axum handlers over
//! the poll and note services, plus the `/ws` upgrade path feeding the
//! real-time hub.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
