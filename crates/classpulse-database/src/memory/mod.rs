//! In-memory repository implementations.
//!
//! Backs the `memory` database provider: integration tests and single-node
//! development run against these instead of PostgreSQL. Semantics mirror
//! the SQL backend, including the vote upsert and the atomic poll close.

pub mod content;
pub mod contribution;
pub mod note;
pub mod poll;
pub mod vote;
