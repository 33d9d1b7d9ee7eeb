//! Vote entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A recorded vote.
///
/// At most one row exists per `(poll_id, user_id)`; casting again
/// overwrites the previous choice (last vote wins).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vote {
    /// Unique vote identifier.
    pub id: i64,
    /// The poll voted on.
    pub poll_id: i64,
    /// The voting user.
    pub user_id: i64,
    /// Index of the chosen option.
    pub option_index: i32,
    /// When the vote was cast (updated on re-vote).
    pub voted_at: DateTime<Utc>,
}
