//! Poll entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single answer option within a poll.
///
/// `index` is the option's position in the creation order and is the key
/// votes are recorded against; `text` is only for display and may repeat
/// across options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    /// Zero-based position within the poll.
    pub index: i32,
    /// Display text.
    pub text: String,
}

/// A timed classroom poll.
///
/// Polls open active and close exactly once, by auto-expiry timer or by a
/// manual close from the creator or an admin, whichever fires first. The
/// `is_active` flag is terminal: it never transitions back to `true`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Poll {
    /// Unique poll identifier.
    pub id: i64,
    /// Poll title.
    pub title: String,
    /// The question being asked.
    pub question: String,
    /// Answer options, ordered by index. Always at least two.
    #[sqlx(json)]
    pub options: Vec<PollOption>,
    /// The faculty member who created the poll.
    pub created_by: i64,
    /// Subject the poll belongs to.
    pub subject: String,
    /// Department scope for broadcast routing.
    pub department_id: Option<i64>,
    /// Optional course content the poll relates to.
    pub content_id: Option<i64>,
    /// Topic tags (AI-generated with a local keyword fallback).
    pub tags: Vec<String>,
    /// Auto-close timer duration in seconds.
    pub timer_duration_seconds: i64,
    /// When the auto-close timer fires.
    pub expires_at: DateTime<Utc>,
    /// Whether the poll still accepts votes.
    pub is_active: bool,
    /// When the poll was created.
    pub created_at: DateTime<Utc>,
}

impl Poll {
    /// Check whether an option index refers to an existing option.
    pub fn has_option(&self, option_index: i32) -> bool {
        option_index >= 0 && (option_index as usize) < self.options.len()
    }

    /// Check whether the auto-close deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Data required to create a new poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPoll {
    /// Poll title.
    pub title: String,
    /// The question being asked.
    pub question: String,
    /// Answer options, ordered by index.
    pub options: Vec<PollOption>,
    /// The creating user.
    pub created_by: i64,
    /// Subject the poll belongs to.
    pub subject: String,
    /// Department scope.
    pub department_id: Option<i64>,
    /// Optional related course content.
    pub content_id: Option<i64>,
    /// Topic tags.
    pub tags: Vec<String>,
    /// Auto-close timer duration in seconds.
    pub timer_duration_seconds: i64,
    /// When the auto-close timer fires.
    pub expires_at: DateTime<Utc>,
}
