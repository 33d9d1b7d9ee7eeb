//! Note session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A collaborative note-taking session.
///
/// `is_active_session` gates contributions and is toggled only by the
/// creator. `is_active` is the independent soft-delete flag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NoteSession {
    /// Unique session identifier.
    pub id: i64,
    /// Session title.
    pub title: String,
    /// Seed content shown to participants.
    pub content: String,
    /// The faculty member who created the session.
    pub created_by: i64,
    /// Subject the session belongs to.
    pub subject: String,
    /// Department scope for broadcast routing.
    pub department_id: Option<i64>,
    /// Whether the session currently accepts contributions.
    pub is_active_session: bool,
    /// When the session was deactivated (set on first deactivation).
    pub ends_at: Option<DateTime<Utc>>,
    /// Soft-delete flag.
    pub is_active: bool,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new note session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNoteSession {
    /// Session title.
    pub title: String,
    /// Seed content.
    pub content: String,
    /// The creating user.
    pub created_by: i64,
    /// Subject the session belongs to.
    pub subject: String,
    /// Department scope.
    pub department_id: Option<i64>,
}
