//! Contribution entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The kind of content a contribution carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "contribution_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Plain text.
    Text,
    /// Base64-encoded sketch data.
    Sketch,
}

/// A single append-only entry in a note session.
///
/// Contributions are never edited or deleted after the fact.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contribution {
    /// Unique contribution identifier.
    pub id: i64,
    /// The session this contribution belongs to.
    pub note_id: i64,
    /// The contributing user.
    pub user_id: i64,
    /// Contribution body (text, or base64 sketch data).
    pub content: String,
    /// What kind of content this is.
    pub content_type: ContentKind,
    /// Topic tags derived at submission time.
    pub tags: Vec<String>,
    /// When the contribution was recorded.
    pub contributed_at: DateTime<Utc>,
}

/// Data required to record a new contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContribution {
    /// The session this contribution belongs to.
    pub note_id: i64,
    /// The contributing user.
    pub user_id: i64,
    /// Contribution body.
    pub content: String,
    /// What kind of content this is.
    pub content_type: ContentKind,
    /// Topic tags derived at submission time.
    pub tags: Vec<String>,
}
