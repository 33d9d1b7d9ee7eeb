//! Course content summary model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A lightweight view of a course content item, used for tag-overlap
/// lookups from polls. Content management itself lives outside this
/// subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentSummary {
    /// Unique content identifier.
    pub id: i64,
    /// Content title.
    pub title: String,
    /// Subject the content belongs to.
    pub subject: String,
    /// Topic tags.
    pub tags: Vec<String>,
}
