//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use classpulse_entity::note::ContentKind;

/// Create poll request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePollRequest {
    /// Poll title.
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    /// The question being asked.
    #[validate(length(min = 1, message = "Question is required"))]
    pub question: String,
    /// Option texts in display order.
    #[validate(length(min = 2, message = "At least two options are required"))]
    pub options: Vec<String>,
    /// Subject the poll belongs to.
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    /// Department scope.
    pub department_id: Option<i64>,
    /// Optional related course content.
    pub content_id: Option<i64>,
    /// Auto-close timer duration in seconds.
    pub timer_duration_seconds: Option<i64>,
}

/// Vote request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    /// Index of the chosen option.
    pub option_index: i32,
}

/// Create note session request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSessionRequest {
    /// Session title.
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    /// Seed content.
    pub content: String,
    /// Subject the session belongs to.
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    /// Department scope.
    pub department_id: Option<i64>,
}

/// Add contribution request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddContributionRequest {
    /// Contribution body.
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    /// What kind of content this is.
    pub content_type: ContentKind,
    /// Base64 sketch data, for sketch contributions.
    pub sketch_data: Option<String>,
}

/// Update session status request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSessionStatusRequest {
    /// Whether the session accepts contributions.
    pub is_active: bool,
}

/// Common list query parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Filter by subject.
    pub subject: Option<String>,
    /// Filter by department.
    pub department_id: Option<i64>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

/// Related content query parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedQuery {
    /// Maximum number of items returned.
    pub limit: Option<i64>,
}
