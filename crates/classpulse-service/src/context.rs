//! Request context carrying the caller's identity.

use serde::{Deserialize, Serialize};

use classpulse_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted at the API boundary and passed into service methods so that
/// every operation knows *who* is acting. Authentication itself happens
/// upstream; this subsystem only consumes the resolved identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: i64,
    /// The user's role.
    pub role: UserRole,
    /// The user's department, if any.
    pub department_id: Option<i64>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: i64, role: UserRole, department_id: Option<i64>) -> Self {
        Self {
            user_id,
            role,
            department_id,
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns whether the current user may create polls and sessions.
    pub fn is_faculty_or_above(&self) -> bool {
        self.role.is_faculty_or_above()
    }
}
