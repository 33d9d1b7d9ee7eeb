//! Recipient filter for broadcasts.

use crate::connection::handle::ClientIdentity;

/// Routing filter applied to every connection during a broadcast.
///
/// All present fields are ANDed. An empty filter reaches every open
/// connection, authenticated or not; any identity-scoped field restricts
/// delivery to connections with a bound identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BroadcastFilter {
    /// Deliver only to this user.
    pub include_user: Option<i64>,
    /// Deliver to everyone except this user.
    pub exclude_user: Option<i64>,
    /// Deliver only within this department.
    pub department_id: Option<i64>,
    /// Deliver only to connections subscribed to this subject.
    pub subject: Option<String>,
}

impl BroadcastFilter {
    /// Filter matching every open connection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching a single user's connections.
    pub fn user(user_id: i64) -> Self {
        Self {
            include_user: Some(user_id),
            ..Self::default()
        }
    }

    /// Filter matching a department's connections.
    pub fn department(department_id: i64) -> Self {
        Self {
            department_id: Some(department_id),
            ..Self::default()
        }
    }

    /// Filter matching connections subscribed to a subject.
    pub fn subject(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            ..Self::default()
        }
    }

    /// Restrict an existing filter to a department, when one is known.
    pub fn with_department(mut self, department_id: Option<i64>) -> Self {
        self.department_id = department_id;
        self
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.include_user.is_none()
            && self.exclude_user.is_none()
            && self.department_id.is_none()
            && self.subject.is_none()
    }

    /// Decide whether a connection with the given identity receives the
    /// broadcast.
    pub fn matches(&self, identity: Option<&ClientIdentity>) -> bool {
        if self.is_empty() {
            return true;
        }

        let Some(ident) = identity else {
            return false;
        };

        if let Some(user_id) = self.include_user {
            if ident.user_id != user_id {
                return false;
            }
        }
        if let Some(user_id) = self.exclude_user {
            if ident.user_id == user_id {
                return false;
            }
        }
        if let Some(department_id) = self.department_id {
            if ident.department_id != Some(department_id) {
                return false;
            }
        }
        if let Some(subject) = &self.subject {
            if !ident.subjects.contains(subject) {
                return false;
            }
        }

        true
    }
}
