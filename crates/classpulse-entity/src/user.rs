//! User role enumeration.
//!
//! ClassPulse does not own the user table; identity arrives from the
//! platform's session layer. The role is still needed for creator-only
//! and faculty-only checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full system administrator.
    Admin,
    /// Teaching staff; may create polls and note sessions.
    Faculty,
    /// Regular learner.
    Student,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Check if this role may create polls and note sessions.
    pub fn is_faculty_or_above(&self) -> bool {
        matches!(self, Self::Admin | Self::Faculty)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Faculty => "faculty",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = classpulse_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "faculty" => Ok(Self::Faculty),
            "student" => Ok(Self::Student),
            _ => Err(classpulse_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, faculty, student"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("faculty".parse::<UserRole>().unwrap(), UserRole::Faculty);
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("teacher".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_creation_privileges() {
        assert!(UserRole::Faculty.is_faculty_or_above());
        assert!(UserRole::Admin.is_faculty_or_above());
        assert!(!UserRole::Student.is_faculty_or_above());
    }
}
