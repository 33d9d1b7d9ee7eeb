//! # classpulse-core
//!
//! Shared foundation for the ClassPulse backend:
//!
//! - Unified [`error::AppError`] used across all crates
//! - Layered application configuration
//! - Pagination types for list endpoints
//! - Repository and AI-collaborator contracts

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
