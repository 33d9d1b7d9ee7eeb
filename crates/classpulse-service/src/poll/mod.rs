//! Timed poll lifecycle: creation, voting, close, and tallying.

pub mod results;
pub mod service;

pub use results::PollResults;
pub use service::{CreatePollInput, PollService};
