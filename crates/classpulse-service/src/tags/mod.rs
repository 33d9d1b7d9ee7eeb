//! Tag derivation: external collaborator clients and the local fallback.

pub mod client;
pub mod keywords;

pub use client::HttpTagClient;
pub use keywords::KeywordExtractor;
