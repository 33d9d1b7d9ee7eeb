//! Contracts for the external AI collaborators.
//!
//! Both services live outside this process (a Python NLP sidecar in the
//! reference deployment). Failures are expected and every caller carries
//! a local fallback, so implementations should return errors rather than
//! retry internally.

use async_trait::async_trait;

use crate::result::AppResult;

/// Text-to-tags collaborator.
#[async_trait]
pub trait TagGenerator: Send + Sync + 'static {
    /// Generate topic tags for a piece of text.
    async fn generate(&self, text: &str) -> AppResult<Vec<String>>;
}

/// Sketch-recognition collaborator.
#[async_trait]
pub trait SketchTagger: Send + Sync + 'static {
    /// Generate topic tags for base64-encoded sketch data.
    async fn generate(&self, sketch_data: &str) -> AppResult<Vec<String>>;
}
