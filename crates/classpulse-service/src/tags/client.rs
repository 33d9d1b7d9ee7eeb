//! HTTP client for the external tag/sketch collaborators.

use async_trait::async_trait;
use serde::Deserialize;

use classpulse_core::config::ai::AiConfig;
use classpulse_core::error::{AppError, ErrorKind};
use classpulse_core::result::AppResult;
use classpulse_core::traits::tagger::{SketchTagger, TagGenerator};

/// Response body shared by both collaborator endpoints.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    tags: Vec<String>,
}

/// Client for the NLP sidecar service.
///
/// Requests carry a short timeout; any failure is surfaced as an
/// [`ErrorKind::ExternalService`] error for the caller's fallback to
/// handle. Nothing here retries.
#[derive(Debug, Clone)]
pub struct HttpTagClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTagClient {
    /// Build a client from configuration.
    pub fn new(config: &AiConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn request_tags(&self, path: &str, body: serde_json::Value) -> AppResult<Vec<String>> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Tag service unreachable", e)
            })?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Tag service returned {}",
                response.status()
            )));
        }

        let parsed: TagsResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Bad tag service response", e)
        })?;
        Ok(parsed.tags)
    }
}

#[async_trait]
impl TagGenerator for HttpTagClient {
    async fn generate(&self, text: &str) -> AppResult<Vec<String>> {
        self.request_tags("/api/tags", serde_json::json!({ "text": text }))
            .await
    }
}

#[async_trait]
impl SketchTagger for HttpTagClient {
    async fn generate(&self, sketch_data: &str) -> AppResult<Vec<String>> {
        self.request_tags("/api/sketch-tags", serde_json::json!({ "sketch": sketch_data }))
            .await
    }
}
