//! AI collaborator (tag generator / sketch tagger) configuration.

use serde::{Deserialize, Serialize};

/// Settings for the external text-to-tags and sketch-recognition services.
///
/// Both collaborators are best-effort: when disabled or unreachable the
/// services fall back to local keyword extraction (polls) or empty tags
/// (sketch contributions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Whether the external services are called at all.
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the tag service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5050".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}
