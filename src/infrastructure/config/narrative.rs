//! Narrative provider configuration.
//!
//! The API key is read from the `DEALFORGE_NARRATIVE_API_KEY` environment
//! variable at client construction, never from the config file.

use serde::Deserialize;

/// Narrative commentary configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeConfig {
    /// Whether to build a real provider at all.
    #[serde(default)]
    pub enabled: bool,

    /// Messages API endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens in the response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Sampling temperature; low by default for stable commentary.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_api_url() -> String {
    "https://api.anthropic.com/v1/messages".into()
}

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".into()
}

const fn default_max_tokens() -> usize {
    1024
}

const fn default_temperature() -> f64 {
    0.2
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_api_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}
