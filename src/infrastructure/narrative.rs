//! HTTP narrative client.
//!
//! Wraps a messages-style completion API to render commentary for
//! valuations and match rankings. Built explicitly via
//! [`build_narrative_client`]; referencing this module performs no I/O.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::error::ServiceError;
use crate::infrastructure::config::NarrativeConfig;
use crate::port::{NarrativeClient, NullNarrative};

/// API version header value for the messages endpoint.
const API_VERSION: &str = "2023-06-01";

/// Environment variable holding the provider API key.
const API_KEY_VAR: &str = "DEALFORGE_NARRATIVE_API_KEY";

/// Messages-API narrative client.
pub struct HttpNarrative {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f64,
}

impl HttpNarrative {
    /// Create a client with explicit settings.
    #[must_use]
    pub fn new(config: &NarrativeConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.clone(),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[derive(Serialize)]
struct Request {
    model: String,
    max_tokens: usize,
    temperature: f64,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct Response {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[async_trait]
impl NarrativeClient for HttpNarrative {
    fn name(&self) -> &'static str {
        "messages-api"
    }

    async fn commentary(&self, summary: &str) -> Result<String, ServiceError> {
        let request = Request {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user",
                content: format!(
                    "Write two sentences of neutral deal commentary for this \
                     analysis summary:\n{summary}"
                ),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::Unavailable {
                service: "narrative",
                attempts: 1,
                reason: e.to_string(),
            })?;

        let body: Response =
            response
                .error_for_status()
                .map_err(|e| ServiceError::Unavailable {
                    service: "narrative",
                    attempts: 1,
                    reason: e.to_string(),
                })?
                .json()
                .await
                .map_err(|e| ServiceError::MalformedResponse {
                    service: "narrative",
                    reason: e.to_string(),
                })?;

        body.content
            .first()
            .map(|block| block.text.clone())
            .ok_or(ServiceError::MalformedResponse {
                service: "narrative",
                reason: "response carried no content blocks".to_string(),
            })
    }
}

/// Build the narrative client from configuration.
///
/// Falls back to the deterministic [`NullNarrative`] when narrative is
/// disabled or the API key environment variable is missing.
#[must_use]
pub fn build_narrative_client(config: &NarrativeConfig) -> Arc<dyn NarrativeClient> {
    if !config.enabled {
        return Arc::new(NullNarrative);
    }
    match std::env::var(API_KEY_VAR) {
        Ok(api_key) => {
            let client = HttpNarrative::new(config, api_key);
            info!(provider = client.name(), model = %config.model, "narrative client initialized");
            Arc::new(client)
        }
        Err(_) => {
            warn!("{API_KEY_VAR} not set, narrative commentary disabled");
            Arc::new(NullNarrative)
        }
    }
}
