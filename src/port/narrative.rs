//! Narrative commentary port.
//!
//! Narrative generation is optional color for operators; numeric
//! correctness never depends on it. The core runs against
//! [`NullNarrative`] in tests and whenever no provider is configured.

use async_trait::async_trait;

use crate::domain::error::ServiceError;

/// Client for generating narrative commentary on analysis results.
///
/// Implementations wrap a generative model API and handle
/// authentication and response parsing.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`) to support
/// concurrent requests.
#[async_trait]
pub trait NarrativeClient: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Generate commentary for the given analysis summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider request fails or the response is
    /// malformed.
    async fn commentary(&self, summary: &str) -> Result<String, ServiceError>;
}

/// Deterministic no-op narrative provider.
///
/// Echoes a fixed preamble so callers can render something stable without
/// a generative backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNarrative;

#[async_trait]
impl NarrativeClient for NullNarrative {
    fn name(&self) -> &'static str {
        "null"
    }

    async fn commentary(&self, summary: &str) -> Result<String, ServiceError> {
        Ok(format!("Automated commentary unavailable. Summary: {summary}"))
    }
}
