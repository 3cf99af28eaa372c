//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all engine and
//! infrastructure settings. Configuration is loaded from a TOML file;
//! secrets (the narrative API key) come from environment variables only.
//!
//! # Example
//!
//! ```no_run
//! use dealforge::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("dealforge.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::matching::MatchingConfig;
use super::narrative::NarrativeConfig;
use super::reference::ReferenceConfig;
use crate::application::analyzer::AnalyzerConfig;
use crate::application::stack::StackConfig;
use crate::application::valuation::ValuationConfig;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Aggregates all settings. Load from a TOML file with [`Config::load`]
/// or parse directly with [`Config::parse_toml`].
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Statement analyzer settings: tolerances and health weights.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Valuation engine settings: blend weights, Monte Carlo inputs,
    /// peer selection, and recency decay.
    #[serde(default)]
    pub valuation: ValuationConfig,

    /// Offer stack settings: share caps, rates, and epsilon.
    #[serde(default)]
    pub stack: StackConfig,

    /// Matching settings: default factor weights and sharding.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Reference-data service client settings.
    #[serde(default)]
    pub reference: ReferenceConfig,

    /// Narrative commentary settings.
    #[serde(default)]
    pub narrative: NarrativeConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is
    /// malformed, or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate every section against its declared ranges.
    fn validate(&self) -> Result<()> {
        self.valuation
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                field: "valuation",
                reason: e.to_string(),
            })?;
        self.stack
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                field: "stack",
                reason: e.to_string(),
            })?;
        self.matching
            .weights
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                field: "matching.weights",
                reason: e.to_string(),
            })?;
        if self.matching.shards == 0 {
            return Err(ConfigError::InvalidValue {
                field: "matching.shards",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        let retry = &self.reference.retry;
        if retry.initial_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reference.retry.initial_delay_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if retry.max_delay_ms < retry.initial_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "reference.retry.max_delay_ms",
                reason: "must be >= initial_delay_ms".to_string(),
            }
            .into());
        }
        if retry.backoff_multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "reference.retry.backoff_multiplier",
                reason: "must be >= 1.0".to_string(),
            }
            .into());
        }
        if retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reference.retry.max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.reference.base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "reference.base_url",
            }
            .into());
        }
        if self.reference.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reference.timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.narrative.enabled && self.narrative.api_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "narrative.api_url",
            }
            .into());
        }

        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.valuation.dcf.horizon_years, 5);
        assert_eq!(config.matching.shards, 4);
        assert!(!config.narrative.enabled);
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse_toml(
            r#"
            [valuation.dcf]
            iterations = 5000
            seed = 7

            [matching.weights]
            industry = 0.5
            size = 0.2
            geography = 0.1
            strategic = 0.1
            health = 0.1
            "#,
        )
        .unwrap();
        assert_eq!(config.valuation.dcf.iterations, 5000);
        assert_eq!(config.valuation.dcf.seed, 7);
        assert!((config.matching.weights.industry - 0.5).abs() < 1e-12);
    }

    #[test]
    fn invalid_valuation_section_is_rejected() {
        let result = Config::parse_toml(
            r#"
            [valuation.dcf]
            iterations = 5
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_retry_attempts_is_rejected() {
        let result = Config::parse_toml(
            r#"
            [reference.retry]
            max_attempts = 0
            "#,
        );
        assert!(result.is_err());
    }
}
