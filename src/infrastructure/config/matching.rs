//! Matching engine configuration.

use serde::Deserialize;

use crate::domain::FactorWeights;

/// Matching configuration: default factor weights and sharding.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// Default factor weights applied when a request supplies none.
    #[serde(default)]
    pub weights: FactorWeights,

    /// Shard count for partitioned cross-product scoring.
    #[serde(default = "default_shards")]
    pub shards: usize,
}

const fn default_shards() -> usize {
    4
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            shards: default_shards(),
        }
    }
}
