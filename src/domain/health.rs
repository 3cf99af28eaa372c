//! Financial health scoring against industry benchmarks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ratio::RatioId;

/// Benchmark distribution for one ratio within an industry peer group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkStat {
    /// Peer-group mean.
    pub mean: f64,
    /// Peer-group standard deviation. Must be positive to contribute.
    pub std_dev: f64,
}

/// Industry benchmark table supplied by the reference-data service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryBenchmarks {
    /// Industry the benchmarks describe.
    pub industry: String,
    /// Per-ratio peer statistics. Ratios without an entry do not
    /// contribute to the health score.
    pub stats: BTreeMap<RatioId, BenchmarkStat>,
}

impl IndustryBenchmarks {
    /// Benchmark for a ratio, if the table carries one.
    #[must_use]
    pub fn stat(&self, id: RatioId) -> Option<BenchmarkStat> {
        self.stats.get(&id).copied()
    }
}

/// Contribution of a single ratio to the health score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthComponent {
    pub ratio: RatioId,
    /// Z-score against the industry benchmark, clamped to [-3, 3].
    pub z_score: f64,
    /// Renormalized weight actually applied.
    pub weight: f64,
    /// Weighted contribution to the composite, on the 0-100 scale.
    pub contribution: f64,
}

/// Composite health score on a 0-100 scale.
///
/// 50 is at-benchmark; each clamped z-score maps linearly so +3 sigma
/// scores 100 and -3 sigma scores 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthScore {
    pub score: f64,
    pub components: Vec<HealthComponent>,
    /// Number of ratios that were defined and benchmarked.
    pub ratios_used: usize,
}

impl HealthScore {
    /// Whether enough ratios contributed for the score to be meaningful.
    #[must_use]
    pub fn is_representative(&self, min_ratios: usize) -> bool {
        self.ratios_used >= min_ratios
    }
}
