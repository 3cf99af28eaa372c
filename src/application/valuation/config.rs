//! Valuation engine configuration.
//!
//! Blend weights, Monte Carlo iteration counts, and input distributions
//! are externally supplied configuration validated against declared
//! ranges, never hard-coded constants.

use rand::rngs::StdRng;
use rand::distributions::Distribution as _;
use serde::Deserialize;
use statrs::distribution::{Normal, Triangular};

use crate::domain::error::ValuationError;

/// Probability distribution for one uncertain simulation input.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionConfig {
    Normal { mean: f64, std_dev: f64 },
    Triangular { min: f64, mode: f64, max: f64 },
}

impl DistributionConfig {
    /// Central tendency of the distribution.
    #[must_use]
    pub fn mean(&self) -> f64 {
        match self {
            DistributionConfig::Normal { mean, .. } => *mean,
            DistributionConfig::Triangular { min, mode, max } => (min + mode + max) / 3.0,
        }
    }

    /// Validate parameters against their declared ranges.
    pub fn validate(&self, name: &'static str) -> Result<(), ValuationError> {
        match self {
            DistributionConfig::Normal { std_dev, .. } => {
                if *std_dev < 0.0 || !std_dev.is_finite() {
                    return Err(ValuationError::InvalidAssumption {
                        name,
                        reason: format!("std_dev must be non-negative, got {std_dev}"),
                    });
                }
            }
            DistributionConfig::Triangular { min, mode, max } => {
                if !(min <= mode && mode <= max && min < max) {
                    return Err(ValuationError::InvalidAssumption {
                        name,
                        reason: format!(
                            "triangular requires min <= mode <= max and min < max, got \
                             ({min}, {mode}, {max})"
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Build a sampler for this distribution.
    ///
    /// A zero-spread normal degenerates to its mean, which keeps
    /// zero-variance scenario tests exact.
    pub fn sampler(&self, name: &'static str) -> Result<Sampler, ValuationError> {
        self.validate(name)?;
        match self {
            DistributionConfig::Normal { mean, std_dev } => {
                if *std_dev == 0.0 {
                    return Ok(Sampler::Constant(*mean));
                }
                let dist = Normal::new(*mean, *std_dev).map_err(|e| {
                    ValuationError::InvalidAssumption {
                        name,
                        reason: e.to_string(),
                    }
                })?;
                Ok(Sampler::Normal(dist))
            }
            DistributionConfig::Triangular { min, mode, max } => {
                let dist = Triangular::new(*min, *max, *mode).map_err(|e| {
                    ValuationError::InvalidAssumption {
                        name,
                        reason: e.to_string(),
                    }
                })?;
                Ok(Sampler::Triangular(dist))
            }
        }
    }
}

/// A ready-to-draw sampler built from a [`DistributionConfig`].
#[derive(Debug, Clone, Copy)]
pub enum Sampler {
    Constant(f64),
    Normal(Normal),
    Triangular(Triangular),
}

impl Sampler {
    /// Draw one value.
    pub fn draw(&self, rng: &mut StdRng) -> f64 {
        match self {
            Sampler::Constant(v) => *v,
            Sampler::Normal(d) => d.sample(rng),
            Sampler::Triangular(d) => d.sample(rng),
        }
    }
}

/// Discounted cash flow configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DcfConfig {
    /// Projection horizon in years.
    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,

    /// Monte Carlo iteration count.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// RNG seed. Fixed seed reproduces identical output regardless of
    /// worker count.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Lower percentile of the reported band (0.10 = P10).
    #[serde(default = "default_percentile_low")]
    pub percentile_low: f64,

    /// Upper percentile of the reported band (0.90 = P90).
    #[serde(default = "default_percentile_high")]
    pub percentile_high: f64,

    /// Perpetuity growth rate for the terminal value.
    #[serde(default = "default_terminal_growth")]
    pub terminal_growth: f64,

    /// Annual revenue growth rate distribution.
    #[serde(default = "default_growth")]
    pub growth: DistributionConfig,

    /// Discount rate distribution.
    #[serde(default = "default_discount")]
    pub discount: DistributionConfig,

    /// Free-cash-flow margin distribution.
    #[serde(default = "default_margin")]
    pub margin: DistributionConfig,
}

const fn default_horizon_years() -> u32 {
    5
}

const fn default_iterations() -> u32 {
    2000
}

const fn default_seed() -> u64 {
    42
}

const fn default_percentile_low() -> f64 {
    0.10
}

const fn default_percentile_high() -> f64 {
    0.90
}

const fn default_terminal_growth() -> f64 {
    0.02
}

const fn default_growth() -> DistributionConfig {
    DistributionConfig::Normal {
        mean: 0.03,
        std_dev: 0.01,
    }
}

const fn default_discount() -> DistributionConfig {
    DistributionConfig::Normal {
        mean: 0.10,
        std_dev: 0.015,
    }
}

const fn default_margin() -> DistributionConfig {
    DistributionConfig::Normal {
        mean: 0.20,
        std_dev: 0.03,
    }
}

impl Default for DcfConfig {
    fn default() -> Self {
        Self {
            horizon_years: default_horizon_years(),
            iterations: default_iterations(),
            seed: default_seed(),
            percentile_low: default_percentile_low(),
            percentile_high: default_percentile_high(),
            terminal_growth: default_terminal_growth(),
            growth: default_growth(),
            discount: default_discount(),
            margin: default_margin(),
        }
    }
}

impl DcfConfig {
    /// Validate ranges.
    pub fn validate(&self) -> Result<(), ValuationError> {
        if self.horizon_years == 0 || self.horizon_years > 30 {
            return Err(ValuationError::InvalidAssumption {
                name: "horizon_years",
                reason: format!("must be in 1..=30, got {}", self.horizon_years),
            });
        }
        if self.iterations < 100 {
            return Err(ValuationError::InvalidAssumption {
                name: "iterations",
                reason: format!("must be at least 100, got {}", self.iterations),
            });
        }
        if !(0.0 < self.percentile_low
            && self.percentile_low < self.percentile_high
            && self.percentile_high < 1.0)
        {
            return Err(ValuationError::InvalidAssumption {
                name: "percentiles",
                reason: format!(
                    "need 0 < low < high < 1, got ({}, {})",
                    self.percentile_low, self.percentile_high
                ),
            });
        }
        if self.terminal_growth >= self.discount.mean() {
            return Err(ValuationError::InvalidAssumption {
                name: "terminal_growth",
                reason: format!(
                    "must stay below the mean discount rate {}, got {}",
                    self.discount.mean(),
                    self.terminal_growth
                ),
            });
        }
        self.growth.validate("growth")?;
        self.discount.validate("discount")?;
        self.margin.validate("margin")?;
        Ok(())
    }
}

/// Comparables configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComparablesConfig {
    /// Minimum peer count; below this the methodology is unavailable.
    #[serde(default = "default_min_peers")]
    pub min_peers: usize,

    /// Fraction trimmed from each tail before averaging multiples.
    #[serde(default = "default_trim_fraction")]
    pub trim_fraction: f64,

    /// Maximum size-band distance for a peer to qualify.
    #[serde(default = "default_band_tolerance")]
    pub size_band_tolerance: usize,
}

const fn default_min_peers() -> usize {
    4
}

const fn default_trim_fraction() -> f64 {
    0.10
}

const fn default_band_tolerance() -> usize {
    1
}

impl Default for ComparablesConfig {
    fn default() -> Self {
        Self {
            min_peers: default_min_peers(),
            trim_fraction: default_trim_fraction(),
            size_band_tolerance: default_band_tolerance(),
        }
    }
}

impl ComparablesConfig {
    pub fn validate(&self) -> Result<(), ValuationError> {
        if self.min_peers == 0 {
            return Err(ValuationError::InvalidAssumption {
                name: "min_peers",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..0.5).contains(&self.trim_fraction) {
            return Err(ValuationError::InvalidAssumption {
                name: "trim_fraction",
                reason: format!("must be in [0, 0.5), got {}", self.trim_fraction),
            });
        }
        Ok(())
    }
}

/// Precedent transactions configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrecedentConfig {
    /// Minimum transaction count; below this the methodology is
    /// unavailable.
    #[serde(default = "default_min_transactions")]
    pub min_transactions: usize,

    /// Exponential decay rate per year of transaction age.
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,

    /// Maximum size-band distance for a transaction to qualify.
    #[serde(default = "default_band_tolerance")]
    pub size_band_tolerance: usize,
}

const fn default_min_transactions() -> usize {
    3
}

const fn default_decay_rate() -> f64 {
    0.35
}

impl Default for PrecedentConfig {
    fn default() -> Self {
        Self {
            min_transactions: default_min_transactions(),
            decay_rate: default_decay_rate(),
            size_band_tolerance: default_band_tolerance(),
        }
    }
}

impl PrecedentConfig {
    pub fn validate(&self) -> Result<(), ValuationError> {
        if self.min_transactions == 0 {
            return Err(ValuationError::InvalidAssumption {
                name: "min_transactions",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.decay_rate < 0.0 || !self.decay_rate.is_finite() {
            return Err(ValuationError::InvalidAssumption {
                name: "decay_rate",
                reason: format!("must be non-negative, got {}", self.decay_rate),
            });
        }
        Ok(())
    }
}

/// Reliability weights used when blending methodology results.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BlendWeights {
    #[serde(default = "default_dcf_weight")]
    pub dcf: f64,
    #[serde(default = "default_comparables_weight")]
    pub comparables: f64,
    #[serde(default = "default_precedent_weight")]
    pub precedent: f64,
}

const fn default_dcf_weight() -> f64 {
    0.5
}

const fn default_comparables_weight() -> f64 {
    0.3
}

const fn default_precedent_weight() -> f64 {
    0.2
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            dcf: default_dcf_weight(),
            comparables: default_comparables_weight(),
            precedent: default_precedent_weight(),
        }
    }
}

impl BlendWeights {
    pub fn validate(&self) -> Result<(), ValuationError> {
        for (name, value) in [
            ("blend.dcf", self.dcf),
            ("blend.comparables", self.comparables),
            ("blend.precedent", self.precedent),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(ValuationError::InvalidAssumption {
                    name,
                    reason: format!("must be non-negative, got {value}"),
                });
            }
        }
        if self.dcf + self.comparables + self.precedent == 0.0 {
            return Err(ValuationError::InvalidAssumption {
                name: "blend",
                reason: "weights must not all be zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Aggregated valuation engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ValuationConfig {
    #[serde(default)]
    pub blend: BlendWeights,
    #[serde(default)]
    pub dcf: DcfConfig,
    #[serde(default)]
    pub comparables: ComparablesConfig,
    #[serde(default)]
    pub precedent: PrecedentConfig,
}

impl ValuationConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ValuationError> {
        self.blend.validate()?;
        self.dcf.validate()?;
        self.comparables.validate()?;
        self.precedent.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        ValuationConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_spread_normal_is_constant() {
        let dist = DistributionConfig::Normal {
            mean: 0.1,
            std_dev: 0.0,
        };
        let sampler = dist.sampler("discount").unwrap();
        let mut rng = <StdRng as rand::SeedableRng>::seed_from_u64(1);
        assert_eq!(sampler.draw(&mut rng), 0.1);
    }

    #[test]
    fn invalid_triangular_rejected() {
        let dist = DistributionConfig::Triangular {
            min: 0.2,
            mode: 0.1,
            max: 0.3,
        };
        assert!(dist.validate("growth").is_err());
    }

    #[test]
    fn terminal_growth_must_stay_below_discount() {
        let config = DcfConfig {
            terminal_growth: 0.2,
            ..DcfConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
