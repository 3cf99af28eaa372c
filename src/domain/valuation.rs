//! Valuation results: per-methodology estimates and the blended output.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::money::Amount;

/// Valuation methodology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Methodology {
    DiscountedCashFlow,
    Comparables,
    PrecedentTransactions,
}

impl Methodology {
    /// All methodologies in blend order.
    pub const ALL: [Methodology; 3] = [
        Methodology::DiscountedCashFlow,
        Methodology::Comparables,
        Methodology::PrecedentTransactions,
    ];

    /// Short label for logging and display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Methodology::DiscountedCashFlow => "dcf",
            Methodology::Comparables => "comparables",
            Methodology::PrecedentTransactions => "precedent_transactions",
        }
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A low/high confidence interval around a point estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    pub low: Amount,
    pub high: Amount,
}

impl ConfidenceBand {
    /// Band width. Non-negative for any well-formed band.
    #[must_use]
    pub fn width(&self) -> Amount {
        self.high - self.low
    }

    /// Whether an amount falls inside the band, inclusive.
    #[must_use]
    pub fn contains(&self, value: Amount) -> bool {
        value >= self.low && value <= self.high
    }
}

/// One named assumption a methodology ran with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumption {
    pub name: String,
    pub value: f64,
}

impl Assumption {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Sampling metadata for simulated estimates.
///
/// `complete` is false when the simulation was cancelled before running
/// every requested iteration; the estimate then covers only the samples
/// that finished, and is tagged so rather than silently truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleInfo {
    pub iterations_requested: u32,
    pub iterations_run: u32,
    pub complete: bool,
}

/// One methodology's valuation output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub methodology: Methodology,
    pub point_estimate: Amount,
    pub band: ConfidenceBand,
    /// Standard deviation of the estimate, for variance blending.
    pub std_dev: f64,
    /// Assumptions actually used, for audit.
    pub assumptions: Vec<Assumption>,
    /// Present for Monte Carlo estimates.
    pub sample: Option<SampleInfo>,
}

/// Outcome of attempting one methodology.
///
/// Every methodology is always attempted; missing data prerequisites
/// degrade it to `Unavailable` with a reason rather than failing the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MethodologyOutcome {
    Available(ValuationResult),
    Unavailable {
        methodology: Methodology,
        reason: String,
    },
}

impl MethodologyOutcome {
    /// The methodology this outcome belongs to.
    #[must_use]
    pub fn methodology(&self) -> Methodology {
        match self {
            MethodologyOutcome::Available(r) => r.methodology,
            MethodologyOutcome::Unavailable { methodology, .. } => *methodology,
        }
    }

    /// The result, if the methodology produced one.
    #[must_use]
    pub fn result(&self) -> Option<&ValuationResult> {
        match self {
            MethodologyOutcome::Available(r) => Some(r),
            MethodologyOutcome::Unavailable { .. } => None,
        }
    }
}

/// Confidence-weighted combination of the available methodology results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendedValuation {
    pub point_estimate: Amount,
    /// Never narrower than the tightest contributing band.
    pub band: ConfidenceBand,
    /// Blended standard deviation from combined methodology variances.
    pub std_dev: f64,
    /// Renormalized weights over available methodologies; sums to 1.
    pub weights: Vec<(Methodology, f64)>,
    /// The contributing per-methodology results.
    pub contributions: Vec<ValuationResult>,
    /// Methodologies that degraded, with reasons, for audit.
    pub degraded: Vec<(Methodology, String)>,
}

impl BlendedValuation {
    /// Weight applied to a methodology, zero if it did not contribute.
    #[must_use]
    pub fn weight_of(&self, methodology: Methodology) -> f64 {
        self.weights
            .iter()
            .find(|(m, _)| *m == methodology)
            .map_or(0.0, |(_, w)| *w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn band_width_and_contains() {
        let band = ConfidenceBand {
            low: dec!(8_000_000),
            high: dec!(12_000_000),
        };
        assert_eq!(band.width(), dec!(4_000_000));
        assert!(band.contains(dec!(10_000_000)));
        assert!(!band.contains(dec!(12_000_001)));
    }

    #[test]
    fn methodology_labels_are_stable() {
        assert_eq!(Methodology::DiscountedCashFlow.to_string(), "dcf");
        assert_eq!(
            Methodology::PrecedentTransactions.to_string(),
            "precedent_transactions"
        );
    }
}
