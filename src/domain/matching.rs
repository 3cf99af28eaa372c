//! Match scoring types for buyer/deal pairing.
//!
//! A pairing is scored on five factors, each normalized to [0, 1] before
//! weighting so no single factor's raw scale dominates. Ranking is
//! descending by composite score with a deterministic tie-break: most
//! recent deal first, then highest data completeness, then lexicographic
//! ids so merged shard results are a total order.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::MatchError;
use super::ids::{BuyerId, DealId};

/// Normalized per-factor similarity values, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    /// Deal industry against the mandate's target industries.
    pub industry_fit: f64,
    /// Distance between the deal's size band and the mandate's range.
    pub size_fit: f64,
    /// Deal geography against the mandate's acceptable regions.
    pub geography_fit: f64,
    /// Overlap of strategic tags.
    pub strategic_overlap: f64,
    /// Deal health score against the mandate's risk appetite.
    pub health_alignment: f64,
}

impl FactorScores {
    /// Weighted composite in [0, 1].
    ///
    /// Weights are renormalized by their sum, so only relative magnitudes
    /// matter.
    #[must_use]
    pub fn composite(&self, weights: &FactorWeights) -> f64 {
        let weighted_sum = self.industry_fit * weights.industry
            + self.size_fit * weights.size
            + self.geography_fit * weights.geography
            + self.strategic_overlap * weights.strategic
            + self.health_alignment * weights.health;

        let weight_sum = weights.sum();
        if weight_sum == 0.0 {
            0.0
        } else {
            weighted_sum / weight_sum
        }
    }
}

/// Externally supplied weights for combining factor scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub industry: f64,
    pub size: f64,
    pub geography: f64,
    pub strategic: f64,
    pub health: f64,
}

impl FactorWeights {
    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.industry + self.size + self.geography + self.strategic + self.health
    }

    /// Validate that every weight is non-negative and at least one is
    /// positive.
    pub fn validate(&self) -> Result<(), MatchError> {
        for (field, value) in [
            ("industry", self.industry),
            ("size", self.size),
            ("geography", self.geography),
            ("strategic", self.strategic),
            ("health", self.health),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(MatchError::NegativeWeight { field, value });
            }
        }
        if self.sum() == 0.0 {
            return Err(MatchError::ZeroWeights);
        }
        Ok(())
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            industry: 0.30,
            size: 0.20,
            geography: 0.15,
            strategic: 0.15,
            health: 0.20,
        }
    }
}

/// A scored buyer/deal pairing with its factor-level rationale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchScore {
    pub buyer: BuyerId,
    pub deal: DealId,
    /// Composite score in [0, 1].
    pub score: f64,
    pub factors: FactorScores,
    /// Deal listing time, first tie-break.
    pub deal_listed_at: DateTime<Utc>,
    /// Deal record completeness, second tie-break.
    pub deal_completeness: f64,
}

impl MatchScore {
    /// Ranking comparison: higher score first, then most recent deal,
    /// then highest completeness, then ids for a stable total order.
    #[must_use]
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.deal_listed_at.cmp(&self.deal_listed_at))
            .then_with(|| {
                other
                    .deal_completeness
                    .partial_cmp(&self.deal_completeness)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| self.buyer.cmp(&other.buyer))
            .then_with(|| self.deal.cmp(&other.deal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn score(deal: &str, s: f64, day: u32, completeness: f64) -> MatchScore {
        MatchScore {
            buyer: BuyerId::from("buyer-1"),
            deal: DealId::from(deal),
            score: s,
            factors: FactorScores {
                industry_fit: s,
                size_fit: s,
                geography_fit: s,
                strategic_overlap: s,
                health_alignment: s,
            },
            deal_listed_at: Utc.with_ymd_and_hms(2026, 7, day, 0, 0, 0).unwrap(),
            deal_completeness: completeness,
        }
    }

    #[test]
    fn composite_renormalizes_weights() {
        let factors = FactorScores {
            industry_fit: 1.0,
            size_fit: 1.0,
            geography_fit: 1.0,
            strategic_overlap: 1.0,
            health_alignment: 1.0,
        };
        let weights = FactorWeights {
            industry: 2.0,
            size: 2.0,
            geography: 2.0,
            strategic: 2.0,
            health: 2.0,
        };
        assert!((factors.composite(&weights) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_negative_weight() {
        let weights = FactorWeights {
            industry: -0.1,
            ..FactorWeights::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(MatchError::NegativeWeight {
                field: "industry",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_all_zero() {
        let weights = FactorWeights {
            industry: 0.0,
            size: 0.0,
            geography: 0.0,
            strategic: 0.0,
            health: 0.0,
        };
        assert!(matches!(weights.validate(), Err(MatchError::ZeroWeights)));
    }

    #[test]
    fn ranking_prefers_score_then_recency_then_completeness() {
        let mut scores = vec![
            score("deal-a", 0.5, 1, 0.9),
            score("deal-b", 0.8, 1, 0.9),
            score("deal-c", 0.5, 10, 0.9),
            score("deal-d", 0.5, 10, 0.95),
        ];
        scores.sort_by(MatchScore::ranking_cmp);

        let order: Vec<&str> = scores.iter().map(|s| s.deal.as_str()).collect();
        assert_eq!(order, vec!["deal-b", "deal-d", "deal-c", "deal-a"]);
    }
}
