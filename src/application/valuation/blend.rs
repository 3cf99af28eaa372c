//! Confidence-weighted blending of methodology results.

use rust_decimal::Decimal;

use crate::domain::error::ValuationError;
use crate::domain::{
    BlendedValuation, ConfidenceBand, Methodology, MethodologyOutcome,
};

use super::config::BlendWeights;

/// Combine methodology outcomes into a blended valuation.
///
/// Configured reliability weights are renormalized over the methodologies
/// that actually produced a result, so the applied weights always sum to
/// one. The blended band is the weight-convex combination of the
/// contributing bands, which can never be narrower than the tightest of
/// them; the blended standard deviation combines methodology variances
/// assuming independence.
///
/// # Errors
///
/// Returns [`ValuationError::InsufficientData`] when every methodology
/// degraded, listing each one and why.
pub fn blend(
    outcomes: Vec<MethodologyOutcome>,
    weights: &BlendWeights,
) -> Result<BlendedValuation, ValuationError> {
    let mut available = Vec::new();
    let mut degraded = Vec::new();

    for outcome in outcomes {
        match outcome {
            MethodologyOutcome::Available(result) => available.push(result),
            MethodologyOutcome::Unavailable { methodology, reason } => {
                degraded.push((methodology, reason));
            }
        }
    }

    if available.is_empty() {
        return Err(ValuationError::InsufficientData { failures: degraded });
    }

    let raw: Vec<f64> = available
        .iter()
        .map(|r| configured_weight(r.methodology, weights))
        .collect();
    let raw_sum: f64 = raw.iter().sum();
    if raw_sum == 0.0 {
        // Only methodologies with zero configured weight survived.
        let failures = available
            .iter()
            .map(|r| {
                (
                    r.methodology,
                    "configured blend weight is zero".to_string(),
                )
            })
            .chain(degraded)
            .collect();
        return Err(ValuationError::InsufficientData { failures });
    }

    let normalized: Vec<f64> = raw.iter().map(|w| w / raw_sum).collect();

    let mut point = Decimal::ZERO;
    let mut low = Decimal::ZERO;
    let mut high = Decimal::ZERO;
    let mut variance = 0.0;
    let mut applied = Vec::with_capacity(available.len());

    for (result, &weight) in available.iter().zip(&normalized) {
        let w = Decimal::try_from(weight).unwrap_or(Decimal::ZERO);
        point += result.point_estimate * w;
        low += result.band.low * w;
        high += result.band.high * w;
        variance += weight * weight * result.std_dev * result.std_dev;
        applied.push((result.methodology, weight));
    }

    Ok(BlendedValuation {
        point_estimate: point,
        band: ConfidenceBand { low, high },
        std_dev: variance.sqrt(),
        weights: applied,
        contributions: available,
        degraded,
    })
}

fn configured_weight(methodology: Methodology, weights: &BlendWeights) -> f64 {
    match methodology {
        Methodology::DiscountedCashFlow => weights.dcf,
        Methodology::Comparables => weights.comparables,
        Methodology::PrecedentTransactions => weights.precedent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValuationResult;
    use rust_decimal_macros::dec;

    fn result(methodology: Methodology, point: Decimal, low: Decimal, high: Decimal) -> ValuationResult {
        ValuationResult {
            methodology,
            point_estimate: point,
            band: ConfidenceBand { low, high },
            std_dev: 100_000.0,
            assumptions: vec![],
            sample: None,
        }
    }

    #[test]
    fn weights_renormalize_over_available() {
        let outcomes = vec![
            MethodologyOutcome::Available(result(
                Methodology::DiscountedCashFlow,
                dec!(10_000_000),
                dec!(9_000_000),
                dec!(11_000_000),
            )),
            MethodologyOutcome::Unavailable {
                methodology: Methodology::Comparables,
                reason: "no peers".to_string(),
            },
            MethodologyOutcome::Available(result(
                Methodology::PrecedentTransactions,
                dec!(12_000_000),
                dec!(11_000_000),
                dec!(13_000_000),
            )),
        ];

        let blended = blend(outcomes, &BlendWeights::default()).unwrap();
        let total: f64 = blended.weights.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
        // dcf 0.5, precedent 0.2 renormalize to 5/7 and 2/7.
        assert!((blended.weight_of(Methodology::DiscountedCashFlow) - 5.0 / 7.0).abs() < 1e-9);
        assert_eq!(blended.degraded.len(), 1);
    }

    #[test]
    fn band_is_never_narrower_than_tightest_contributor() {
        let outcomes = vec![
            MethodologyOutcome::Available(result(
                Methodology::DiscountedCashFlow,
                dec!(10_000_000),
                dec!(9_500_000),
                dec!(10_500_000),
            )),
            MethodologyOutcome::Available(result(
                Methodology::Comparables,
                dec!(14_000_000),
                dec!(10_000_000),
                dec!(18_000_000),
            )),
        ];

        let blended = blend(outcomes, &BlendWeights::default()).unwrap();
        let tightest = dec!(1_000_000);
        assert!(blended.band.width() >= tightest);
    }

    #[test]
    fn all_unavailable_is_insufficient_data() {
        let outcomes = vec![
            MethodologyOutcome::Unavailable {
                methodology: Methodology::DiscountedCashFlow,
                reason: "no revenue".to_string(),
            },
            MethodologyOutcome::Unavailable {
                methodology: Methodology::Comparables,
                reason: "no peers".to_string(),
            },
            MethodologyOutcome::Unavailable {
                methodology: Methodology::PrecedentTransactions,
                reason: "no transactions".to_string(),
            },
        ];

        match blend(outcomes, &BlendWeights::default()) {
            Err(ValuationError::InsufficientData { failures }) => {
                assert_eq!(failures.len(), 3);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }
}
