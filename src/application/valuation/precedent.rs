//! Precedent transactions methodology.
//!
//! Like comparables, but sourced from multiples paid in historical deals
//! and weighted by recency: a transaction `a` years old contributes with
//! weight `exp(-decay_rate * a)`, so stale prints fade instead of
//! distorting the estimate.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::{
    Assumption, ConfidenceBand, DealProfile, FinancialStatement, Methodology, MethodologyOutcome,
    PrecedentTransaction, ValuationResult,
};

use super::config::PrecedentConfig;

const BAND_Z: f64 = 1.2816;
const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;

/// Run the precedent transactions methodology as of `as_of`.
///
/// `as_of` is passed explicitly so recency weights are reproducible in
/// tests and consistent across a valuation pass.
#[must_use]
pub fn run(
    deal: &DealProfile,
    statement: &FinancialStatement,
    transactions: &[PrecedentTransaction],
    config: &PrecedentConfig,
    as_of: DateTime<Utc>,
) -> MethodologyOutcome {
    let ebitda = match statement.ebitda.to_f64() {
        Some(v) if v > 0.0 => v,
        _ => {
            return unavailable("target has no positive EBITDA to apply a multiple to");
        }
    };

    let weighted: Vec<(f64, f64)> = transactions
        .iter()
        .filter(|t| {
            t.target_industry.eq_ignore_ascii_case(&deal.industry)
                && t.size_band.distance(&deal.size_band) <= config.size_band_tolerance
                && t.closed_at <= as_of
        })
        .filter(|t| t.ev_to_ebitda.is_finite() && t.ev_to_ebitda > 0.0)
        .map(|t| {
            let age_years =
                (as_of - t.closed_at).num_seconds().max(0) as f64 / SECONDS_PER_YEAR;
            ((-config.decay_rate * age_years).exp(), t.ev_to_ebitda)
        })
        .collect();

    if weighted.len() < config.min_transactions {
        return unavailable(&format!(
            "{} qualifying transactions, minimum is {}",
            weighted.len(),
            config.min_transactions
        ));
    }

    let weight_sum: f64 = weighted.iter().map(|(w, _)| w).sum();
    let mean = weighted.iter().map(|(w, m)| w * m).sum::<f64>() / weight_sum;
    let variance = weighted
        .iter()
        .map(|(w, m)| w * (m - mean) * (m - mean))
        .sum::<f64>()
        / weight_sum;
    let std_dev_multiple = variance.sqrt();

    let estimate = mean * ebitda;
    let spread = BAND_Z * std_dev_multiple * ebitda;

    MethodologyOutcome::Available(ValuationResult {
        methodology: Methodology::PrecedentTransactions,
        point_estimate: to_amount(estimate),
        band: ConfidenceBand {
            low: to_amount((estimate - spread).max(0.0)),
            high: to_amount(estimate + spread),
        },
        std_dev: std_dev_multiple * ebitda,
        assumptions: vec![
            Assumption::new("ev_to_ebitda_multiple", mean),
            Assumption::new("transaction_count", weighted.len() as f64),
            Assumption::new("decay_rate", config.decay_rate),
        ],
        sample: None,
    })
}

fn unavailable(reason: &str) -> MethodologyOutcome {
    MethodologyOutcome::Unavailable {
        methodology: Methodology::PrecedentTransactions,
        reason: reason.to_string(),
    }
}

fn to_amount(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}
