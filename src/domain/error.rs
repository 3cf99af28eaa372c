//! Domain error and warning types.
//!
//! Two tiers exist deliberately: data-quality findings are warnings
//! attached to results (analysis always proceeds), while valuation, stack,
//! and matching errors are fatal for the individual request that raised
//! them.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::money::Amount;
use super::stack::BindingConstraint;
use super::valuation::Methodology;

/// Non-fatal data-quality finding on an input statement.
///
/// Attached to the ratio report as a warning; computation proceeds with
/// confidence downgraded.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum DataQualityIssue {
    /// Balance-sheet identity violated beyond tolerance.
    #[error("balance sheet out of identity: assets {assets} vs liabilities + equity {claims}")]
    BalanceIdentity {
        assets: Decimal,
        claims: Decimal,
    },

    /// A line item required for meaningful analysis is missing or
    /// non-positive.
    #[error("incomplete statement: {field} is missing or non-positive")]
    IncompleteLineItem { field: &'static str },

    /// Equity is negative; leverage and return ratios degrade.
    #[error("negative equity reported: {equity}")]
    NegativeEquity { equity: Decimal },

    /// EBITDA inconsistent with its income-statement components.
    #[error("ebitda {reported} inconsistent with derived {derived}")]
    EbitdaInconsistent {
        reported: Decimal,
        derived: Decimal,
    },
}

/// Fatal errors for a single valuation request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    /// Every methodology degraded; no defensible estimate exists.
    #[error("all valuation methodologies unavailable: {}", .failures.iter().map(|(m, r)| format!("{m}: {r}")).collect::<Vec<_>>().join("; "))]
    InsufficientData {
        failures: Vec<(Methodology, String)>,
    },

    /// A configured assumption is outside its valid range.
    #[error("invalid assumption {name}: {reason}")]
    InvalidAssumption { name: &'static str, reason: String },
}

/// Fatal errors for a single offer-stack request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StackError {
    /// No tranche allocation satisfies all constraints.
    #[error("offer stack infeasible: {unmet} unfunded (binding constraint: {binding})")]
    Infeasible {
        unmet: Amount,
        binding: BindingConstraint,
    },

    /// The target valuation must be positive.
    #[error("target valuation must be positive, got {value}")]
    NonPositiveValuation { value: Amount },

    /// A configured share cap is outside [0, 1].
    #[error("invalid share cap {name}: {value}")]
    InvalidShare { name: &'static str, value: Decimal },
}

/// Fatal errors for a single matching request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    /// A factor weight is negative or non-finite.
    #[error("factor weight {field} must be non-negative and finite, got {value}")]
    NegativeWeight { field: &'static str, value: f64 },

    /// All factor weights are zero; no ranking is possible.
    #[error("factor weights must not all be zero")]
    ZeroWeights,
}

/// External collaborator failures, distinct from domain errors.
///
/// Raised only after retries are exhausted and no cached fallback exists.
#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    #[error("{service} unavailable after {attempts} attempts: {reason}")]
    Unavailable {
        service: &'static str,
        attempts: u32,
        reason: String,
    },

    #[error("{service} returned a malformed response: {reason}")]
    MalformedResponse {
        service: &'static str,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn insufficient_data_lists_failures() {
        let err = ValuationError::InsufficientData {
            failures: vec![
                (Methodology::Comparables, "2 peers, need 4".to_string()),
                (Methodology::PrecedentTransactions, "no transactions".to_string()),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("comparables: 2 peers"));
        assert!(msg.contains("precedent_transactions: no transactions"));
    }

    #[test]
    fn infeasible_names_binding_constraint() {
        let err = StackError::Infeasible {
            unmet: dec!(1_500_000),
            binding: BindingConstraint::LeverageCap,
        };
        assert!(err.to_string().contains("leverage cap"));
        assert!(err.to_string().contains("1500000"));
    }
}
