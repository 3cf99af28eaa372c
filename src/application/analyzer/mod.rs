//! Financial intelligence analyzer.
//!
//! Normalizes a raw financial statement into a validated [`RatioSet`] with
//! attached data-quality findings and a confidence level. Validation never
//! aborts: an incomplete or unbalanced statement still produces every
//! ratio, marked low-confidence, with the findings carried alongside.

pub mod config;
mod formulas;
mod health;

pub use config::AnalyzerConfig;
pub use health::health_score;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::domain::error::DataQualityIssue;
use crate::domain::{FinancialStatement, RatioId, RatioSet};

/// Confidence attached to a ratio report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    /// Data-quality findings were attached; treat ratios with caution.
    Low,
}

/// Output of one analyzer pass: the ratio set plus its quality findings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioReport {
    pub ratio_set: RatioSet,
    pub issues: Vec<DataQualityIssue>,
    pub confidence: Confidence,
}

impl RatioReport {
    /// Whether any data-quality finding was attached.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Compute the full ratio set for a statement.
///
/// Deterministic: the same statement always yields a bit-identical
/// [`RatioSet`]. Quality findings downgrade confidence but never stop
/// computation; individual ratios with zero or economically negative
/// denominators come back as `Undefined`.
#[must_use]
pub fn compute_ratios(statement: &FinancialStatement, config: &AnalyzerConfig) -> RatioReport {
    let issues = validate(statement, config);

    let mut values = BTreeMap::new();
    for id in RatioId::ALL {
        values.insert(id, formulas::compute(id, statement));
    }
    let ratio_set = RatioSet::from_values(values);

    let confidence = if issues.is_empty() {
        Confidence::High
    } else {
        Confidence::Low
    };

    debug!(
        period = %statement.period,
        defined = ratio_set.defined_count(),
        issues = issues.len(),
        "ratio set computed"
    );

    RatioReport {
        ratio_set,
        issues,
        confidence,
    }
}

/// Collect data-quality findings for a statement.
fn validate(statement: &FinancialStatement, config: &AnalyzerConfig) -> Vec<DataQualityIssue> {
    let mut issues = Vec::new();

    if !statement.is_balanced(config.balance_tolerance) {
        issues.push(DataQualityIssue::BalanceIdentity {
            assets: statement.total_assets,
            claims: statement.total_liabilities + statement.total_equity,
        });
    }

    for (field, value) in [
        ("revenue", statement.revenue),
        ("total_assets", statement.total_assets),
        ("current_assets", statement.current_assets),
        ("current_liabilities", statement.current_liabilities),
        ("total_liabilities", statement.total_liabilities),
    ] {
        if value <= Decimal::ZERO {
            issues.push(DataQualityIssue::IncompleteLineItem { field });
        }
    }

    if statement.total_equity < Decimal::ZERO {
        issues.push(DataQualityIssue::NegativeEquity {
            equity: statement.total_equity,
        });
    }

    // EBITDA should reconcile to revenue - COGS - opex (before D&A).
    let derived = statement.revenue - statement.cost_of_goods_sold - statement.operating_expenses;
    if statement.revenue > Decimal::ZERO && derived != Decimal::ZERO {
        let gap = ((statement.ebitda - derived) / statement.revenue).abs();
        if gap > config.ebitda_tolerance {
            issues.push(DataQualityIssue::EbitdaInconsistent {
                reported: statement.ebitda,
                derived,
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::statement;
    use rust_decimal_macros::dec;

    #[test]
    fn clean_statement_is_high_confidence() {
        let report = compute_ratios(&statement(), &AnalyzerConfig::default());
        assert_eq!(report.confidence, Confidence::High);
        assert!(!report.has_issues());
        assert!(report.ratio_set.defined_count() >= 35);
    }

    #[test]
    fn unbalanced_statement_is_flagged_not_rejected() {
        let mut s = statement();
        s.total_assets += dec!(5_000_000);
        let report = compute_ratios(&s, &AnalyzerConfig::default());

        assert_eq!(report.confidence, Confidence::Low);
        assert!(report
            .issues
            .iter()
            .any(|i| matches!(i, DataQualityIssue::BalanceIdentity { .. })));
        // Computation still produced the full set.
        assert!(report.ratio_set.defined_count() >= 35);
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let s = statement();
        let config = AnalyzerConfig::default();
        let first = compute_ratios(&s, &config);
        let second = compute_ratios(&s, &config);
        assert_eq!(first.ratio_set, second.ratio_set);
    }

    #[test]
    fn missing_revenue_downgrades_confidence() {
        let mut s = statement();
        s.revenue = Decimal::ZERO;
        let report = compute_ratios(&s, &AnalyzerConfig::default());
        assert_eq!(report.confidence, Confidence::Low);
        assert!(report
            .issues
            .iter()
            .any(|i| matches!(i, DataQualityIssue::IncompleteLineItem { field: "revenue" })));
    }
}
