//! Analyzer configuration.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::RatioId;

/// Financial statement analyzer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    /// Balance-sheet identity tolerance, relative to total assets
    /// (0.01 = 1%).
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: Decimal,

    /// Relative tolerance for EBITDA consistency against its derived
    /// income-statement components.
    #[serde(default = "default_ebitda_tolerance")]
    pub ebitda_tolerance: Decimal,

    /// Minimum benchmarked ratios for a representative health score.
    #[serde(default = "default_min_health_ratios")]
    pub min_health_ratios: usize,

    /// Health-score weight per ratio. Ratios absent from the map do not
    /// contribute. Externally supplied configuration, not a hard-coded
    /// scheme.
    #[serde(default = "default_health_weights")]
    pub health_weights: BTreeMap<RatioId, f64>,
}

fn default_balance_tolerance() -> Decimal {
    Decimal::new(1, 2) // 1%
}

fn default_ebitda_tolerance() -> Decimal {
    Decimal::new(5, 2) // 5%
}

const fn default_min_health_ratios() -> usize {
    6
}

fn default_health_weights() -> BTreeMap<RatioId, f64> {
    BTreeMap::from([
        (RatioId::CurrentRatio, 1.0),
        (RatioId::QuickRatio, 0.5),
        (RatioId::GrossMargin, 1.0),
        (RatioId::OperatingMargin, 1.0),
        (RatioId::NetMargin, 1.0),
        (RatioId::ReturnOnAssets, 1.0),
        (RatioId::ReturnOnEquity, 1.0),
        (RatioId::DebtToEquity, 1.0),
        (RatioId::InterestCoverage, 1.0),
        (RatioId::AssetTurnover, 0.5),
        (RatioId::OperatingCashFlowMargin, 0.75),
        (RatioId::NetDebtToEbitda, 0.75),
    ])
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            balance_tolerance: default_balance_tolerance(),
            ebitda_tolerance: default_ebitda_tolerance(),
            min_health_ratios: default_min_health_ratios(),
            health_weights: default_health_weights(),
        }
    }
}
