//! Enumerated financial ratios and the immutable [`RatioSet`].
//!
//! Every recognized ratio is a fixed [`RatioId`] member rather than a loose
//! string key, and a ratio whose denominator is zero or economically
//! negative carries [`RatioValue::Undefined`] as a first-class value instead
//! of being absent. Downstream consumers must handle `Undefined` explicitly;
//! it is never an error.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Category a ratio belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioCategory {
    Liquidity,
    Profitability,
    Leverage,
    Efficiency,
}

impl RatioCategory {
    /// All categories in display order.
    pub const ALL: [RatioCategory; 4] = [
        RatioCategory::Liquidity,
        RatioCategory::Profitability,
        RatioCategory::Leverage,
        RatioCategory::Efficiency,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            RatioCategory::Liquidity => "liquidity",
            RatioCategory::Profitability => "profitability",
            RatioCategory::Leverage => "leverage",
            RatioCategory::Efficiency => "efficiency",
        }
    }
}

impl fmt::Display for RatioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed set of recognized ratios.
///
/// The enum is the single source of truth for which ratios exist; the
/// analyzer computes every member for every statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioId {
    // Liquidity
    CurrentRatio,
    QuickRatio,
    CashRatio,
    WorkingCapitalToAssets,
    OperatingCashFlowRatio,
    ReceivablesToCurrentAssets,
    InventoryToCurrentAssets,
    DefensiveInterval,

    // Profitability
    GrossMargin,
    OperatingMargin,
    EbitdaMargin,
    PretaxMargin,
    NetMargin,
    ReturnOnAssets,
    ReturnOnEquity,
    ReturnOnCapitalEmployed,
    OperatingCashFlowMargin,
    FreeCashFlowMargin,
    EffectiveTaxRate,
    EarningsQuality,

    // Leverage
    DebtToEquity,
    DebtToAssets,
    LongTermDebtToEquity,
    EquityMultiplier,
    EquityToAssets,
    InterestCoverage,
    CashFlowToDebt,
    DebtToEbitda,
    NetDebtToEbitda,
    CurrentLiabilitiesToTotalLiabilities,

    // Efficiency
    AssetTurnover,
    NonCurrentAssetTurnover,
    WorkingCapitalTurnover,
    InventoryTurnover,
    ReceivablesTurnover,
    DaysSalesOutstanding,
    DaysInventoryOutstanding,
    OperatingExpenseRatio,
    CapexToRevenue,
    CapexToDepreciation,
}

impl RatioId {
    /// Every recognized ratio, grouped by category.
    pub const ALL: [RatioId; 40] = [
        RatioId::CurrentRatio,
        RatioId::QuickRatio,
        RatioId::CashRatio,
        RatioId::WorkingCapitalToAssets,
        RatioId::OperatingCashFlowRatio,
        RatioId::ReceivablesToCurrentAssets,
        RatioId::InventoryToCurrentAssets,
        RatioId::DefensiveInterval,
        RatioId::GrossMargin,
        RatioId::OperatingMargin,
        RatioId::EbitdaMargin,
        RatioId::PretaxMargin,
        RatioId::NetMargin,
        RatioId::ReturnOnAssets,
        RatioId::ReturnOnEquity,
        RatioId::ReturnOnCapitalEmployed,
        RatioId::OperatingCashFlowMargin,
        RatioId::FreeCashFlowMargin,
        RatioId::EffectiveTaxRate,
        RatioId::EarningsQuality,
        RatioId::DebtToEquity,
        RatioId::DebtToAssets,
        RatioId::LongTermDebtToEquity,
        RatioId::EquityMultiplier,
        RatioId::EquityToAssets,
        RatioId::InterestCoverage,
        RatioId::CashFlowToDebt,
        RatioId::DebtToEbitda,
        RatioId::NetDebtToEbitda,
        RatioId::CurrentLiabilitiesToTotalLiabilities,
        RatioId::AssetTurnover,
        RatioId::NonCurrentAssetTurnover,
        RatioId::WorkingCapitalTurnover,
        RatioId::InventoryTurnover,
        RatioId::ReceivablesTurnover,
        RatioId::DaysSalesOutstanding,
        RatioId::DaysInventoryOutstanding,
        RatioId::OperatingExpenseRatio,
        RatioId::CapexToRevenue,
        RatioId::CapexToDepreciation,
    ];

    /// Category this ratio belongs to.
    #[must_use]
    pub const fn category(&self) -> RatioCategory {
        match self {
            RatioId::CurrentRatio
            | RatioId::QuickRatio
            | RatioId::CashRatio
            | RatioId::WorkingCapitalToAssets
            | RatioId::OperatingCashFlowRatio
            | RatioId::ReceivablesToCurrentAssets
            | RatioId::InventoryToCurrentAssets
            | RatioId::DefensiveInterval => RatioCategory::Liquidity,

            RatioId::GrossMargin
            | RatioId::OperatingMargin
            | RatioId::EbitdaMargin
            | RatioId::PretaxMargin
            | RatioId::NetMargin
            | RatioId::ReturnOnAssets
            | RatioId::ReturnOnEquity
            | RatioId::ReturnOnCapitalEmployed
            | RatioId::OperatingCashFlowMargin
            | RatioId::FreeCashFlowMargin
            | RatioId::EffectiveTaxRate
            | RatioId::EarningsQuality => RatioCategory::Profitability,

            RatioId::DebtToEquity
            | RatioId::DebtToAssets
            | RatioId::LongTermDebtToEquity
            | RatioId::EquityMultiplier
            | RatioId::EquityToAssets
            | RatioId::InterestCoverage
            | RatioId::CashFlowToDebt
            | RatioId::DebtToEbitda
            | RatioId::NetDebtToEbitda
            | RatioId::CurrentLiabilitiesToTotalLiabilities => RatioCategory::Leverage,

            RatioId::AssetTurnover
            | RatioId::NonCurrentAssetTurnover
            | RatioId::WorkingCapitalTurnover
            | RatioId::InventoryTurnover
            | RatioId::ReceivablesTurnover
            | RatioId::DaysSalesOutstanding
            | RatioId::DaysInventoryOutstanding
            | RatioId::OperatingExpenseRatio
            | RatioId::CapexToRevenue
            | RatioId::CapexToDepreciation => RatioCategory::Efficiency,
        }
    }

    /// Stable snake_case name used in config files and display.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            RatioId::CurrentRatio => "current_ratio",
            RatioId::QuickRatio => "quick_ratio",
            RatioId::CashRatio => "cash_ratio",
            RatioId::WorkingCapitalToAssets => "working_capital_to_assets",
            RatioId::OperatingCashFlowRatio => "operating_cash_flow_ratio",
            RatioId::ReceivablesToCurrentAssets => "receivables_to_current_assets",
            RatioId::InventoryToCurrentAssets => "inventory_to_current_assets",
            RatioId::DefensiveInterval => "defensive_interval",
            RatioId::GrossMargin => "gross_margin",
            RatioId::OperatingMargin => "operating_margin",
            RatioId::EbitdaMargin => "ebitda_margin",
            RatioId::PretaxMargin => "pretax_margin",
            RatioId::NetMargin => "net_margin",
            RatioId::ReturnOnAssets => "return_on_assets",
            RatioId::ReturnOnEquity => "return_on_equity",
            RatioId::ReturnOnCapitalEmployed => "return_on_capital_employed",
            RatioId::OperatingCashFlowMargin => "operating_cash_flow_margin",
            RatioId::FreeCashFlowMargin => "free_cash_flow_margin",
            RatioId::EffectiveTaxRate => "effective_tax_rate",
            RatioId::EarningsQuality => "earnings_quality",
            RatioId::DebtToEquity => "debt_to_equity",
            RatioId::DebtToAssets => "debt_to_assets",
            RatioId::LongTermDebtToEquity => "long_term_debt_to_equity",
            RatioId::EquityMultiplier => "equity_multiplier",
            RatioId::EquityToAssets => "equity_to_assets",
            RatioId::InterestCoverage => "interest_coverage",
            RatioId::CashFlowToDebt => "cash_flow_to_debt",
            RatioId::DebtToEbitda => "debt_to_ebitda",
            RatioId::NetDebtToEbitda => "net_debt_to_ebitda",
            RatioId::CurrentLiabilitiesToTotalLiabilities => {
                "current_liabilities_to_total_liabilities"
            }
            RatioId::AssetTurnover => "asset_turnover",
            RatioId::NonCurrentAssetTurnover => "non_current_asset_turnover",
            RatioId::WorkingCapitalTurnover => "working_capital_turnover",
            RatioId::InventoryTurnover => "inventory_turnover",
            RatioId::ReceivablesTurnover => "receivables_turnover",
            RatioId::DaysSalesOutstanding => "days_sales_outstanding",
            RatioId::DaysInventoryOutstanding => "days_inventory_outstanding",
            RatioId::OperatingExpenseRatio => "operating_expense_ratio",
            RatioId::CapexToRevenue => "capex_to_revenue",
            RatioId::CapexToDepreciation => "capex_to_depreciation",
        }
    }
}

impl fmt::Display for RatioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of a single computed ratio.
///
/// `Undefined` marks a ratio whose denominator was zero or economically
/// negative. It is a legitimate result, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioValue {
    Defined(f64),
    Undefined,
}

impl RatioValue {
    /// The numeric value, if defined.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            RatioValue::Defined(v) => Some(*v),
            RatioValue::Undefined => None,
        }
    }

    /// Whether the ratio is defined.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        matches!(self, RatioValue::Defined(_))
    }
}

impl fmt::Display for RatioValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatioValue::Defined(v) => write!(f, "{v:.4}"),
            RatioValue::Undefined => f.write_str("undefined"),
        }
    }
}

/// Complete, immutable set of computed ratios for one statement.
///
/// Holds a value for every [`RatioId`] member. Construction is owned by the
/// analyzer; once built the set never changes, so recomputation over an
/// unchanged statement is bit-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    values: BTreeMap<RatioId, RatioValue>,
}

impl RatioSet {
    /// Build a set from per-ratio values.
    ///
    /// Any ratio missing from `values` is stored as `Undefined` so the set
    /// always covers the full enum.
    #[must_use]
    pub fn from_values(values: BTreeMap<RatioId, RatioValue>) -> Self {
        let mut full = values;
        for id in RatioId::ALL {
            full.entry(id).or_insert(RatioValue::Undefined);
        }
        Self { values: full }
    }

    /// Value for a ratio. Total over [`RatioId`].
    #[must_use]
    pub fn get(&self, id: RatioId) -> RatioValue {
        self.values
            .get(&id)
            .copied()
            .unwrap_or(RatioValue::Undefined)
    }

    /// Iterate all ratios in stable enum order.
    pub fn iter(&self) -> impl Iterator<Item = (RatioId, RatioValue)> + '_ {
        self.values.iter().map(|(id, v)| (*id, *v))
    }

    /// Iterate ratios in one category.
    pub fn in_category(
        &self,
        category: RatioCategory,
    ) -> impl Iterator<Item = (RatioId, RatioValue)> + '_ {
        self.iter().filter(move |(id, _)| id.category() == category)
    }

    /// Number of defined ratios.
    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.values.values().filter(|v| v.is_defined()).count()
    }

    /// Fraction of ratios that are defined, in [0, 1].
    #[must_use]
    pub fn completeness(&self) -> f64 {
        self.defined_count() as f64 / RatioId::ALL.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_every_category() {
        for category in RatioCategory::ALL {
            assert!(
                RatioId::ALL.iter().any(|r| r.category() == category),
                "no ratios in {category}"
            );
        }
        assert_eq!(RatioId::ALL.len(), 40);
    }

    #[test]
    fn from_values_fills_missing_as_undefined() {
        let mut values = BTreeMap::new();
        values.insert(RatioId::CurrentRatio, RatioValue::Defined(1.8));
        let set = RatioSet::from_values(values);

        assert_eq!(set.get(RatioId::CurrentRatio), RatioValue::Defined(1.8));
        assert_eq!(set.get(RatioId::NetMargin), RatioValue::Undefined);
        assert_eq!(set.defined_count(), 1);
    }

    #[test]
    fn completeness_is_fraction_of_defined() {
        let mut values = BTreeMap::new();
        for id in RatioId::ALL.iter().take(20) {
            values.insert(*id, RatioValue::Defined(1.0));
        }
        let set = RatioSet::from_values(values);
        assert!((set.completeness() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_value_display() {
        assert_eq!(RatioValue::Defined(1.25).to_string(), "1.2500");
        assert_eq!(RatioValue::Undefined.to_string(), "undefined");
    }
}
