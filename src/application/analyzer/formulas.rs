//! Per-ratio formulas.
//!
//! Each formula guards its denominator: zero or economically negative
//! denominators produce [`RatioValue::Undefined`] rather than an error.
//! All divisions happen in Decimal and convert at the boundary, so
//! recomputation over an unchanged statement is bit-identical.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::{FinancialStatement, RatioId, RatioValue};

const DAYS_PER_YEAR: i64 = 365;

/// Divide, requiring a strictly positive denominator.
fn ratio(numerator: Decimal, denominator: Decimal) -> RatioValue {
    if denominator <= Decimal::ZERO {
        return RatioValue::Undefined;
    }
    match (numerator / denominator).to_f64() {
        Some(v) => RatioValue::Defined(v),
        None => RatioValue::Undefined,
    }
}

/// Compute one ratio from a statement. Total over [`RatioId`].
#[must_use]
pub fn compute(id: RatioId, s: &FinancialStatement) -> RatioValue {
    let days = Decimal::from(DAYS_PER_YEAR);
    match id {
        // Liquidity
        RatioId::CurrentRatio => ratio(s.current_assets, s.current_liabilities),
        RatioId::QuickRatio => ratio(s.current_assets - s.inventory, s.current_liabilities),
        RatioId::CashRatio => ratio(s.cash_and_equivalents, s.current_liabilities),
        RatioId::WorkingCapitalToAssets => ratio(s.working_capital(), s.total_assets),
        RatioId::OperatingCashFlowRatio => ratio(s.operating_cash_flow, s.current_liabilities),
        RatioId::ReceivablesToCurrentAssets => ratio(s.accounts_receivable, s.current_assets),
        RatioId::InventoryToCurrentAssets => ratio(s.inventory, s.current_assets),
        RatioId::DefensiveInterval => ratio(
            (s.cash_and_equivalents + s.accounts_receivable) * days,
            s.cost_of_goods_sold + s.operating_expenses,
        ),

        // Profitability
        RatioId::GrossMargin => ratio(s.gross_profit(), s.revenue),
        RatioId::OperatingMargin => ratio(s.ebit(), s.revenue),
        RatioId::EbitdaMargin => ratio(s.ebitda, s.revenue),
        RatioId::PretaxMargin => ratio(s.pretax_income(), s.revenue),
        RatioId::NetMargin => ratio(s.net_income, s.revenue),
        RatioId::ReturnOnAssets => ratio(s.net_income, s.total_assets),
        RatioId::ReturnOnEquity => ratio(s.net_income, s.total_equity),
        RatioId::ReturnOnCapitalEmployed => {
            ratio(s.ebit(), s.total_assets - s.current_liabilities)
        }
        RatioId::OperatingCashFlowMargin => ratio(s.operating_cash_flow, s.revenue),
        RatioId::FreeCashFlowMargin => ratio(s.free_cash_flow(), s.revenue),
        RatioId::EffectiveTaxRate => ratio(s.tax_expense, s.pretax_income()),
        RatioId::EarningsQuality => ratio(s.operating_cash_flow, s.net_income),

        // Leverage
        RatioId::DebtToEquity => ratio(s.total_liabilities, s.total_equity),
        RatioId::DebtToAssets => ratio(s.total_liabilities, s.total_assets),
        RatioId::LongTermDebtToEquity => ratio(s.long_term_liabilities(), s.total_equity),
        RatioId::EquityMultiplier => ratio(s.total_assets, s.total_equity),
        RatioId::EquityToAssets => ratio(s.total_equity, s.total_assets),
        RatioId::InterestCoverage => ratio(s.ebit(), s.interest_expense),
        RatioId::CashFlowToDebt => ratio(s.operating_cash_flow, s.total_liabilities),
        RatioId::DebtToEbitda => ratio(s.total_liabilities, s.ebitda),
        RatioId::NetDebtToEbitda => ratio(s.net_debt(), s.ebitda),
        RatioId::CurrentLiabilitiesToTotalLiabilities => {
            ratio(s.current_liabilities, s.total_liabilities)
        }

        // Efficiency
        RatioId::AssetTurnover => ratio(s.revenue, s.total_assets),
        RatioId::NonCurrentAssetTurnover => ratio(s.revenue, s.non_current_assets()),
        RatioId::WorkingCapitalTurnover => ratio(s.revenue, s.working_capital()),
        RatioId::InventoryTurnover => ratio(s.cost_of_goods_sold, s.inventory),
        RatioId::ReceivablesTurnover => ratio(s.revenue, s.accounts_receivable),
        RatioId::DaysSalesOutstanding => ratio(s.accounts_receivable * days, s.revenue),
        RatioId::DaysInventoryOutstanding => ratio(s.inventory * days, s.cost_of_goods_sold),
        RatioId::OperatingExpenseRatio => ratio(s.operating_expenses, s.revenue),
        RatioId::CapexToRevenue => ratio(s.capital_expenditure, s.revenue),
        RatioId::CapexToDepreciation => {
            ratio(s.capital_expenditure, s.depreciation_amortization)
        }
    }
}

/// Whether a larger value of this ratio indicates better health.
///
/// Used to orient z-scores when compositing the health score.
#[must_use]
pub const fn higher_is_better(id: RatioId) -> bool {
    !matches!(
        id,
        RatioId::DebtToEquity
            | RatioId::DebtToAssets
            | RatioId::LongTermDebtToEquity
            | RatioId::EquityMultiplier
            | RatioId::DebtToEbitda
            | RatioId::NetDebtToEbitda
            | RatioId::CurrentLiabilitiesToTotalLiabilities
            | RatioId::DaysSalesOutstanding
            | RatioId::DaysInventoryOutstanding
            | RatioId::OperatingExpenseRatio
            | RatioId::EffectiveTaxRate
            | RatioId::ReceivablesToCurrentAssets
            | RatioId::InventoryToCurrentAssets
            | RatioId::CapexToRevenue
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::statement;
    use rust_decimal_macros::dec;

    #[test]
    fn current_ratio_matches_hand_calculation() {
        let s = statement();
        let expected = (s.current_assets / s.current_liabilities)
            .to_f64()
            .unwrap();
        match compute(RatioId::CurrentRatio, &s) {
            RatioValue::Defined(v) => assert!((v - expected).abs() < 1e-12),
            RatioValue::Undefined => panic!("expected defined current ratio"),
        }
    }

    #[test]
    fn zero_denominator_is_undefined() {
        let mut s = statement();
        s.current_liabilities = Decimal::ZERO;
        assert_eq!(compute(RatioId::CurrentRatio, &s), RatioValue::Undefined);
        assert_eq!(compute(RatioId::QuickRatio, &s), RatioValue::Undefined);
    }

    #[test]
    fn negative_equity_makes_equity_ratios_undefined() {
        let mut s = statement();
        s.total_equity = dec!(-2_000_000);
        assert_eq!(compute(RatioId::ReturnOnEquity, &s), RatioValue::Undefined);
        assert_eq!(compute(RatioId::DebtToEquity, &s), RatioValue::Undefined);
        assert_eq!(compute(RatioId::EquityMultiplier, &s), RatioValue::Undefined);
    }

    #[test]
    fn interest_coverage_undefined_without_interest() {
        let mut s = statement();
        s.interest_expense = Decimal::ZERO;
        assert_eq!(compute(RatioId::InterestCoverage, &s), RatioValue::Undefined);
    }

    #[test]
    fn days_sales_outstanding_matches_turnover() {
        let s = statement();
        let dso = compute(RatioId::DaysSalesOutstanding, &s).value().unwrap();
        let turnover = compute(RatioId::ReceivablesTurnover, &s).value().unwrap();
        assert!((dso - 365.0 / turnover).abs() < 1e-9);
    }
}
