//! Normalized financial statements supplied by accounting connectors.
//!
//! A [`FinancialStatement`] is the raw input to the analyzer: one reporting
//! period's income statement, balance sheet, and cash flow items, already
//! mapped to a fixed chart of accounts by the upstream connector. The
//! balance-sheet identity is checked here but violations are flagged by the
//! analyzer rather than rejected.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::PeriodId;
use super::money::Amount;

/// One period's normalized financial statement.
///
/// All amounts are in the deal's reporting currency. Derived figures
/// (gross profit, free cash flow) are computed, never stored, so a
/// statement cannot carry internally inconsistent derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatement {
    /// Reporting period this statement covers.
    pub period: PeriodId,

    // Income statement
    pub revenue: Amount,
    pub cost_of_goods_sold: Amount,
    pub operating_expenses: Amount,
    pub depreciation_amortization: Amount,
    pub interest_expense: Amount,
    pub tax_expense: Amount,
    pub net_income: Amount,
    pub ebitda: Amount,

    // Balance sheet
    pub cash_and_equivalents: Amount,
    pub accounts_receivable: Amount,
    pub inventory: Amount,
    pub current_assets: Amount,
    pub total_assets: Amount,
    pub current_liabilities: Amount,
    pub total_liabilities: Amount,
    pub total_equity: Amount,

    // Cash flow
    pub operating_cash_flow: Amount,
    pub capital_expenditure: Amount,
}

impl FinancialStatement {
    /// Signed gap in the balance-sheet identity: assets - (liabilities + equity).
    #[must_use]
    pub fn balance_gap(&self) -> Amount {
        self.total_assets - (self.total_liabilities + self.total_equity)
    }

    /// Whether the balance-sheet identity holds within `tolerance`.
    ///
    /// The tolerance is relative to total assets so large and small
    /// statements are held to the same standard.
    #[must_use]
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        if self.total_assets == Decimal::ZERO {
            return self.balance_gap() == Decimal::ZERO;
        }
        let relative = (self.balance_gap() / self.total_assets).abs();
        relative <= tolerance
    }

    /// Gross profit: revenue less cost of goods sold.
    #[must_use]
    pub fn gross_profit(&self) -> Amount {
        self.revenue - self.cost_of_goods_sold
    }

    /// Operating earnings before interest and tax.
    #[must_use]
    pub fn ebit(&self) -> Amount {
        self.ebitda - self.depreciation_amortization
    }

    /// Pre-tax income.
    #[must_use]
    pub fn pretax_income(&self) -> Amount {
        self.ebit() - self.interest_expense
    }

    /// Net working capital: current assets less current liabilities.
    #[must_use]
    pub fn working_capital(&self) -> Amount {
        self.current_assets - self.current_liabilities
    }

    /// Long-term liabilities: everything not due within the year.
    #[must_use]
    pub fn long_term_liabilities(&self) -> Amount {
        self.total_liabilities - self.current_liabilities
    }

    /// Non-current assets.
    #[must_use]
    pub fn non_current_assets(&self) -> Amount {
        self.total_assets - self.current_assets
    }

    /// Unlevered free cash flow: operating cash flow less capital expenditure.
    #[must_use]
    pub fn free_cash_flow(&self) -> Amount {
        self.operating_cash_flow - self.capital_expenditure
    }

    /// Debt net of cash on hand.
    #[must_use]
    pub fn net_debt(&self) -> Amount {
        self.total_liabilities - self.cash_and_equivalents
    }
}
