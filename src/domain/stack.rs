//! Financing structures: tranches, constraints, and the offer stack.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{Amount, Rate};

/// Kind of financing tranche, in allocation priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrancheKind {
    Equity,
    SeniorDebt,
    Mezzanine,
    Earnout,
}

impl TrancheKind {
    /// Whether the tranche pays out at close (earnouts are deferred).
    #[must_use]
    pub const fn is_cash_at_close(&self) -> bool {
        !matches!(self, TrancheKind::Earnout)
    }

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            TrancheKind::Equity => "equity",
            TrancheKind::SeniorDebt => "senior_debt",
            TrancheKind::Mezzanine => "mezzanine",
            TrancheKind::Earnout => "earnout",
        }
    }
}

impl fmt::Display for TrancheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One allocated layer of the financing structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tranche {
    pub kind: TrancheKind,
    pub amount: Amount,
    /// Annual cost of the tranche; zero for equity and earnout.
    pub rate: Rate,
    /// Lower bound the allocator honored (typically zero).
    pub min: Amount,
    /// Upper bound the allocator honored.
    pub max: Amount,
}

/// Ordered financing structure funding a target valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferStack {
    /// The valuation the stack funds.
    pub target: Amount,
    /// Tranches in priority order; amounts sum to `target` within epsilon.
    pub tranches: Vec<Tranche>,
}

impl OfferStack {
    /// Sum of all tranche amounts.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.tranches.iter().map(|t| t.amount).sum()
    }

    /// Consideration paid at close (everything except earnout).
    #[must_use]
    pub fn cash_at_close(&self) -> Amount {
        self.tranches
            .iter()
            .filter(|t| t.kind.is_cash_at_close())
            .map(|t| t.amount)
            .sum()
    }

    /// Amount allocated to one tranche kind, zero if absent.
    #[must_use]
    pub fn amount_of(&self, kind: TrancheKind) -> Amount {
        self.tranches
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    }

    /// Whether the stack funds the target within `epsilon`.
    #[must_use]
    pub fn is_fully_funded(&self, epsilon: Decimal) -> bool {
        (self.total() - self.target).abs() <= epsilon
    }
}

/// Deal-level constraints on the financing structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackConstraints {
    /// Senior debt cap as a multiple of EBITDA.
    pub max_leverage: Decimal,
    /// Cash the buyer can commit to the equity tranche.
    pub buyer_cash_ceiling: Amount,
    /// Minimum the seller must receive at close.
    pub seller_min_cash_at_close: Amount,
    /// Whether deferred earnout consideration is permitted.
    pub earnout_permitted: bool,
}

/// The constraint that stopped allocation from covering the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingConstraint {
    BuyerCashCeiling,
    MaxEquityShare,
    LeverageCap,
    MaxMezzanineShare,
    MaxEarnoutShare,
    EarnoutNotPermitted,
    SellerMinCashAtClose,
}

impl fmt::Display for BindingConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BindingConstraint::BuyerCashCeiling => "buyer cash ceiling",
            BindingConstraint::MaxEquityShare => "maximum equity share",
            BindingConstraint::LeverageCap => "leverage cap",
            BindingConstraint::MaxMezzanineShare => "maximum mezzanine share",
            BindingConstraint::MaxEarnoutShare => "maximum earnout share",
            BindingConstraint::EarnoutNotPermitted => "earnout not permitted",
            BindingConstraint::SellerMinCashAtClose => "seller minimum cash at close",
        };
        f.write_str(label)
    }
}
