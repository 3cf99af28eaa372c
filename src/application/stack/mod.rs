//! Offer stack generator.
//!
//! Allocates financing tranches against a blended valuation in strict
//! priority order: equity, senior debt, mezzanine, then earnout. Every
//! tranche respects its bound; a residual funding gap fails the request
//! with the unmet amount and the first constraint that clamped an
//! allocation, never by silently violating a bound.

pub mod config;

pub use config::StackConfig;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::domain::error::StackError;
use crate::domain::{
    Amount, BindingConstraint, BlendedValuation, OfferStack, StackConstraints, Tranche,
    TrancheKind,
};

/// The offer stack generator.
#[derive(Debug, Clone)]
pub struct OfferStackGenerator {
    config: StackConfig,
}

impl OfferStackGenerator {
    /// Create a generator from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a share cap is outside its declared range.
    pub fn new(config: StackConfig) -> Result<Self, StackError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Allocate tranches funding `valuation` for a target with the given
    /// EBITDA.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Infeasible`] with the unmet amount and the
    /// first binding constraint when no allocation satisfies every bound.
    pub fn generate(
        &self,
        valuation: &BlendedValuation,
        ebitda: Amount,
        constraints: &StackConstraints,
    ) -> Result<OfferStack, StackError> {
        let target = valuation.point_estimate;
        if target <= Decimal::ZERO {
            return Err(StackError::NonPositiveValuation { value: target });
        }

        let mut remaining = target;
        let mut tranches = Vec::with_capacity(4);
        let mut first_binding: Option<BindingConstraint> = None;

        // 1. Equity, bounded by the buyer's cash and the equity share cap.
        let share_cap = target * self.config.max_equity_share;
        let equity_cap = constraints.buyer_cash_ceiling.min(share_cap);
        let equity = remaining.min(equity_cap).max(Decimal::ZERO);
        if equity < remaining {
            let binding = if constraints.buyer_cash_ceiling <= share_cap {
                BindingConstraint::BuyerCashCeiling
            } else {
                BindingConstraint::MaxEquityShare
            };
            first_binding.get_or_insert(binding);
        }
        remaining -= equity;
        tranches.push(Tranche {
            kind: TrancheKind::Equity,
            amount: equity,
            rate: Decimal::ZERO,
            min: Decimal::ZERO,
            max: equity_cap,
        });

        // 2. Senior debt, bounded by the leverage cap on EBITDA.
        let senior_cap = (constraints.max_leverage * ebitda).max(Decimal::ZERO);
        let senior = remaining.min(senior_cap);
        if remaining > Decimal::ZERO && senior < remaining {
            first_binding.get_or_insert(BindingConstraint::LeverageCap);
        }
        remaining -= senior;
        tranches.push(Tranche {
            kind: TrancheKind::SeniorDebt,
            amount: senior,
            rate: self.config.senior_debt_rate,
            min: Decimal::ZERO,
            max: senior_cap,
        });

        // 3. Mezzanine, bounded by its share cap.
        let mezzanine_cap = target * self.config.max_mezzanine_share;
        let mezzanine = remaining.min(mezzanine_cap);
        if remaining > Decimal::ZERO && mezzanine < remaining {
            first_binding.get_or_insert(BindingConstraint::MaxMezzanineShare);
        }
        remaining -= mezzanine;
        tranches.push(Tranche {
            kind: TrancheKind::Mezzanine,
            amount: mezzanine,
            rate: self.config.mezzanine_rate,
            min: Decimal::ZERO,
            max: mezzanine_cap,
        });

        // 4. Earnout, only when the deal permits deferred consideration.
        if remaining > Decimal::ZERO {
            if constraints.earnout_permitted {
                let earnout_cap = target * self.config.max_earnout_share;
                let earnout = remaining.min(earnout_cap);
                if earnout < remaining {
                    first_binding.get_or_insert(BindingConstraint::MaxEarnoutShare);
                }
                remaining -= earnout;
                tranches.push(Tranche {
                    kind: TrancheKind::Earnout,
                    amount: earnout,
                    rate: Decimal::ZERO,
                    min: Decimal::ZERO,
                    max: earnout_cap,
                });
            } else {
                first_binding.get_or_insert(BindingConstraint::EarnoutNotPermitted);
            }
        }

        if remaining > self.config.epsilon {
            let binding = first_binding.unwrap_or(BindingConstraint::BuyerCashCeiling);
            debug!(unmet = %remaining, binding = %binding, "offer stack infeasible");
            return Err(StackError::Infeasible {
                unmet: remaining,
                binding,
            });
        }

        let stack = OfferStack { target, tranches };

        // Deferred consideration cannot satisfy the seller's close-day floor.
        if stack.cash_at_close() < constraints.seller_min_cash_at_close {
            let unmet = constraints.seller_min_cash_at_close - stack.cash_at_close();
            debug!(unmet = %unmet, "seller cash-at-close floor unmet");
            return Err(StackError::Infeasible {
                unmet,
                binding: BindingConstraint::SellerMinCashAtClose,
            });
        }

        info!(
            target = %target,
            equity = %stack.amount_of(TrancheKind::Equity),
            senior = %stack.amount_of(TrancheKind::SeniorDebt),
            mezzanine = %stack.amount_of(TrancheKind::Mezzanine),
            earnout = %stack.amount_of(TrancheKind::Earnout),
            "offer stack allocated"
        );
        Ok(stack)
    }
}
