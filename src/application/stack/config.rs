//! Offer stack generator configuration.

use rust_decimal::Decimal;

use serde::Deserialize;

use crate::domain::error::StackError;
use crate::domain::Rate;

/// Tranche share caps and rates for the allocator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StackConfig {
    /// Maximum equity share of total consideration.
    #[serde(default = "default_max_equity_share")]
    pub max_equity_share: Decimal,

    /// Maximum mezzanine share of total consideration.
    #[serde(default = "default_max_mezzanine_share")]
    pub max_mezzanine_share: Decimal,

    /// Maximum earnout share of total consideration.
    #[serde(default = "default_max_earnout_share")]
    pub max_earnout_share: Decimal,

    /// Funding equality tolerance.
    #[serde(default = "default_epsilon")]
    pub epsilon: Decimal,

    /// Senior debt coupon.
    #[serde(default = "default_senior_rate")]
    pub senior_debt_rate: Rate,

    /// Mezzanine coupon.
    #[serde(default = "default_mezzanine_rate")]
    pub mezzanine_rate: Rate,
}

fn default_max_equity_share() -> Decimal {
    Decimal::new(40, 2) // 40%
}

fn default_max_mezzanine_share() -> Decimal {
    Decimal::new(15, 2) // 15%
}

fn default_max_earnout_share() -> Decimal {
    Decimal::new(25, 2) // 25%
}

fn default_epsilon() -> Decimal {
    Decimal::new(1, 2) // one cent
}

fn default_senior_rate() -> Rate {
    Decimal::new(65, 3) // 6.5%
}

fn default_mezzanine_rate() -> Rate {
    Decimal::new(120, 3) // 12%
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            max_equity_share: default_max_equity_share(),
            max_mezzanine_share: default_max_mezzanine_share(),
            max_earnout_share: default_max_earnout_share(),
            epsilon: default_epsilon(),
            senior_debt_rate: default_senior_rate(),
            mezzanine_rate: default_mezzanine_rate(),
        }
    }
}

impl StackConfig {
    /// Validate share caps against declared ranges.
    pub fn validate(&self) -> Result<(), StackError> {
        for (name, value) in [
            ("max_equity_share", self.max_equity_share),
            ("max_mezzanine_share", self.max_mezzanine_share),
            ("max_earnout_share", self.max_earnout_share),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(StackError::InvalidShare {
                    name,
                    value,
                });
            }
        }
        if self.epsilon < Decimal::ZERO {
            return Err(StackError::InvalidShare {
                name: "epsilon",
                value: self.epsilon,
            });
        }
        Ok(())
    }
}
