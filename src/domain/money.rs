//! Monetary types for deal consideration and statement line items.

use rust_decimal::Decimal;

/// Monetary amount represented as a Decimal for precision.
pub type Amount = Decimal;

/// Annual rate expressed as a fraction (0.065 = 6.5%), as a Decimal.
pub type Rate = Decimal;
