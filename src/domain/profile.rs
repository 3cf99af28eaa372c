//! Deal and buyer profiles: the feature vectors the matching engine scores.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{BuyerId, DealId};
use super::money::Amount;

/// Revenue size band a company falls into.
///
/// Bands are ordered so distance between them is meaningful for size-fit
/// scoring.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SizeBand {
    /// Under $1M revenue.
    Micro,
    /// $1M - $10M.
    Small,
    /// $10M - $50M.
    LowerMiddle,
    /// $50M - $250M.
    Middle,
    /// $250M - $1B.
    UpperMiddle,
    /// Over $1B.
    Large,
}

impl SizeBand {
    /// Band for an annual revenue figure.
    #[must_use]
    pub fn of_revenue(revenue: Amount) -> Self {
        let million = Decimal::from(1_000_000);
        if revenue < million {
            SizeBand::Micro
        } else if revenue < million * Decimal::from(10) {
            SizeBand::Small
        } else if revenue < million * Decimal::from(50) {
            SizeBand::LowerMiddle
        } else if revenue < million * Decimal::from(250) {
            SizeBand::Middle
        } else if revenue < million * Decimal::from(1000) {
            SizeBand::UpperMiddle
        } else {
            SizeBand::Large
        }
    }

    /// Ordinal position, for band-distance computations.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            SizeBand::Micro => 0,
            SizeBand::Small => 1,
            SizeBand::LowerMiddle => 2,
            SizeBand::Middle => 3,
            SizeBand::UpperMiddle => 4,
            SizeBand::Large => 5,
        }
    }

    /// Number of bands between two companies.
    #[must_use]
    pub const fn distance(&self, other: &SizeBand) -> usize {
        self.index().abs_diff(other.index())
    }
}

/// Buyer risk posture toward target financial health.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskAppetite {
    /// Only targets at or above benchmark health.
    Conservative,
    #[default]
    Balanced,
    /// Comfortable with distressed or turnaround targets.
    Aggressive,
}

impl RiskAppetite {
    /// Health score below which alignment starts degrading.
    #[must_use]
    pub const fn health_floor(&self) -> f64 {
        match self {
            RiskAppetite::Conservative => 70.0,
            RiskAppetite::Balanced => 50.0,
            RiskAppetite::Aggressive => 30.0,
        }
    }
}

/// A sell-side deal as listed in the platform's deal store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealProfile {
    pub id: DealId,
    /// Normalized industry label (lowercase slug).
    pub industry: String,
    pub size_band: SizeBand,
    /// Region code, e.g. "us-west" or "emea".
    pub geography: String,
    /// Free-form strategic descriptors ("recurring-revenue", "b2b-saas").
    pub strategic_tags: Vec<String>,
    /// Composite financial health score, 0-100.
    pub health_score: f64,
    pub annual_revenue: Amount,
    pub ebitda: Amount,
    /// Seller's asking price, when published.
    pub asking_price: Option<Amount>,
    /// When the deal was listed; used for ranking tie-breaks.
    pub listed_at: DateTime<Utc>,
    /// Fraction of the deal record's fields that are populated, in [0, 1].
    pub data_completeness: f64,
}

/// A buy-side mandate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerProfile {
    pub id: BuyerId,
    /// Industries the mandate targets. Empty means no industry preference.
    pub target_industries: Vec<String>,
    /// Preferred size range, inclusive.
    pub size_band_min: SizeBand,
    pub size_band_max: SizeBand,
    /// Acceptable regions. Empty means geography-agnostic.
    pub geographies: Vec<String>,
    pub strategic_tags: Vec<String>,
    pub risk_appetite: RiskAppetite,
    /// Cash available for the equity portion of a deal.
    pub capital_limit: Amount,
}

impl BuyerProfile {
    /// Whether a size band falls inside the mandate's preferred range.
    #[must_use]
    pub fn accepts_band(&self, band: SizeBand) -> bool {
        band >= self.size_band_min && band <= self.size_band_max
    }
}
