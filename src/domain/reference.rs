//! Reference data consumed during valuation: peer multiples, precedent
//! transactions, and industry benchmarks.
//!
//! Reference tables are read-only during any scoring or valuation pass. A
//! pass works against an immutable snapshot; updates are staged and swapped
//! atomically between passes by the provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::health::IndustryBenchmarks;
use super::profile::SizeBand;

/// One comparable company's trading multiple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerMultiple {
    /// Peer company name or ticker.
    pub company: String,
    pub industry: String,
    pub size_band: SizeBand,
    /// Enterprise value over EBITDA.
    pub ev_to_ebitda: f64,
}

/// One historical transaction's paid multiple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecedentTransaction {
    /// Acquired company's industry.
    pub target_industry: String,
    pub size_band: SizeBand,
    /// Enterprise value over EBITDA paid at close.
    pub ev_to_ebitda: f64,
    /// Close date; drives recency weighting.
    pub closed_at: DateTime<Utc>,
}

/// Immutable bundle of reference data for one industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSnapshot {
    pub benchmarks: IndustryBenchmarks,
    pub peer_multiples: Vec<PeerMultiple>,
    pub precedent_transactions: Vec<PrecedentTransaction>,
}

impl ReferenceSnapshot {
    /// Industry this snapshot describes.
    #[must_use]
    pub fn industry(&self) -> &str {
        &self.benchmarks.industry
    }
}
