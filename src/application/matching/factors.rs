//! Per-factor similarity functions.
//!
//! Every factor returns a value in [0, 1] before weighting. An empty
//! preference list on the mandate side is "no preference" and scores as a
//! perfect fit rather than excluding every deal.

use super::cache::{BuyerFeatures, DealFeatures};

/// Widest possible size-band distance, for normalization.
const MAX_BAND_DISTANCE: f64 = 5.0;

/// Industry membership against the mandate's target industries.
#[must_use]
pub fn industry_fit(buyer: &BuyerFeatures, deal: &DealFeatures) -> f64 {
    if buyer.industries.is_empty() {
        return 1.0;
    }
    if buyer.industries.iter().any(|i| *i == deal.industry) {
        1.0
    } else {
        0.0
    }
}

/// Size-band fit: perfect inside the mandate's range, decaying linearly
/// with distance outside it.
#[must_use]
pub fn size_fit(buyer: &BuyerFeatures, deal: &DealFeatures) -> f64 {
    let distance = if deal.band < buyer.band_min {
        buyer.band_min - deal.band
    } else if deal.band > buyer.band_max {
        deal.band - buyer.band_max
    } else {
        0
    };
    (1.0 - distance as f64 / MAX_BAND_DISTANCE).max(0.0)
}

/// Geography membership against the mandate's acceptable regions.
#[must_use]
pub fn geography_fit(buyer: &BuyerFeatures, deal: &DealFeatures) -> f64 {
    if buyer.geographies.is_empty() {
        return 1.0;
    }
    if buyer.geographies.iter().any(|g| *g == deal.geography) {
        1.0
    } else {
        0.0
    }
}

/// Coverage of the mandate's strategic tags by the deal's tags.
#[must_use]
pub fn strategic_overlap(buyer: &BuyerFeatures, deal: &DealFeatures) -> f64 {
    if buyer.tags.is_empty() {
        return 1.0;
    }
    let hits = buyer.tags.intersection(&deal.tags).count();
    hits as f64 / buyer.tags.len() as f64
}

/// Deal health against the mandate's risk-appetite floor.
///
/// At or above the floor the alignment scales linearly up to 1.0 at a
/// perfect health score; below the floor it is zero.
#[must_use]
pub fn health_alignment(buyer: &BuyerFeatures, deal: &DealFeatures) -> f64 {
    let floor = buyer.health_floor;
    if floor >= 100.0 {
        return if deal.health >= 100.0 { 1.0 } else { 0.0 };
    }
    ((deal.health - floor) / (100.0 - floor)).clamp(0.0, 1.0)
}
