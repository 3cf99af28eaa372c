//! Per-entity feature vector cache.
//!
//! Profiles are normalized once into feature vectors keyed by entity id
//! and fingerprint. Re-scoring after a single buyer or deal changes
//! rebuilds only that entity's features; everything else is reused as-is.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::{BuyerId, BuyerProfile, DealId, DealProfile};

/// Normalized mandate features.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyerFeatures {
    /// Lowercased target industries.
    pub industries: Vec<String>,
    pub band_min: usize,
    pub band_max: usize,
    /// Lowercased acceptable regions.
    pub geographies: Vec<String>,
    pub tags: BTreeSet<String>,
    pub health_floor: f64,
}

/// Normalized deal features.
#[derive(Debug, Clone, PartialEq)]
pub struct DealFeatures {
    pub industry: String,
    pub band: usize,
    pub geography: String,
    pub tags: BTreeSet<String>,
    pub health: f64,
    pub listed_at: DateTime<Utc>,
    pub completeness: f64,
}

struct CachedBuyer {
    fingerprint: u64,
    features: Arc<BuyerFeatures>,
}

struct CachedDeal {
    fingerprint: u64,
    features: Arc<DealFeatures>,
}

/// Thread-safe feature cache keyed by entity id.
#[derive(Default)]
pub struct FeatureCache {
    buyers: DashMap<BuyerId, CachedBuyer>,
    deals: DashMap<DealId, CachedDeal>,
}

impl FeatureCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Features for a mandate, rebuilt only when the profile changed.
    #[must_use]
    pub fn buyer_features(&self, profile: &BuyerProfile) -> Arc<BuyerFeatures> {
        let fingerprint = buyer_fingerprint(profile);
        if let Some(entry) = self.buyers.get(&profile.id) {
            if entry.fingerprint == fingerprint {
                return Arc::clone(&entry.features);
            }
        }

        let features = Arc::new(build_buyer_features(profile));
        self.buyers.insert(
            profile.id.clone(),
            CachedBuyer {
                fingerprint,
                features: Arc::clone(&features),
            },
        );
        features
    }

    /// Features for a deal, rebuilt only when the profile changed.
    #[must_use]
    pub fn deal_features(&self, profile: &DealProfile) -> Arc<DealFeatures> {
        let fingerprint = deal_fingerprint(profile);
        if let Some(entry) = self.deals.get(&profile.id) {
            if entry.fingerprint == fingerprint {
                return Arc::clone(&entry.features);
            }
        }

        let features = Arc::new(build_deal_features(profile));
        self.deals.insert(
            profile.id.clone(),
            CachedDeal {
                fingerprint,
                features: Arc::clone(&features),
            },
        );
        features
    }

    /// Number of cached deal entries.
    #[must_use]
    pub fn cached_deals(&self) -> usize {
        self.deals.len()
    }

    /// Number of cached buyer entries.
    #[must_use]
    pub fn cached_buyers(&self) -> usize {
        self.buyers.len()
    }
}

fn build_buyer_features(profile: &BuyerProfile) -> BuyerFeatures {
    BuyerFeatures {
        industries: profile
            .target_industries
            .iter()
            .map(|i| i.to_lowercase())
            .collect(),
        band_min: profile.size_band_min.index(),
        band_max: profile.size_band_max.index(),
        geographies: profile.geographies.iter().map(|g| g.to_lowercase()).collect(),
        tags: profile.strategic_tags.iter().map(|t| t.to_lowercase()).collect(),
        health_floor: profile.risk_appetite.health_floor(),
    }
}

fn build_deal_features(profile: &DealProfile) -> DealFeatures {
    DealFeatures {
        industry: profile.industry.to_lowercase(),
        band: profile.size_band.index(),
        geography: profile.geography.to_lowercase(),
        tags: profile.strategic_tags.iter().map(|t| t.to_lowercase()).collect(),
        health: profile.health_score,
        listed_at: profile.listed_at,
        completeness: profile.data_completeness,
    }
}

fn buyer_fingerprint(profile: &BuyerProfile) -> u64 {
    let mut hasher = DefaultHasher::new();
    profile.id.hash(&mut hasher);
    profile.target_industries.hash(&mut hasher);
    profile.size_band_min.hash(&mut hasher);
    profile.size_band_max.hash(&mut hasher);
    profile.geographies.hash(&mut hasher);
    profile.strategic_tags.hash(&mut hasher);
    profile.risk_appetite.hash(&mut hasher);
    profile.capital_limit.hash(&mut hasher);
    hasher.finish()
}

fn deal_fingerprint(profile: &DealProfile) -> u64 {
    let mut hasher = DefaultHasher::new();
    profile.id.hash(&mut hasher);
    profile.industry.hash(&mut hasher);
    profile.size_band.hash(&mut hasher);
    profile.geography.hash(&mut hasher);
    profile.strategic_tags.hash(&mut hasher);
    profile.health_score.to_bits().hash(&mut hasher);
    profile.annual_revenue.hash(&mut hasher);
    profile.ebitda.hash(&mut hasher);
    profile.listed_at.hash(&mut hasher);
    profile.data_completeness.to_bits().hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{buyer_profile, deal_profile};

    #[test]
    fn unchanged_profile_reuses_cached_features() {
        let cache = FeatureCache::new();
        let deal = deal_profile("deal-1");

        let first = cache.deal_features(&deal);
        let second = cache.deal_features(&deal);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.cached_deals(), 1);
    }

    #[test]
    fn changed_profile_rebuilds_features() {
        let cache = FeatureCache::new();
        let mut deal = deal_profile("deal-1");

        let first = cache.deal_features(&deal);
        deal.industry = "logistics".to_string();
        let second = cache.deal_features(&deal);

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.industry, "logistics");
        assert_eq!(cache.cached_deals(), 1);
    }

    #[test]
    fn buyer_features_normalize_case() {
        let cache = FeatureCache::new();
        let mut buyer = buyer_profile("buyer-1");
        buyer.target_industries = vec!["B2B-SaaS".to_string()];
        let features = cache.buyer_features(&buyer);
        assert_eq!(features.industries, vec!["b2b-saas".to_string()]);
    }
}
