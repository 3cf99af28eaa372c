//! Deal matching engine.
//!
//! Scores every buyer/deal pairing as a weighted sum of normalized factor
//! similarities and ranks descending with a deterministic tie-break. The
//! cross product partitions cleanly by deal shard: shard results merge
//! into the same total order regardless of the partition scheme, because
//! the ranking comparison is total.

pub mod cache;
pub mod factors;

pub use cache::FeatureCache;

use tracing::debug;

use crate::domain::error::MatchError;
use crate::domain::{
    BuyerProfile, DealProfile, FactorScores, FactorWeights, MatchScore,
};

use cache::{BuyerFeatures, DealFeatures};

/// The deal matching engine.
///
/// Holds the per-entity feature cache; scoring itself is stateless, so
/// one engine serves concurrent requests.
#[derive(Default)]
pub struct MatchingEngine {
    cache: FeatureCache,
}

impl MatchingEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Access to the feature cache, mainly for instrumentation.
    #[must_use]
    pub fn cache(&self) -> &FeatureCache {
        &self.cache
    }

    /// Score a buyer mandate against a pool of deals, ranked best-first.
    ///
    /// # Errors
    ///
    /// Returns an error if `weights` contains a negative weight or all
    /// weights are zero.
    pub fn match_deals(
        &self,
        buyer: &BuyerProfile,
        deals: &[DealProfile],
        weights: &FactorWeights,
    ) -> Result<Vec<MatchScore>, MatchError> {
        weights.validate()?;
        let buyer_features = self.cache.buyer_features(buyer);

        let mut scores: Vec<MatchScore> = deals
            .iter()
            .map(|deal| {
                let deal_features = self.cache.deal_features(deal);
                score_pair(buyer, deal, &buyer_features, &deal_features, weights)
            })
            .collect();

        scores.sort_by(MatchScore::ranking_cmp);
        debug!(buyer = %buyer.id, deals = deals.len(), "deal pool scored");
        Ok(scores)
    }

    /// Score a buyer against a pool split into `shards` partitions.
    ///
    /// Partial results merge deterministically: the output is identical
    /// to [`match_deals`](Self::match_deals) on the unpartitioned pool.
    pub fn match_deals_sharded(
        &self,
        buyer: &BuyerProfile,
        deals: &[DealProfile],
        weights: &FactorWeights,
        shards: usize,
    ) -> Result<Vec<MatchScore>, MatchError> {
        weights.validate()?;
        let shards = shards.max(1);
        let chunk = deals.len().div_ceil(shards).max(1);

        let mut merged = Vec::with_capacity(deals.len());
        for shard in deals.chunks(chunk) {
            merged.extend(self.match_deals(buyer, shard, weights)?);
        }
        merged.sort_by(MatchScore::ranking_cmp);
        Ok(merged)
    }

    /// Re-score only the pairings involving one added or updated deal.
    ///
    /// Feature vectors for the unaffected buyers come from the cache.
    pub fn rescore_deal(
        &self,
        buyers: &[BuyerProfile],
        deal: &DealProfile,
        weights: &FactorWeights,
    ) -> Result<Vec<MatchScore>, MatchError> {
        weights.validate()?;
        let deal_features = self.cache.deal_features(deal);

        let mut scores: Vec<MatchScore> = buyers
            .iter()
            .map(|buyer| {
                let buyer_features = self.cache.buyer_features(buyer);
                score_pair(buyer, deal, &buyer_features, &deal_features, weights)
            })
            .collect();

        scores.sort_by(MatchScore::ranking_cmp);
        Ok(scores)
    }

    /// Re-score only the pairings involving one added or updated buyer.
    pub fn rescore_buyer(
        &self,
        buyer: &BuyerProfile,
        deals: &[DealProfile],
        weights: &FactorWeights,
    ) -> Result<Vec<MatchScore>, MatchError> {
        self.match_deals(buyer, deals, weights)
    }
}

fn score_pair(
    buyer: &BuyerProfile,
    deal: &DealProfile,
    buyer_features: &BuyerFeatures,
    deal_features: &DealFeatures,
    weights: &FactorWeights,
) -> MatchScore {
    let factor_scores = FactorScores {
        industry_fit: factors::industry_fit(buyer_features, deal_features),
        size_fit: factors::size_fit(buyer_features, deal_features),
        geography_fit: factors::geography_fit(buyer_features, deal_features),
        strategic_overlap: factors::strategic_overlap(buyer_features, deal_features),
        health_alignment: factors::health_alignment(buyer_features, deal_features),
    };

    MatchScore {
        buyer: buyer.id.clone(),
        deal: deal.id.clone(),
        score: factor_scores.composite(weights),
        factors: factor_scores,
        deal_listed_at: deal.listed_at,
        deal_completeness: deal.data_completeness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{buyer_profile, deal_profile};

    fn pool() -> Vec<DealProfile> {
        let mut on_target = deal_profile("deal-fit");
        on_target.strategic_tags = vec!["recurring-revenue".to_string()];

        let mut off_industry = deal_profile("deal-industry");
        off_industry.industry = "mining".to_string();

        let mut unhealthy = deal_profile("deal-health");
        unhealthy.health_score = 20.0;

        vec![on_target, off_industry, unhealthy]
    }

    #[test]
    fn ranks_best_fit_first() {
        let engine = MatchingEngine::new();
        let scores = engine
            .match_deals(&buyer_profile("buyer-1"), &pool(), &FactorWeights::default())
            .unwrap();

        assert_eq!(scores[0].deal.as_str(), "deal-fit");
        assert!(scores[0].score > scores[1].score);
        for score in &scores {
            assert!((0.0..=1.0).contains(&score.score));
        }
    }

    #[test]
    fn sharded_scoring_matches_unpartitioned() {
        let engine = MatchingEngine::new();
        let buyer = buyer_profile("buyer-1");
        let deals = pool();
        let weights = FactorWeights::default();

        let whole = engine.match_deals(&buyer, &deals, &weights).unwrap();
        for shards in 1..=4 {
            let sharded = engine
                .match_deals_sharded(&buyer, &deals, &weights, shards)
                .unwrap();
            assert_eq!(whole, sharded, "shard count {shards} changed the ranking");
        }
    }

    #[test]
    fn industry_only_difference_isolates_to_industry_factor() {
        let engine = MatchingEngine::new();
        let buyer = buyer_profile("buyer-1");

        let a = deal_profile("deal-a");
        let mut b = deal_profile("deal-b");
        b.industry = "mining".to_string();

        let scores = engine
            .match_deals(&buyer, &[a, b], &FactorWeights::default())
            .unwrap();
        let a_score = scores.iter().find(|s| s.deal.as_str() == "deal-a").unwrap();
        let b_score = scores.iter().find(|s| s.deal.as_str() == "deal-b").unwrap();

        assert!(a_score.factors.industry_fit > b_score.factors.industry_fit);
        assert_eq!(a_score.factors.size_fit, b_score.factors.size_fit);
        assert_eq!(a_score.factors.geography_fit, b_score.factors.geography_fit);
        assert_eq!(
            a_score.factors.strategic_overlap,
            b_score.factors.strategic_overlap
        );
        assert_eq!(
            a_score.factors.health_alignment,
            b_score.factors.health_alignment
        );
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let engine = MatchingEngine::new();
        let weights = FactorWeights {
            industry: -1.0,
            ..FactorWeights::default()
        };
        assert!(engine
            .match_deals(&buyer_profile("buyer-1"), &pool(), &weights)
            .is_err());
    }

    #[test]
    fn rescore_deal_touches_only_that_deal() {
        let engine = MatchingEngine::new();
        let buyer = buyer_profile("buyer-1");
        let deals = pool();

        engine
            .match_deals(&buyer, &deals, &FactorWeights::default())
            .unwrap();
        assert_eq!(engine.cache().cached_deals(), 3);

        let mut updated = deals[0].clone();
        updated.strategic_tags.push("platform".to_string());
        let scores = engine
            .rescore_deal(&[buyer], &updated, &FactorWeights::default())
            .unwrap();

        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].deal, updated.id);
        // Cache still holds one entry per deal.
        assert_eq!(engine.cache().cached_deals(), 3);
    }
}
