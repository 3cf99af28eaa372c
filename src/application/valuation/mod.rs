//! Multi-methodology valuation engine.
//!
//! Three methodologies run independently and concurrently; each may
//! degrade to unavailable with a recorded reason, and the survivors are
//! blended under renormalized reliability weights. An engine holds only
//! validated configuration; reference data and the statement are passed
//! per call so a valuation pass works against one immutable snapshot.

pub mod blend;
pub mod comparables;
pub mod config;
pub mod dcf;
pub mod precedent;
pub mod simulation;

pub use config::{
    BlendWeights, ComparablesConfig, DcfConfig, DistributionConfig, PrecedentConfig,
    ValuationConfig,
};
pub use simulation::CancellationFlag;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::error::ValuationError;
use crate::domain::{
    BlendedValuation, DealProfile, FinancialStatement, Methodology, MethodologyOutcome,
    ReferenceSnapshot,
};

/// The valuation engine.
#[derive(Debug, Clone)]
pub struct ValuationEngine {
    config: ValuationConfig,
}

impl ValuationEngine {
    /// Create an engine from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured assumption is outside its
    /// declared range.
    pub fn new(config: ValuationConfig) -> Result<Self, ValuationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    /// Value a deal as of now.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InsufficientData`] when every
    /// methodology degrades.
    pub async fn valuate(
        &self,
        deal: &DealProfile,
        statement: &FinancialStatement,
        reference: &ReferenceSnapshot,
        cancel: &CancellationFlag,
    ) -> Result<BlendedValuation, ValuationError> {
        self.valuate_as_of(deal, statement, reference, cancel, Utc::now())
            .await
    }

    /// Value a deal with an explicit `as_of` time for recency weighting.
    pub async fn valuate_as_of(
        &self,
        deal: &DealProfile,
        statement: &FinancialStatement,
        reference: &ReferenceSnapshot,
        cancel: &CancellationFlag,
        as_of: DateTime<Utc>,
    ) -> Result<BlendedValuation, ValuationError> {
        // The Monte Carlo pass is CPU-bound; run it off the async runtime
        // while the multiple-based methodologies evaluate.
        let dcf_statement = statement.clone();
        let dcf_config = self.config.dcf.clone();
        let dcf_cancel = cancel.clone();
        let dcf_task = tokio::task::spawn_blocking(move || {
            dcf::run(&dcf_statement, &dcf_config, &dcf_cancel)
        });

        let comparables_outcome = comparables::run(
            deal,
            statement,
            &reference.peer_multiples,
            &self.config.comparables,
        );
        let precedent_outcome = precedent::run(
            deal,
            statement,
            &reference.precedent_transactions,
            &self.config.precedent,
            as_of,
        );

        let dcf_outcome = match dcf_task.await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                warn!(error = %join_err, "dcf simulation task failed");
                MethodologyOutcome::Unavailable {
                    methodology: Methodology::DiscountedCashFlow,
                    reason: format!("simulation task failed: {join_err}"),
                }
            }
        };

        for outcome in [&dcf_outcome, &comparables_outcome, &precedent_outcome] {
            if let MethodologyOutcome::Unavailable { methodology, reason } = outcome {
                warn!(methodology = %methodology, reason, "methodology unavailable");
            }
        }

        let blended = blend::blend(
            vec![dcf_outcome, comparables_outcome, precedent_outcome],
            &self.config.blend,
        )?;

        info!(
            deal = %deal.id,
            point = %blended.point_estimate,
            methodologies = blended.weights.len(),
            "valuation blended"
        );
        Ok(blended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{deal_profile, reference_snapshot, statement};
    use chrono::TimeZone;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn all_three_methodologies_contribute_with_full_data() {
        let engine = ValuationEngine::new(ValuationConfig::default()).unwrap();
        let blended = engine
            .valuate_as_of(
                &deal_profile("deal-1"),
                &statement(),
                &reference_snapshot(),
                &CancellationFlag::new(),
                as_of(),
            )
            .await
            .unwrap();

        assert_eq!(blended.weights.len(), 3);
        assert!(blended.degraded.is_empty());
        let total: f64 = blended.weights.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_reference_degrades_to_dcf_only() {
        let engine = ValuationEngine::new(ValuationConfig::default()).unwrap();
        let mut reference = reference_snapshot();
        reference.peer_multiples.clear();
        reference.precedent_transactions.clear();

        let blended = engine
            .valuate_as_of(
                &deal_profile("deal-1"),
                &statement(),
                &reference,
                &CancellationFlag::new(),
                as_of(),
            )
            .await
            .unwrap();

        assert_eq!(blended.weights.len(), 1);
        assert!((blended.weight_of(Methodology::DiscountedCashFlow) - 1.0).abs() < 1e-9);
        assert_eq!(blended.degraded.len(), 2);
    }

    #[tokio::test]
    async fn no_data_at_all_is_insufficient() {
        let engine = ValuationEngine::new(ValuationConfig::default()).unwrap();
        let mut reference = reference_snapshot();
        reference.peer_multiples.clear();
        reference.precedent_transactions.clear();
        let mut s = statement();
        s.revenue = rust_decimal::Decimal::ZERO;

        let err = engine
            .valuate_as_of(
                &deal_profile("deal-1"),
                &s,
                &reference,
                &CancellationFlag::new(),
                as_of(),
            )
            .await
            .unwrap_err();

        match err {
            ValuationError::InsufficientData { failures } => {
                assert_eq!(failures.len(), 3);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }
}
