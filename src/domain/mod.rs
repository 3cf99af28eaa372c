//! Platform-agnostic domain types and invariants.

mod health;
mod ids;
mod matching;
mod money;
mod profile;
mod ratio;
mod reference;
mod stack;
mod statement;
mod valuation;

pub mod error;

// Identifiers and money
pub use ids::{BuyerId, DealId, PeriodId};
pub use money::{Amount, Rate};

// Statements and ratios
pub use ratio::{RatioCategory, RatioId, RatioSet, RatioValue};
pub use statement::FinancialStatement;

// Health scoring
pub use health::{BenchmarkStat, HealthComponent, HealthScore, IndustryBenchmarks};

// Profiles and reference data
pub use profile::{BuyerProfile, DealProfile, RiskAppetite, SizeBand};
pub use reference::{PeerMultiple, PrecedentTransaction, ReferenceSnapshot};

// Valuation
pub use valuation::{
    Assumption, BlendedValuation, ConfidenceBand, Methodology, MethodologyOutcome, SampleInfo,
    ValuationResult,
};

// Offer stacks
pub use stack::{BindingConstraint, OfferStack, StackConstraints, Tranche, TrancheKind};

// Matching
pub use matching::{FactorScores, FactorWeights, MatchScore};
