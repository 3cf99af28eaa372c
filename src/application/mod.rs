//! Application services: the four analysis engines.

pub mod analyzer;
pub mod matching;
pub mod stack;
pub mod valuation;

pub use analyzer::{compute_ratios, health_score, AnalyzerConfig, Confidence, RatioReport};
pub use matching::MatchingEngine;
pub use stack::{OfferStackGenerator, StackConfig};
pub use valuation::{CancellationFlag, ValuationConfig, ValuationEngine};
