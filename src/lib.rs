//! Dealforge - valuation and deal-matching engine for M&A deal management.
//!
//! This crate provides the financial-analysis core of a deal-management
//! platform: ratio computation, multi-methodology valuation, financing
//! stack generation, and buyer/deal matching.
//!
//! # Architecture
//!
//! Four engines sit behind one data path:
//!
//! - **`application::analyzer`** - normalizes a financial statement into a
//!   typed [`domain::RatioSet`] plus a benchmarked health score
//! - **`application::valuation`** - runs DCF (Monte Carlo), comparables,
//!   and precedent transactions concurrently, then blends the survivors
//! - **`application::stack`** - allocates equity/debt/mezzanine/earnout
//!   tranches under deal constraints
//! - **`application::matching`** - scores buyer mandates against deal
//!   pools with cached per-entity feature vectors
//!
//! External collaborators (the reference-data service, the optional
//! narrative provider) plug in through the traits in [`port`];
//! implementations live in [`infrastructure`] and are constructed
//! explicitly, never as an import-time side effect.
//!
//! # Modules
//!
//! - [`config`](infrastructure::config) - TOML configuration with range
//!   validation
//! - [`domain`] - statements, ratios, valuations, stacks, profiles,
//!   match scores
//! - [`application`] - the four engines
//! - [`port`] - outbound trait seams
//! - [`infrastructure`] - config, reference-data client, narrative
//!   client, artifact store
//! - [`error`] - error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use dealforge::application::valuation::{CancellationFlag, ValuationConfig, ValuationEngine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ValuationEngine::new(ValuationConfig::default())?;
//! // engine.valuate(&deal, &statement, &reference, &CancellationFlag::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
