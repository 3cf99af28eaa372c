//! Configuration loading, validation, and logging setup.

pub mod logging;
pub mod matching;
pub mod narrative;
pub mod reference;
pub mod settings;

pub use logging::LoggingConfig;
pub use matching::MatchingConfig;
pub use narrative::NarrativeConfig;
pub use reference::{ReferenceConfig, RetryConfig};
pub use settings::Config;
