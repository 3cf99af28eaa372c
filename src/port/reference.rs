//! Reference-data port.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::ServiceError;
use crate::domain::ReferenceSnapshot;

/// Source of industry reference data: benchmarks, peer multiples, and
/// precedent transactions.
///
/// A snapshot is immutable once returned; a valuation or scoring pass
/// holds one snapshot for its whole duration. Implementations stage
/// updates and swap them atomically between passes, never mutating a
/// snapshot in place.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to serve concurrent passes.
///
/// # Errors
///
/// [`snapshot`](Self::snapshot) returns [`ServiceError::Unavailable`]
/// only after retries are exhausted and no cached fallback exists.
#[async_trait]
pub trait ReferenceData: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Reference snapshot for one industry.
    async fn snapshot(&self, industry: &str) -> Result<Arc<ReferenceSnapshot>, ServiceError>;
}
