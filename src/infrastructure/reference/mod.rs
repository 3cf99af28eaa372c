//! Reference-data providers.
//!
//! [`ReferenceCatalog`] is the staged-swap snapshot store both providers
//! share: readers clone an `Arc` and work against frozen data while
//! writers publish whole replacement snapshots. [`StaticReference`]
//! serves preloaded snapshots (tests, CLI file input); [`HttpReference`]
//! fetches from the reference-data service with retry, backoff, and
//! last-known-good fallback.

pub mod retry;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::domain::error::ServiceError;
use crate::domain::ReferenceSnapshot;
use crate::infrastructure::config::ReferenceConfig;
use crate::port::ReferenceData;

/// Snapshot store with atomic publication.
///
/// Mutations never touch a published snapshot: `publish` swaps in a new
/// `Arc` while in-flight passes keep reading the one they started with.
#[derive(Default)]
pub struct ReferenceCatalog {
    snapshots: RwLock<HashMap<String, Arc<ReferenceSnapshot>>>,
}

impl ReferenceCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot for an industry, if one has been published.
    #[must_use]
    pub fn get(&self, industry: &str) -> Option<Arc<ReferenceSnapshot>> {
        self.snapshots.read().get(&industry.to_lowercase()).cloned()
    }

    /// Publish a replacement snapshot for its industry.
    pub fn publish(&self, snapshot: ReferenceSnapshot) {
        let key = snapshot.industry().to_lowercase();
        let snapshot = Arc::new(snapshot);
        self.snapshots.write().insert(key, snapshot);
    }

    /// Number of industries with a published snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }
}

/// In-memory provider serving preloaded snapshots.
#[derive(Default)]
pub struct StaticReference {
    catalog: ReferenceCatalog,
}

impl StaticReference {
    /// Build a provider preloaded with the given snapshots.
    #[must_use]
    pub fn new(snapshots: impl IntoIterator<Item = ReferenceSnapshot>) -> Self {
        let catalog = ReferenceCatalog::new();
        for snapshot in snapshots {
            catalog.publish(snapshot);
        }
        Self { catalog }
    }

    /// Stage a replacement snapshot; visible to passes that start after
    /// this call.
    pub fn publish(&self, snapshot: ReferenceSnapshot) {
        self.catalog.publish(snapshot);
    }
}

#[async_trait]
impl ReferenceData for StaticReference {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn snapshot(&self, industry: &str) -> Result<Arc<ReferenceSnapshot>, ServiceError> {
        self.catalog
            .get(industry)
            .ok_or_else(|| ServiceError::Unavailable {
                service: "reference-data",
                attempts: 0,
                reason: format!("no snapshot loaded for industry '{industry}'"),
            })
    }
}

/// HTTP-backed provider with retry, backoff, and cached fallback.
///
/// Constructed explicitly and injected by the caller; creating the client
/// performs no network I/O.
pub struct HttpReference {
    client: reqwest::Client,
    config: ReferenceConfig,
    cache: ReferenceCatalog,
}

impl HttpReference {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ReferenceConfig) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            cache: ReferenceCatalog::new(),
        })
    }

    async fn fetch(&self, industry: &str) -> Result<ReferenceSnapshot, reqwest::Error> {
        let url = format!("{}/v1/reference/{industry}", self.config.base_url);
        debug!(%url, "fetching reference snapshot");
        self.client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<ReferenceSnapshot>()
            .await
    }
}

#[async_trait]
impl ReferenceData for HttpReference {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn snapshot(&self, industry: &str) -> Result<Arc<ReferenceSnapshot>, ServiceError> {
        let fetched = retry::with_backoff(&self.config.retry, "reference-data", || {
            self.fetch(industry)
        })
        .await;

        match fetched {
            Ok(snapshot) => {
                self.cache.publish(snapshot);
                // Reread so callers share the published Arc.
                self.cache.get(industry).ok_or(ServiceError::Unavailable {
                    service: "reference-data",
                    attempts: self.config.retry.max_attempts,
                    reason: "snapshot industry does not match requested industry".to_string(),
                })
            }
            Err(err) => match self.cache.get(industry) {
                Some(cached) => {
                    info!(
                        industry,
                        error = %err,
                        "reference fetch failed, serving last-known-good snapshot"
                    );
                    Ok(cached)
                }
                None => Err(err),
            },
        }
    }
}
