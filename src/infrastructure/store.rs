//! Versioned store for derived analysis artifacts.
//!
//! Derived artifacts (ratio sets, valuations, offer stacks, match
//! rankings) are recomputed, never mutated: each write appends a new
//! version and prior versions stay readable for audit. Writes are
//! serialized per source entity, so concurrent recomputations cannot
//! interleave versions for the same entity. The store is never a source
//! of truth for financial data.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// One stored version of an artifact.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    /// Globally unique id for audit references.
    pub id: Uuid,
    /// Monotonic per-entity version, starting at 1.
    pub version: u32,
    pub recorded_at: DateTime<Utc>,
    pub value: T,
}

/// Append-only versioned artifact store keyed by source entity id.
pub struct VersionedStore<T> {
    entries: DashMap<String, Vec<Arc<Versioned<T>>>>,
}

impl<T> Default for VersionedStore<T> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<T> VersionedStore<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new version for an entity and return its version number.
    ///
    /// The entity's entry is locked for the duration of the append, so
    /// concurrent writers cannot produce duplicate or out-of-order
    /// versions.
    pub fn put(&self, entity: &str, value: T) -> u32 {
        let mut entry = self.entries.entry(entity.to_string()).or_default();
        let version = entry.len() as u32 + 1;
        entry.push(Arc::new(Versioned {
            id: Uuid::new_v4(),
            version,
            recorded_at: Utc::now(),
            value,
        }));
        version
    }

    /// Latest version for an entity, if any artifact was stored.
    #[must_use]
    pub fn latest(&self, entity: &str) -> Option<Arc<Versioned<T>>> {
        self.entries.get(entity).and_then(|e| e.last().cloned())
    }

    /// Full version history for an entity, oldest first.
    #[must_use]
    pub fn history(&self, entity: &str) -> Vec<Arc<Versioned<T>>> {
        self.entries
            .get(entity)
            .map(|e| e.value().clone())
            .unwrap_or_default()
    }

    /// Number of entities with stored artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_monotonic_and_retained() {
        let store = VersionedStore::new();
        assert_eq!(store.put("deal-1", "first"), 1);
        assert_eq!(store.put("deal-1", "second"), 2);

        let latest = store.latest("deal-1").unwrap();
        assert_eq!(latest.version, 2);
        assert_eq!(latest.value, "second");

        let history = store.history("deal-1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].value, "first");
    }

    #[test]
    fn entities_are_independent() {
        let store = VersionedStore::new();
        store.put("deal-1", 1u32);
        store.put("deal-2", 2u32);
        assert_eq!(store.latest("deal-1").unwrap().version, 1);
        assert_eq!(store.latest("deal-2").unwrap().version, 1);
        assert!(store.latest("deal-3").is_none());
    }

    #[test]
    fn concurrent_writers_never_duplicate_versions() {
        let store = Arc::new(VersionedStore::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    store.put("deal-1", i);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let history = store.history("deal-1");
        assert_eq!(history.len(), 400);
        for (idx, version) in history.iter().enumerate() {
            assert_eq!(version.version, idx as u32 + 1);
        }
    }
}
