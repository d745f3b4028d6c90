//! # Query Cache
//!
//! Shared list cache keyed by `(query key, filters)`.
//!
//! Every handle cloned from one [`QueryClient`] sees the same entries, so
//! an invalidation made through one binding forces a refetch for all of
//! them. Each query key carries an epoch that invalidation bumps; a fetch
//! that started before an invalidation is stored as stale.

use chrono::{DateTime, Utc};
use forge_core::{Filters, ListResponse};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ============================================================================
// Keys and entries
// ============================================================================

/// Cache key of one list query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub key: String,
    pub filters: Filters,
}

impl QueryKey {
    pub fn new(key: impl Into<String>, filters: Filters) -> Self {
        Self {
            key: key.into(),
            filters,
        }
    }
}

/// One cached list result
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub data: ListResponse,
    pub fetched_at: DateTime<Utc>,
    /// Set by invalidation; the next read refetches
    pub stale: bool,
}

impl CacheEntry {
    pub fn is_fresh(&self) -> bool {
        !self.stale
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    epochs: HashMap<String, u64>,
}

// ============================================================================
// QueryClient
// ============================================================================

/// Handle to the shared list cache
#[derive(Debug, Clone, Default)]
pub struct QueryClient {
    state: Arc<Mutex<CacheState>>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // The state holds no invariant a panicking writer could break.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached entry for a query, fresh or stale
    pub fn get(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.lock().entries.get(key).cloned()
    }

    /// Cached data for a query if it has not been invalidated
    pub fn get_fresh(&self, key: &QueryKey) -> Option<ListResponse> {
        self.lock()
            .entries
            .get(key)
            .filter(|e| e.is_fresh())
            .map(|e| e.data.clone())
    }

    /// Current epoch of a query key; capture it before fetching
    pub fn epoch(&self, key: &str) -> u64 {
        self.lock().epochs.get(key).copied().unwrap_or(0)
    }

    /// Store a fetch result started at `epoch`
    ///
    /// Returns whether the entry was stored as fresh. A result whose query
    /// key was invalidated mid-flight is kept only as stale data.
    pub fn store(&self, key: QueryKey, data: ListResponse, epoch: u64) -> bool {
        let mut state = self.lock();
        let current = state.epochs.get(&key.key).copied().unwrap_or(0);
        let fresh = current == epoch;
        if !fresh {
            tracing::debug!(key = %key.key, "discarding freshness of result fetched before invalidation");
        }
        state.entries.insert(
            key,
            CacheEntry {
                data,
                fetched_at: Utc::now(),
                stale: !fresh,
            },
        );
        fresh
    }

    /// Mark every entry under `key` stale
    ///
    /// Returns the number of entries affected.
    pub fn invalidate(&self, key: &str) -> usize {
        let mut state = self.lock();
        *state.epochs.entry(key.to_string()).or_insert(0) += 1;
        let mut count = 0;
        for (k, entry) in state.entries.iter_mut() {
            if k.key == key {
                entry.stale = true;
                count += 1;
            }
        }
        tracing::debug!(%key, count, "invalidated queries");
        count
    }

    /// Drop every entry under `key`
    pub fn remove(&self, key: &str) {
        self.lock().entries.retain(|k, _| k.key != key);
    }

    /// Drop everything
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: &[&str]) -> ListResponse {
        ListResponse::new(
            ids.iter()
                .map(|id| {
                    let mut r = forge_core::Record::new();
                    r.insert("id".into(), (*id).into());
                    r
                })
                .collect(),
        )
    }

    #[test]
    fn test_store_and_get() {
        let client = QueryClient::new();
        let key = QueryKey::new("categories", Filters::new());
        assert!(client.get(&key).is_none());

        assert!(client.store(key.clone(), page(&["1"]), client.epoch("categories")));
        assert_eq!(client.get_fresh(&key).unwrap().ids(), vec!["1"]);
    }

    #[test]
    fn test_filters_are_part_of_the_key() {
        let client = QueryClient::new();
        let all = QueryKey::new("routes", Filters::new());
        let active = QueryKey::new("routes", Filters::new().with("active", "true"));
        client.store(all.clone(), page(&["1", "2"]), 0);

        assert!(client.get(&active).is_none());
        assert!(client.get(&all).is_some());
    }

    #[test]
    fn test_invalidate_marks_all_filters_stale() {
        let client = QueryClient::new();
        let a = QueryKey::new("routes", Filters::new());
        let b = QueryKey::new("routes", Filters::new().with("page", "2"));
        let other = QueryKey::new("drivers", Filters::new());
        client.store(a.clone(), page(&["1"]), 0);
        client.store(b.clone(), page(&["2"]), 0);
        client.store(other.clone(), page(&["3"]), 0);

        assert_eq!(client.invalidate("routes"), 2);
        assert!(client.get_fresh(&a).is_none());
        assert!(client.get_fresh(&b).is_none());
        assert!(client.get(&a).unwrap().stale);
        assert!(client.get_fresh(&other).is_some());
    }

    #[test]
    fn test_fetch_overtaken_by_invalidation_is_stale() {
        let client = QueryClient::new();
        let key = QueryKey::new("routes", Filters::new());
        let epoch = client.epoch("routes");

        client.invalidate("routes");
        assert!(!client.store(key.clone(), page(&["1"]), epoch));
        assert!(client.get_fresh(&key).is_none());
        assert!(client.get(&key).is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let client = QueryClient::new();
        let other = client.clone();
        client.store(QueryKey::new("k", Filters::new()), page(&[]), 0);
        assert_eq!(other.len(), 1);
        other.clear();
        assert!(client.is_empty());
    }
}
