//! Cache Metrics
//!
//! Counters shared by every cache in the crate, reported through the
//! [`CacheMetrics`] trait as a `BTreeMap` so output order is deterministic.
//!
//! The counters are atomics: [`BoundedCache`](crate::BoundedCache) records
//! hits while holding only a shared read lock, so they cannot rely on the
//! lock for exclusion. Relaxed ordering is enough; the numbers are advisory
//! and never feed back into cache behaviour.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters common to all caches.
#[derive(Debug, Default)]
pub struct CoreCacheMetrics {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    insertions: AtomicU64,
    updates: AtomicU64,
    evictions: AtomicU64,
}

impl CoreCacheMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// A lookup found its key.
    #[inline]
    pub fn record_hit(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A lookup did not find its key.
    #[inline]
    pub fn record_miss(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// A new key was stored.
    #[inline]
    pub fn record_insertion(&self) {
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    /// An existing key was overwritten.
    #[inline]
    pub fn record_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    /// An entry was pushed out to respect capacity.
    #[inline]
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Total lookups.
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Lookups that found their key.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Lookups that missed.
    pub fn cache_misses(&self) -> u64 {
        self.requests().saturating_sub(self.cache_hits())
    }

    /// Entries evicted so far.
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Hits over requests, or 0.0 before the first request.
    pub fn hit_rate(&self) -> f64 {
        let requests = self.requests();
        if requests > 0 {
            self.cache_hits() as f64 / requests as f64
        } else {
            0.0
        }
    }

    /// Misses over requests, or 0.0 before the first request.
    pub fn miss_rate(&self) -> f64 {
        let requests = self.requests();
        if requests > 0 {
            self.cache_misses() as f64 / requests as f64
        } else {
            0.0
        }
    }

    /// Counters plus the given occupancy figures, keyed alphabetically.
    pub fn to_btreemap(&self, len: usize, capacity: Option<usize>) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits() as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("evictions".to_string(), self.evictions() as f64);
        metrics.insert(
            "insertions".to_string(),
            self.insertions.load(Ordering::Relaxed) as f64,
        );
        metrics.insert("requests".to_string(), self.requests() as f64);
        metrics.insert(
            "updates".to_string(),
            self.updates.load(Ordering::Relaxed) as f64,
        );

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics.insert("len".to_string(), len as f64);
        if let Some(capacity) = capacity {
            metrics.insert("capacity".to_string(), capacity as f64);
            let utilization = if capacity > 0 {
                len as f64 / capacity as f64
            } else {
                0.0
            };
            metrics.insert("utilization".to_string(), utilization);
        }

        metrics
    }
}

/// Uniform metrics reporting for every cache type.
pub trait CacheMetrics {
    /// All metrics, keyed alphabetically.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Short identifier of the eviction scheme, e.g. `"FIFO"` or `"LRU"`.
    fn algorithm_name(&self) -> &'static str;
}
