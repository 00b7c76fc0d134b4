//! Configuration for [`BoundedCache`](crate::BoundedCache) and
//! [`OrderedMap`](crate::ordered::OrderedMap).
//!
//! # Sizing
//!
//! - **`capacity`**: maximum number of live entries. Zero is accepted and
//!   turns the cache into a pass-through: every new key is dropped on insert.
//! - **`initial_buckets`** / **`load_factor`**: hints for pre-sizing the
//!   backing hash map. They never change which entry gets evicted.
//!
//! # Examples
//!
//! ```
//! use flakecache::config::{BoundedCacheConfig, EvictionPolicy};
//! use flakecache::BoundedCache;
//!
//! // HTTP clients keyed by connection profile, rebuilt on miss
//! let config = BoundedCacheConfig::new(32)
//!     .with_policy(EvictionPolicy::Fifo)
//!     .with_initial_buckets(16)
//!     .with_load_factor(0.75);
//! let clients: BoundedCache<String, u32> = BoundedCache::init(config, None);
//! assert_eq!(clients.capacity(), 32);
//! ```

use core::fmt;

/// Pre-allocation ceiling used when no bucket hint is given.
const DEFAULT_RESERVE_LIMIT: usize = 1024;

/// Load factor applied to `initial_buckets` when none is configured.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Which entry a full cache gives up to admit a new key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EvictionPolicy {
    /// Evict the entry inserted longest ago. Lookups never reorder entries,
    /// so reads only need a shared lock.
    #[default]
    Fifo,
    /// Evict the entry used longest ago. Hits and overwrites move the entry
    /// to the most recent position, so lookups take the exclusive lock.
    Lru,
}

impl EvictionPolicy {
    /// Whether a successful lookup changes eviction order.
    #[inline]
    pub fn reorders_on_access(self) -> bool {
        matches!(self, EvictionPolicy::Lru)
    }

    /// Short upper-case label used in metrics.
    pub fn name(self) -> &'static str {
        match self {
            EvictionPolicy::Fifo => "FIFO",
            EvictionPolicy::Lru => "LRU",
        }
    }
}

/// Configuration for a bounded cache.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundedCacheConfig {
    /// Maximum number of live entries.
    pub capacity: usize,
    /// Eviction policy; FIFO unless set.
    #[cfg_attr(feature = "serde", serde(default))]
    pub policy: EvictionPolicy,
    /// Expected number of hash buckets.
    #[cfg_attr(feature = "serde", serde(default))]
    pub initial_buckets: Option<usize>,
    /// Fraction of `initial_buckets` expected to be occupied.
    #[cfg_attr(feature = "serde", serde(default))]
    pub load_factor: Option<f32>,
}

impl BoundedCacheConfig {
    /// FIFO configuration with the given capacity and no sizing hints.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policy: EvictionPolicy::Fifo,
            initial_buckets: None,
            load_factor: None,
        }
    }

    /// Sets the eviction policy.
    #[must_use]
    pub fn with_policy(mut self, policy: EvictionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the bucket hint.
    #[must_use]
    pub fn with_initial_buckets(mut self, buckets: usize) -> Self {
        self.initial_buckets = Some(buckets);
        self
    }

    /// Sets the load factor hint.
    #[must_use]
    pub fn with_load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = Some(load_factor);
        self
    }

    /// Number of entries to reserve up front.
    ///
    /// Never exceeds `capacity`. Invalid load factors (non-finite or not
    /// positive) fall back to [`DEFAULT_LOAD_FACTOR`].
    pub fn reserve_hint(&self) -> usize {
        let hinted = match self.initial_buckets {
            Some(buckets) => {
                let load_factor = self
                    .load_factor
                    .filter(|lf| lf.is_finite() && *lf > 0.0)
                    .unwrap_or(DEFAULT_LOAD_FACTOR);
                // float-to-int casts saturate
                (buckets as f64 * f64::from(load_factor)) as usize
            }
            None => DEFAULT_RESERVE_LIMIT,
        };
        hinted.min(self.capacity)
    }
}

impl fmt::Debug for BoundedCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCacheConfig")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .field("initial_buckets", &self.initial_buckets)
            .field("load_factor", &self.load_factor)
            .finish()
    }
}
