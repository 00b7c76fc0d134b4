//! Bounded Concurrent Cache
//!
//! A capacity-limited cache shared across threads. See the
//! [module docs](crate::concurrent) for the locking scheme.

use crate::config::{BoundedCacheConfig, EvictionPolicy};
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::ordered::OrderedMap;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, trace};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe cache holding at most `capacity` entries.
///
/// Values are returned by clone so no lock outlives a call; use
/// [`get_with`](Self::get_with) to read in place.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq + Clone`.
/// - `V`: Value type. Must implement `Clone`.
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
///
/// # Example
///
/// ```rust
/// use flakecache::BoundedCache;
///
/// let cache = BoundedCache::fifo(2);
/// cache.put("k1", 1);
/// cache.put("k2", 2);
/// cache.put("k3", 3);
///
/// assert!(!cache.contains_key(&"k1"));
/// assert_eq!(cache.get(&"k2"), Some(2));
/// assert_eq!(cache.get_or_default(&"k1", 0), 0);
/// ```
pub struct BoundedCache<K, V, S = DefaultHashBuilder> {
    inner: RwLock<OrderedMap<K, V, S>>,
    capacity: usize,
    policy: EvictionPolicy,
    metrics: CoreCacheMetrics,
}

impl<K, V> BoundedCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// A FIFO cache: evicts the oldest insertion.
    pub fn fifo(capacity: usize) -> Self {
        Self::init(BoundedCacheConfig::new(capacity), None)
    }

    /// An LRU cache: evicts the least recently used entry.
    pub fn lru(capacity: usize) -> Self {
        Self::init(
            BoundedCacheConfig::new(capacity).with_policy(EvictionPolicy::Lru),
            None,
        )
    }

    /// Creates a cache from a configuration with an optional hasher.
    pub fn init(config: BoundedCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K, V, S> BoundedCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Creates a cache with a custom hash builder.
    pub fn init_with_hasher(config: BoundedCacheConfig, hash_builder: S) -> Self {
        debug!(
            capacity = config.capacity,
            policy = config.policy.name(),
            "bounded cache created"
        );
        Self {
            inner: RwLock::new(OrderedMap::init(config, hash_builder)),
            capacity: config.capacity,
            policy: config.policy,
            metrics: CoreCacheMetrics::new(),
        }
    }

    /// Maximum number of live entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The eviction policy in force.
    #[inline]
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns a clone of the value for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_with(key, V::clone)
    }

    /// Applies `f` to the value for `key` while the lock is held.
    ///
    /// `f` must not call back into this cache.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        let result = if self.policy.reorders_on_access() {
            self.inner.write().get(key).map(f)
        } else {
            self.inner.read().peek(key).map(f)
        };
        if result.is_some() {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }
        result
    }

    /// Returns the value for `key`, or `default` when absent.
    pub fn get_or_default<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).unwrap_or(default)
    }

    /// Whether `key` is present. Never affects eviction order.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.read().contains_key(key)
    }

    /// Inserts or overwrites `key`, returning the value it replaced.
    ///
    /// A new key arriving at a full cache evicts one entry first; an
    /// overwrite never evicts.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let (previous, evicted) = self.inner.write().put_evicting(key, value);
        self.record_put(previous.is_some(), evicted.is_some());
        previous
    }

    /// Returns the cached value for `key`, building and inserting it on a miss.
    ///
    /// `build` runs without any lock held. If another thread inserts `key`
    /// meanwhile, that value wins and is returned instead.
    pub fn get_or_insert_with<F>(&self, key: K, build: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }

        let value = build();
        let evicted = {
            let mut map = self.inner.write();
            if let Some(existing) = map.get(&key) {
                return existing.clone();
            }
            map.put_evicting(key, value.clone()).1
        };
        self.record_put(false, evicted.is_some());
        value
    }

    /// Removes `key`, returning its value.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.write().remove(key)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Keys in eviction order, next victim first.
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().iter().map(|(k, _)| k.clone()).collect()
    }

    fn record_put(&self, replaced: bool, evicted: bool) {
        if replaced {
            self.metrics.record_update();
        } else {
            self.metrics.record_insertion();
        }
        if evicted {
            self.metrics.record_eviction();
            trace!(
                capacity = self.capacity,
                policy = self.policy.name(),
                "evicted entry"
            );
        }
    }
}

impl<K, V, S> CacheMetrics for BoundedCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap(self.len(), Some(self.capacity))
    }

    fn algorithm_name(&self) -> &'static str {
        self.policy.name()
    }
}

impl<K, V, S> fmt::Debug for BoundedCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .field("inner", &self.inner)
            .finish()
    }
}
