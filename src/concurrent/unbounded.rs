//! Unbounded Concurrent Cache
//!
//! The capacity-free base variant. With nothing to evict there is no global
//! order to protect, so the cache leans entirely on `DashMap`'s sharded
//! locking instead of an outer lock.

use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use dashmap::DashMap;
use std::collections::BTreeMap;

/// A thread-safe cache without a size limit.
///
/// Entries stay until removed or cleared.
///
/// # Example
///
/// ```rust
/// use flakecache::UnboundedCache;
///
/// let helpers: UnboundedCache<&str, String> = UnboundedCache::new();
/// let helper = helpers.get_or_insert_with("formatter", || "built".to_string());
/// assert_eq!(helper, "built");
/// assert!(helpers.contains_key(&"formatter"));
/// ```
pub struct UnboundedCache<K, V> {
    map: DashMap<K, V>,
    metrics: CoreCacheMetrics,
}

impl<K, V> UnboundedCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
            metrics: CoreCacheMetrics::new(),
        }
    }

    /// Creates an empty cache with room for `capacity` entries before
    /// reallocating. Not a limit.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: DashMap::with_capacity(capacity),
            metrics: CoreCacheMetrics::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns a clone of the value for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_with(key, V::clone)
    }

    /// Applies `f` to the value for `key` while its shard is locked.
    ///
    /// `f` must not call back into this cache.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        let result = self.map.get(key).map(|entry| f(entry.value()));
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

    /// Whether `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Inserts or overwrites `key`, returning the value it replaced.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let previous = self.map.insert(key, value);
        if previous.is_some() {
            self.metrics.record_update();
        } else {
            self.metrics.record_insertion();
        }
        previous
    }

    /// Returns the cached value for `key`, building and inserting it on a miss.
    ///
    /// `build` runs without any shard lock held; a concurrent insert of the
    /// same key wins over the freshly built value.
    pub fn get_or_insert_with<F>(&self, key: K, build: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = build();
        let mut inserted = false;
        let winner = self
            .map
            .entry(key)
            .or_insert_with(|| {
                inserted = true;
                value
            })
            .value()
            .clone();
        if inserted {
            self.metrics.record_insertion();
        }
        winner
    }

    /// Removes `key`, returning its value.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(key).map(|(_, value)| value)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.map.clear();
    }
}

impl<K, V> Default for UnboundedCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheMetrics for UnboundedCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap(self.len(), None)
    }

    fn algorithm_name(&self) -> &'static str {
        "UNBOUNDED"
    }
}

impl<K: Hash + Eq, V> fmt::Debug for UnboundedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnboundedCache")
            .field("len", &self.map.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_basic_operations() {
        let cache: UnboundedCache<String, u32> = UnboundedCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.put("a".to_string(), 1), None);
        assert_eq!(cache.put("a".to_string(), 2), Some(1));
        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.get_or_default("b", 9), 9);
        assert!(cache.contains_key("a"));
        assert_eq!(cache.remove("a"), Some(2));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_never_evicts() {
        let cache = UnboundedCache::with_capacity(4);
        for i in 0..10_000 {
            cache.put(i, i * 2);
        }
        assert_eq!(cache.len(), 10_000);
        assert_eq!(cache.get(&0), Some(0));
        assert_eq!(cache.metrics()["evictions"], 0.0);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_or_insert_with_builds_once_per_key() {
        let cache: Arc<UnboundedCache<u32, u32>> = Arc::new(UnboundedCache::new());
        let builds = Arc::new(AtomicUsize::new(0));

        // prime sequentially so the concurrent phase only hits
        for key in 0..16 {
            cache.get_or_insert_with(key, || {
                builds.fetch_add(1, Ordering::SeqCst);
                key * 10
            });
        }

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let builds = Arc::clone(&builds);
                thread::spawn(move || {
                    for key in 0..16 {
                        let value = cache.get_or_insert_with(key, || {
                            builds.fetch_add(1, Ordering::SeqCst);
                            0
                        });
                        assert_eq!(value, key * 10);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(builds.load(Ordering::SeqCst), 16);
        assert_eq!(cache.algorithm_name(), "UNBOUNDED");
    }
}
