//! Bounded Ordered Map
//!
//! The single-threaded store behind [`BoundedCache`](crate::BoundedCache). It
//! holds at most `capacity` entries and remembers the order in which they
//! should be evicted.
//!
//! # Algorithm
//!
//! A hash map indexes nodes of a doubly linked list. New keys are linked at the
//! newest end; when a new key arrives while the map is full, the node at the
//! oldest end is unlinked first. Overwriting an existing key never evicts.
//!
//! Under [`EvictionPolicy::Fifo`] the list order is insertion order and never
//! changes on lookup. Under [`EvictionPolicy::Lru`] every hit and every
//! overwrite moves the node to the newest end.
//!
//! # Performance Characteristics
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `get` / `peek` / `contains_key` | O(1) |
//! | `put` (with or without eviction) | O(1) |
//! | `remove` | O(1) |
//! | `iter` | O(n) |
//!
//! # Thread Safety
//!
//! Not thread-safe. [`BoundedCache`](crate::BoundedCache) wraps it in a
//! reader/writer lock.

use crate::config::{BoundedCacheConfig, EvictionPolicy};
use crate::list::{self, List, Node};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// A bounded map that evicts in FIFO or LRU order.
///
/// # Examples
///
/// ```
/// use flakecache::config::EvictionPolicy;
/// use flakecache::ordered::OrderedMap;
///
/// let mut map = OrderedMap::new(2, EvictionPolicy::Fifo);
/// map.put("a", 1);
/// map.put("b", 2);
/// assert_eq!(map.get(&"a"), Some(&1)); // FIFO: lookups do not protect "a"
/// map.put("c", 3);
/// assert!(!map.contains_key(&"a"));
/// assert_eq!(map.iter().map(|(k, _)| *k).collect::<Vec<_>>(), ["b", "c"]);
/// ```
pub struct OrderedMap<K, V, S = DefaultHashBuilder> {
    capacity: usize,
    policy: EvictionPolicy,
    list: List<(K, V)>,
    map: HashMap<K, *mut Node<(K, V)>, S>,
}

// SAFETY: the raw pointers in `map` point only at nodes owned by `list`, which
// moves together with the map. No node is reachable from outside.
unsafe impl<K: Send, V: Send, S: Send> Send for OrderedMap<K, V, S> {}

// SAFETY: every mutation requires `&mut self`; `&self` methods only read nodes.
unsafe impl<K: Sync, V: Sync, S: Sync> Sync for OrderedMap<K, V, S> {}

impl<K: Hash + Eq, V> OrderedMap<K, V> {
    /// Creates an empty map with the default hasher.
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        Self::init(
            BoundedCacheConfig::new(capacity).with_policy(policy),
            DefaultHashBuilder::default(),
        )
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> OrderedMap<K, V, S> {
    /// Creates an empty map from a full configuration and hasher.
    pub fn init(config: BoundedCacheConfig, hash_builder: S) -> Self {
        OrderedMap {
            capacity: config.capacity,
            policy: config.policy,
            list: List::new(),
            map: HashMap::with_capacity_and_hasher(config.reserve_hint(), hash_builder),
        }
    }

    /// Maximum number of live entries.
    #[inline]
    pub fn cap(&self) -> usize {
        self.capacity
    }

    /// The eviction policy in force.
    #[inline]
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Looks up `key` without affecting eviction order under any policy.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = *self.map.get(key)?;
        // SAFETY: nodes in `map` are live members of `list`.
        unsafe { Some(&(*node).value().1) }
    }

    /// Looks up `key`; under LRU a hit becomes the newest entry.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.touch(key)?;
        // SAFETY: `touch` only returns live nodes.
        unsafe { Some(&(*node).value().1) }
    }

    /// Mutable lookup; under LRU a hit becomes the newest entry.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.touch(key)?;
        // SAFETY: `touch` only returns live nodes, and `&mut self` is held.
        unsafe { Some(&mut (*node).value_mut().1) }
    }

    /// Returns the value for `key`, or `default` when absent.
    pub fn get_or_default<'a, Q>(&'a mut self, key: &Q, default: &'a V) -> &'a V
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
        self.map.contains_key(key)
    }

    /// The entry that the next eviction would remove.
    pub fn oldest(&self) -> Option<(&K, &V)> {
        self.list.back().map(|(k, v)| (k, v))
    }

    /// Iterates entries from the next eviction candidate to the newest.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.list.iter(),
        }
    }

    /// Removes `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.map.remove(key)?;
        // SAFETY: the node was indexed by `map`, hence linked into `list`.
        let (_, value) = unsafe { self.list.unlink(node) };
        Some(value)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }

    /// Removes and returns the oldest entry.
    pub fn pop_oldest(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.pop_back()?;
        self.map.remove(&key);
        Some((key, value))
    }

    fn touch<Q>(&mut self, key: &Q) -> Option<*mut Node<(K, V)>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = *self.map.get(key)?;
        if self.policy.reorders_on_access() {
            // SAFETY: nodes in `map` are live members of `list`.
            unsafe { self.list.move_to_front(node) };
        }
        Some(node)
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> OrderedMap<K, V, S> {
    /// Inserts or overwrites `key`, returning the value it replaced.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.put_evicting(key, value).0
    }

    /// Inserts or overwrites `key`.
    ///
    /// Returns `(replaced, evicted)`: the previous value for `key` if it was
    /// present, and the entry pushed out to make room if it was not. With a
    /// capacity of zero the new entry itself comes back as evicted.
    pub fn put_evicting(&mut self, key: K, value: V) -> (Option<V>, Option<(K, V)>) {
        if let Some(&node) = self.map.get(&key) {
            // SAFETY: nodes in `map` are live members of `list`.
            let (_, previous) = unsafe {
                if self.policy.reorders_on_access() {
                    self.list.move_to_front(node);
                }
                self.list.replace(node, (key, value))
            };
            return (Some(previous), None);
        }

        if self.capacity == 0 {
            return (None, Some((key, value)));
        }

        let evicted = if self.map.len() >= self.capacity {
            self.pop_oldest()
        } else {
            None
        };

        let node = self.list.push_front((key.clone(), value));
        self.map.insert(key, node);
        debug_assert_eq!(self.map.len(), self.list.len());
        (None, evicted)
    }
}

impl<K, V, S> fmt::Debug for OrderedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedMap")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .field("len", &self.map.len())
            .finish()
    }
}

/// Iterator over `(&K, &V)` from oldest to newest; see [`OrderedMap::iter`].
pub struct Iter<'a, K, V> {
    inner: list::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.inner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<V>(map: &OrderedMap<&'static str, V>) -> Vec<&'static str> {
        map.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_fifo_get_put() {
        let mut map = OrderedMap::new(2, EvictionPolicy::Fifo);
        assert_eq!(map.put("apple", 1), None);
        assert_eq!(map.put("banana", 2), None);
        assert_eq!(map.get(&"apple"), Some(&1));
        assert_eq!(map.get(&"cherry"), None);
        assert_eq!(map.put("apple", 3), Some(1));
        assert_eq!(map.len(), 2);

        // "apple" was overwritten and read but is still the oldest insertion
        assert_eq!(map.put("cherry", 4), None);
        assert!(!map.contains_key(&"apple"));
        assert_eq!(keys(&map), ["banana", "cherry"]);
    }

    #[test]
    fn test_fifo_evicts_in_insertion_order() {
        let mut map = OrderedMap::new(3, EvictionPolicy::Fifo);
        for (i, key) in ["k1", "k2", "k3", "k4", "k5"].into_iter().enumerate() {
            let (_, evicted) = map.put_evicting(key, i);
            assert!(map.len() <= 3);
            match i {
                3 => assert_eq!(evicted, Some(("k1", 0))),
                4 => assert_eq!(evicted, Some(("k2", 1))),
                _ => assert_eq!(evicted, None),
            }
        }
        assert_eq!(keys(&map), ["k3", "k4", "k5"]);
        assert_eq!(map.oldest(), Some((&"k3", &2)));
    }

    #[test]
    fn test_lru_reorders_on_access() {
        let mut map = OrderedMap::new(3, EvictionPolicy::Lru);
        map.put("a", 1);
        map.put("b", 2);
        map.put("c", 3);
        assert_eq!(map.get(&"a"), Some(&1));
        assert_eq!(keys(&map), ["b", "c", "a"]);

        let (_, evicted) = map.put_evicting("d", 4);
        assert_eq!(evicted, Some(("b", 2)));

        // overwrite counts as a use
        map.put("c", 30);
        assert_eq!(keys(&map), ["a", "d", "c"]);
    }

    #[test]
    fn test_peek_and_contains_never_reorder() {
        let mut map = OrderedMap::new(2, EvictionPolicy::Lru);
        map.put("a", 1);
        map.put("b", 2);
        assert_eq!(map.peek(&"a"), Some(&1));
        assert!(map.contains_key(&"a"));
        map.put("c", 3);
        assert!(!map.contains_key(&"a"));
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut map = OrderedMap::new(2, EvictionPolicy::Fifo);
        map.put("counter", 0);
        *map.get_mut(&"counter").unwrap() += 5;
        assert_eq!(map.peek(&"counter"), Some(&5));
    }

    #[test]
    fn test_get_or_default() {
        let mut map = OrderedMap::new(2, EvictionPolicy::Fifo);
        map.put("a", 1);
        let fallback = 42;
        assert_eq!(*map.get_or_default(&"a", &fallback), 1);
        assert_eq!(*map.get_or_default(&"z", &fallback), 42);
    }

    #[test]
    fn test_zero_capacity_discards_everything() {
        let mut map = OrderedMap::new(0, EvictionPolicy::Fifo);
        assert_eq!(map.put_evicting("a", 1), (None, Some(("a", 1))));
        assert_eq!(map.put("b", 2), None);
        assert!(map.is_empty());
        assert_eq!(map.get(&"a"), None);
        assert_eq!(map.oldest(), None);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut map = OrderedMap::new(3, EvictionPolicy::Fifo);
        map.put("a", 1);
        map.put("b", 2);
        assert_eq!(map.remove(&"a"), Some(1));
        assert_eq!(map.remove(&"a"), None);
        assert_eq!(map.len(), 1);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
        map.put("c", 3);
        assert_eq!(keys(&map), ["c"]);
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut map: OrderedMap<String, usize> = OrderedMap::new(2, EvictionPolicy::Fifo);
        map.put(String::from("handler"), 7);
        assert_eq!(map.get("handler"), Some(&7));
        assert!(map.contains_key("handler"));
        assert_eq!(map.remove("handler"), Some(7));
    }

    #[test]
    fn test_capacity_invariant_under_churn() {
        let mut map = OrderedMap::new(16, EvictionPolicy::Lru);
        for i in 0..1_000u32 {
            map.put(i % 37, i);
            if i % 3 == 0 {
                map.get(&(i % 11));
            }
            if i % 7 == 0 {
                map.remove(&(i % 5));
            }
            assert!(map.len() <= 16);
            assert_eq!(map.iter().len(), map.len());
        }
    }
}
