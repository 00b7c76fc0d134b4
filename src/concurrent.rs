//! Concurrent Cache Implementations
//!
//! Thread-safe caches meant to be shared across worker threads, typically
//! behind an `Arc` or in a `static`.
//!
//! # Architecture
//!
//! [`BoundedCache`] wraps a single [`OrderedMap`](crate::ordered::OrderedMap)
//! in one `parking_lot::RwLock`:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    BoundedCache                      │
//! │                                                      │
//! │   get / contains_key / get_or_default ──▶ read()     │
//! │   put / remove / clear               ──▶ write()     │
//! │                                                      │
//! │   ┌──────────────────────────────────────────────┐   │
//! │   │              RwLock<OrderedMap>              │   │
//! │   │  oldest ◀── k1 ── k2 ── ... ── kN ──▶ newest │   │
//! │   └──────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why RwLock Here?
//!
//! Under FIFO a lookup never changes eviction order, so any number of readers
//! proceed in parallel and only inserts serialise. Under LRU a hit moves the
//! entry, so lookups take the write lock just like inserts; the cache picks
//! the lock mode per call from its [`EvictionPolicy`](crate::config::EvictionPolicy).
//!
//! Each operation acquires exactly one guard and releases it on every exit
//! path, so there is no lock ordering to get wrong. Evicted and replaced
//! values are dropped after the guard is released.
//!
//! [`UnboundedCache`] has no capacity and therefore no eviction order to
//! protect; it delegates to `dashmap::DashMap` and its per-shard locks.
//!
//! # Available Concurrent Caches
//!
//! | Type | Bound | Synchronisation |
//! |------|-------|-----------------|
//! | [`BoundedCache`] | `capacity` entries, FIFO or LRU | one `RwLock` |
//! | [`UnboundedCache`] | none | sharded `DashMap` |
//!
//! # Memoisation
//!
//! Both caches offer `get_or_insert_with`, the usual way to hold lazily built
//! singletons, configured clients or derived handlers. The builder runs
//! outside any lock, so two threads that miss together may both build; the
//! first to insert wins and both callers receive that value.
//!
//! # Example
//!
//! ```rust
//! use flakecache::BoundedCache;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(BoundedCache::fifo(1000));
//!
//! let handles: Vec<_> = (0..4).map(|t| {
//!     let cache = Arc::clone(&cache);
//!     thread::spawn(move || {
//!         for i in 0..100 {
//!             let key = format!("key_{}_{}", t, i);
//!             cache.put(key.clone(), i);
//!             let _ = cache.get(&key);
//!         }
//!     })
//! }).collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 400);
//! ```

mod bounded;
mod unbounded;

pub use self::bounded::BoundedCache;
pub use self::unbounded::UnboundedCache;
