//! # flakecache
//!
//! Two leaf-level primitives for in-process infrastructure:
//!
//! - [`IdGenerator`]: Snowflake-style 63-bit unique IDs built from an identity
//!   prefix, a per-millisecond sequence and a time offset.
//! - [`BoundedCache`]: a capacity-limited, thread-safe key/value cache with
//!   FIFO or LRU eviction, plus [`UnboundedCache`] for the unlimited case.
//!
//! The two are independent; neither uses the other.
//!
//! ## ID Layout
//!
//! ```text
//! ┌───┬─────────┬─────────┬────────────┬──────────────────────────────┐
//! │ 0 │  part1  │  part2  │  sequence  │  milliseconds since epoch    │
//! └───┴─────────┴─────────┴────────────┴──────────────────────────────┘
//!        2 bits    5 bits    12 bits       44 bits       (defaults)
//! ```
//!
//! ## Quick Reference
//!
//! | Type | Description | Typical Use |
//! |------|-------------|-------------|
//! | [`IdGenerator`] | Unique, time-trending 63-bit IDs | Primary keys, request IDs |
//! | [`BoundedCache`] | `RwLock`-guarded FIFO/LRU cache | Client instances, derived handlers |
//! | [`UnboundedCache`] | `DashMap`-backed cache | Named singletons |
//! | [`OrderedMap`](ordered::OrderedMap) | Single-threaded bounded map | Building block, owned state |
//!
//! ## Generating IDs
//!
//! ```rust
//! use flakecache::config::IdGeneratorConfig;
//! use flakecache::IdGenerator;
//!
//! // datacenter 1, worker 7
//! let generator = IdGenerator::new(IdGeneratorConfig::default().with_identity(1, 7)).unwrap();
//!
//! let a = generator.next_id().unwrap();
//! let b = generator.next_id().unwrap();
//! assert_ne!(a, b);
//! assert_eq!(generator.decompose(b).identity_part2, 7);
//! ```
//!
//! Failures are explicit: a clock that moves backwards fails the call with
//! [`GenerateError::ClockMovedBackwards`], and a configuration whose timestamp
//! field has run out fails every call with [`GenerateError::Exhausted`].
//!
//! ## Caching
//!
//! ```rust
//! use flakecache::BoundedCache;
//!
//! let cache = BoundedCache::fifo(2);
//! cache.put("k1", 1);
//! cache.put("k2", 2);
//! cache.put("k3", 3); // evicts "k1", the oldest insertion
//!
//! assert_eq!(cache.get(&"k1"), None);
//! assert_eq!(cache.get(&"k3"), Some(3));
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events (generator setup, clock rollback,
//! exhaustion, evictions) and never installs a subscriber itself.
//!
//! ## Modules
//!
//! - [`idgen`]: the ID generator
//! - [`clock`]: time source abstraction used by the generator
//! - [`ordered`]: single-threaded bounded ordered map
//! - [`concurrent`]: thread-safe caches
//! - [`config`]: configuration structures
//! - [`error`]: error types
//! - [`metrics`]: cache counters

#[cfg(test)]
extern crate scoped_threadpool;

/// Time source abstraction.
pub mod clock;

/// Configuration structures for the generator and the caches.
pub mod config;

/// Error types for generator configuration and ID generation.
pub mod error;

/// Snowflake-style unique ID generator.
pub mod idgen;

/// Doubly linked list backing the ordered map.
///
/// Internal: exposes raw-pointer operations whose invariants are upheld by
/// [`ordered::OrderedMap`].
pub(crate) mod list;

/// Bounded, insertion-ordered map with FIFO or LRU eviction.
pub mod ordered;

/// Thread-safe cache implementations.
pub mod concurrent;

/// Cache metrics.
pub mod metrics;

pub use clock::{Clock, SystemClock};
pub use concurrent::{BoundedCache, UnboundedCache};
pub use config::{BoundedCacheConfig, EvictionPolicy, IdGeneratorConfig};
pub use error::{ConfigError, GenerateError};
pub use idgen::{IdGenerator, IdParts};
pub use ordered::OrderedMap;
