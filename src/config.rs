//! Configuration Module
//!
//! Plain configuration structs with public fields, one per component:
//!
//! | Config | Component |
//! |--------|-----------|
//! | [`IdGeneratorConfig`] | [`IdGenerator`](crate::IdGenerator) |
//! | [`BoundedCacheConfig`] | [`BoundedCache`](crate::BoundedCache) |
//!
//! Fields can be set directly or through the `with_*` helpers. Generator
//! configs are validated eagerly when the generator is built; cache configs
//! need no validation (every capacity, including zero, is accepted).
//!
//! With the `serde` feature both configs implement `Serialize` and
//! `Deserialize`, so a host can load them from its own configuration files.
//!
//! # Examples
//!
//! ```
//! use flakecache::config::{BoundedCacheConfig, EvictionPolicy, IdGeneratorConfig};
//!
//! let ids = IdGeneratorConfig::default().with_identity(1, 7);
//! assert!(ids.validate().is_ok());
//!
//! let cache = BoundedCacheConfig::new(256).with_policy(EvictionPolicy::Lru);
//! assert_eq!(cache.capacity, 256);
//! ```

pub mod cache;
pub mod id;

pub use cache::{BoundedCacheConfig, EvictionPolicy};
pub use id::IdGeneratorConfig;
