//! Testing utilities and helpers
//!
//! - **[`fixtures`]**: payload generators (with deterministic seeded variants)
//! - **[`mocks`]**: listener doubles that record what the cache reports
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use distcache_common::cache::{Cache, CacheConfig};
//! use distcache_common::testing::{payload, RecordingListener};
//!
//! let listener = Arc::new(RecordingListener::new());
//! let cache = Cache::with_listener(CacheConfig::lru(8), listener.clone());
//! cache.add("k1", payload(4));
//! cache.add("k2", payload(4));
//! assert_eq!(listener.keys(), vec!["k1".to_string()]);
//! ```

pub mod fixtures;
pub mod mocks;

pub use fixtures::{payload, payload_seeded};
pub use mocks::RecordingListener;
