//! Byte-budgeted caching with pluggable eviction strategies
//!
//! This module provides the storage half of distcache: a thread-safe
//! [`Cache`] of immutable [`ByteView`] values whose total footprint (key bytes
//! plus value bytes) is kept under a configured budget by an
//! [`EvictionStrategy`].
//!
//! # Features
//!
//! - **Thread-safe**: `add` takes an exclusive lock, `get` a shared one
//! - **Lazy**: the strategy is built on the first `add`, never before
//! - **Pluggable**: strategies implement [`EvictionStrategy`] and are selected
//!   by identifier through [`StrategyKind`]; LRU is the only policy today
//! - **Observable**: optional hit/miss/eviction statistics and an
//!   [`EvictionListener`] callback
//!
//! # Examples
//!
//! ## Simple LRU Cache
//! ```
//! use distcache_common::cache::{ByteView, Cache, CacheConfig};
//!
//! let cache = Cache::new(CacheConfig::lru(1024));
//! cache.add("key", ByteView::from("value"));
//! assert_eq!(cache.get("key").map(|v| v.to_string()).as_deref(), Some("value"));
//! ```
//!
//! ## Custom Configuration with Builder
//! ```
//! use distcache_common::cache::{ByteView, Cache, CacheConfig};
//!
//! let config = CacheConfig::builder().max_bytes(64).strategy("lru").track_metrics(true).build();
//!
//! let cache = Cache::new(config);
//! cache.add("key1", ByteView::from("1"));
//! let _ = cache.get("key1");
//!
//! let stats = cache.stats();
//! assert_eq!(stats.hits, 1);
//! assert_eq!(stats.used_bytes, 5);
//! ```
//!
//! ## Eviction Callbacks
//! ```
//! use std::sync::Arc;
//!
//! use distcache_common::cache::{ByteView, Cache, CacheConfig, EvictionListener, Value};
//!
//! let listener: Arc<dyn EvictionListener> = Arc::new(|key: &str, value: &dyn Value| {
//!     println!("evicted {key} ({} bytes)", value.len());
//! });
//! let cache = Cache::with_listener(CacheConfig::lru(4), listener);
//! cache.add("big", ByteView::from("does not fit"));
//! assert!(cache.is_empty());
//! ```
//!
//! # Thread Safety
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use distcache_common::cache::{ByteView, Cache, CacheConfig};
//!
//! let cache = Arc::new(Cache::new(CacheConfig::lru(4096)));
//!
//! let mut handles = vec![];
//! for i in 0..10 {
//!     let cache_clone = Arc::clone(&cache);
//!     handles.push(thread::spawn(move || {
//!         cache_clone.add(&format!("key-{}", i), ByteView::from(i.to_string()));
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 10);
//! ```

mod byte_view;
mod config;
mod core;
mod error;
mod stats;
pub mod strategy;
mod value;

// Re-export public API
pub use self::core::Cache;

pub use byte_view::ByteView;
pub use config::{CacheConfig, CacheConfigBuilder};
pub use error::{CacheError, CacheResult};
pub use stats::CacheStats;
pub use strategy::{EvictionStrategy, LruStrategy, StrategyKind};
pub use value::{EvictionListener, Value};
