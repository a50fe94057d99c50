//! Concurrency-safe cache wrapper around a lazily built eviction strategy
//!
//! The strategy slot starts empty and is filled on the first `add`, under the
//! write lock, so a cache that is never written never allocates a strategy.
//! Reads take the shared lock; a read against an empty slot is a miss.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::byte_view::ByteView;
use super::config::CacheConfig;
use super::stats::{CacheStats, MetricsCollector};
use super::strategy::{EvictionStrategy, StrategyKind};
use super::value::{EvictionListener, Value};

/// Byte-budgeted cache of [`ByteView`] values
///
/// # Example
/// ```
/// use distcache_common::cache::{ByteView, Cache, CacheConfig};
///
/// let cache = Cache::new(CacheConfig::lru(1024));
/// assert!(cache.get("key").is_none());
///
/// cache.add("key", ByteView::from("value"));
/// assert_eq!(cache.get("key").map(|v| v.to_string()).as_deref(), Some("value"));
/// ```
pub struct Cache {
    strategy: RwLock<Option<Box<dyn EvictionStrategy>>>,
    kind: StrategyKind,
    max_bytes: u64,
    track_metrics: bool,
    metrics: MetricsCollector,
    listener: Option<Arc<dyn EvictionListener>>,
}

impl Cache {
    /// Create a cache from `config`
    ///
    /// An unrecognised strategy identifier logs a warning and falls back to
    /// LRU.
    pub fn new(config: CacheConfig) -> Self {
        Self::build(config, None)
    }

    /// Create a cache whose strategy reports evictions to `listener`
    pub fn with_listener(config: CacheConfig, listener: Arc<dyn EvictionListener>) -> Self {
        Self::build(config, Some(listener))
    }

    fn build(config: CacheConfig, listener: Option<Arc<dyn EvictionListener>>) -> Self {
        Self {
            strategy: RwLock::new(None),
            kind: StrategyKind::resolve(&config.strategy),
            max_bytes: config.max_bytes,
            track_metrics: config.track_metrics,
            metrics: MetricsCollector::new(),
            listener,
        }
    }

    /// Insert or update `key`
    pub fn add(&self, key: &str, value: ByteView) {
        let mut slot = self.strategy.write();
        let strategy = slot.get_or_insert_with(|| self.new_strategy());
        strategy.add(key, Arc::new(value));

        if self.track_metrics {
            self.metrics.record_add();
        }
    }

    /// Look up `key`
    ///
    /// Values stored under a different concrete type are reported as misses.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let found = self.peek(key);

        if self.track_metrics {
            if found.is_some() {
                self.metrics.record_hit();
            } else {
                self.metrics.record_miss();
            }
        }
        found
    }

    /// Look up `key` without touching the hit and miss counters
    ///
    /// Recency is still updated on a hit. Callers that already recorded the
    /// access through [`Cache::get`] use this to look again.
    pub fn peek(&self, key: &str) -> Option<ByteView> {
        let slot = self.strategy.read();
        slot.as_ref()
            .and_then(|strategy| strategy.get(key))
            .and_then(|value| value.as_any().downcast_ref::<ByteView>().cloned())
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.strategy.read().as_ref().map_or(0, |strategy| strategy.len())
    }

    /// Returns `true` when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes currently charged against the budget
    pub fn used_bytes(&self) -> u64 {
        self.strategy.read().as_ref().map_or(0, |strategy| strategy.used_bytes())
    }

    /// Configured byte budget; `0` means unbounded
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Whether the strategy has been constructed yet
    pub fn is_initialized(&self) -> bool {
        self.strategy.read().is_some()
    }

    /// Strategy this cache builds (or has built)
    pub fn strategy_kind(&self) -> StrategyKind {
        self.kind
    }

    /// Snapshot of size and access metrics
    ///
    /// Counters stay at zero unless `track_metrics` was enabled.
    pub fn stats(&self) -> CacheStats {
        let slot = self.strategy.read();
        let (entries, used_bytes) =
            slot.as_ref().map_or((0, 0), |strategy| (strategy.len(), strategy.used_bytes()));
        let max_bytes = (self.max_bytes != 0).then_some(self.max_bytes);
        self.metrics.snapshot(entries, used_bytes, max_bytes)
    }

    /// Zero the access counters
    pub fn reset_stats(&self) {
        self.metrics.reset();
    }

    fn new_strategy(&self) -> Box<dyn EvictionStrategy> {
        debug!(strategy = %self.kind, max_bytes = self.max_bytes, "constructing eviction strategy");
        let listener = if self.track_metrics {
            let hook = EvictionHook { metrics: self.metrics.clone(), inner: self.listener.clone() };
            Some(Arc::new(hook) as Arc<dyn EvictionListener>)
        } else {
            self.listener.clone()
        };
        self.kind.build(self.max_bytes, listener)
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("kind", &self.kind)
            .field("max_bytes", &self.max_bytes)
            .field("initialized", &self.is_initialized())
            .field("track_metrics", &self.track_metrics)
            .finish_non_exhaustive()
    }
}

/// Counts evictions, then forwards to the caller's listener.
struct EvictionHook {
    metrics: MetricsCollector,
    inner: Option<Arc<dyn EvictionListener>>,
}

impl EvictionListener for EvictionHook {
    fn on_evicted(&self, key: &str, value: &dyn Value) {
        self.metrics.record_eviction();
        if let Some(inner) = &self.inner {
            inner.on_evicted(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::core.
    use std::any::Any;

    use super::*;
    use crate::testing::{payload, RecordingListener};

    /// Validates `Cache::get` before any `add`.
    ///
    /// Assertions:
    /// - Ensures the lookup misses without building a strategy.
    #[test]
    fn test_get_before_add_is_miss() {
        let cache = Cache::new(CacheConfig::lru(64));
        assert!(cache.get("key").is_none());
        assert!(!cache.is_initialized());
        assert!(cache.is_empty());
        assert_eq!(cache.used_bytes(), 0);
    }

    /// Validates lazy construction on the first `add`.
    ///
    /// Assertions:
    /// - Ensures the strategy exists after the first write.
    /// - Confirms the stored value reads back.
    #[test]
    fn test_add_builds_strategy_once() {
        let cache = Cache::new(CacheConfig::lru(64));
        cache.add("key", ByteView::from("value"));
        assert!(cache.is_initialized());

        let first = {
            let slot = cache.strategy.read();
            slot.as_ref().map(|s| std::ptr::addr_of!(**s).cast::<()>())
        };
        cache.add("other", ByteView::from("v"));
        let second = {
            let slot = cache.strategy.read();
            slot.as_ref().map(|s| std::ptr::addr_of!(**s).cast::<()>())
        };

        assert_eq!(first, second);
        assert_eq!(cache.get("key").map(|v| v.to_string()).as_deref(), Some("value"));
        assert_eq!(cache.len(), 2);
    }

    /// Validates the lenient fallback for unknown strategy identifiers.
    ///
    /// Assertions:
    /// - Confirms the cache resolves to LRU and stays usable.
    #[test]
    fn test_unknown_strategy_falls_back() {
        let config = CacheConfig::builder().max_bytes(64).strategy("clock").build();
        let cache = Cache::new(config);
        assert_eq!(cache.strategy_kind(), StrategyKind::Lru);

        cache.add("k", ByteView::from("v"));
        assert!(cache.get("k").is_some());
    }

    /// Validates that a foreign value type is treated as a miss.
    ///
    /// Assertions:
    /// - Ensures `get` returns `None` for a non-`ByteView` entry.
    #[test]
    fn test_foreign_value_type_is_miss() {
        struct Opaque;
        impl Value for Opaque {
            fn len(&self) -> usize {
                1
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        let cache = Cache::new(CacheConfig::default());
        cache.add("seed", ByteView::default());
        if let Some(strategy) = cache.strategy.read().as_ref() {
            strategy.add("opaque", Arc::new(Opaque));
        }

        assert!(cache.get("opaque").is_none());
        assert!(cache.get("seed").is_some());
    }

    /// Validates metrics collection and the forwarding eviction hook.
    ///
    /// Assertions:
    /// - Confirms hits, misses, adds and evictions are counted.
    /// - Confirms the user listener still receives the evicted key.
    #[test]
    fn test_stats_and_listener_forwarding() {
        let listener = Arc::new(RecordingListener::new());
        let config = CacheConfig::builder().max_bytes(2 * (2 + 8)).track_metrics(true).build();
        let cache = Cache::with_listener(config, listener.clone());

        cache.add("k1", payload(8));
        cache.add("k2", payload(8));
        cache.add("k3", payload(8));
        assert!(cache.get("k1").is_none());
        assert!(cache.get("k3").is_some());

        let stats = cache.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.used_bytes, 20);
        assert_eq!(stats.max_bytes, Some(20));
        assert_eq!((stats.hits, stats.misses, stats.adds, stats.evictions), (1, 1, 3, 1));
        assert_eq!(stats.fill_percentage(), Some(1.0));
        assert_eq!(listener.keys(), vec!["k1".to_string()]);

        cache.reset_stats();
        assert_eq!(cache.stats().total_accesses(), 0);
    }

    /// Validates that `peek` leaves the access counters alone.
    ///
    /// Assertions:
    /// - Confirms `peek` returns stored values and misses absent keys.
    /// - Ensures hits and misses only reflect `get` calls.
    #[test]
    fn test_peek_records_no_metrics() {
        let config = CacheConfig::builder().max_bytes(64).track_metrics(true).build();
        let cache = Cache::new(config);

        assert!(cache.peek("k").is_none());
        cache.add("k", ByteView::from("v"));
        assert_eq!(cache.peek("k").map(|v| v.to_string()).as_deref(), Some("v"));
        assert!(cache.peek("absent").is_none());

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.adds), (0, 0, 1));

        assert!(cache.get("k").is_some());
        assert!(cache.get("absent").is_none());
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    /// Validates that counters stay idle when metrics are disabled.
    ///
    /// Assertions:
    /// - Confirms counters remain zero while sizes are still reported.
    #[test]
    fn test_stats_without_tracking() {
        let cache = Cache::new(CacheConfig::default());
        cache.add("k", ByteView::from("v"));
        let _ = cache.get("k");

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.used_bytes, 2);
        assert!(stats.max_bytes.is_none());
        assert_eq!(stats.hits + stats.adds, 0);
    }
}
