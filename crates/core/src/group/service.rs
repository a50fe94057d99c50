//! Cache-aside group service - core get-or-load logic

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use distcache_common::cache::{ByteView, Cache, CacheConfig, EvictionListener};
use tracing::{debug, warn};

use super::flight::{Flight, FlightGroup};
use super::ports::{BoxError, Loader, LoaderFn};
use crate::error::{GroupError, GroupResult};

/// A named cache backed by a loader
///
/// `get` returns cached values and loads missing ones through the loader,
/// storing the result before returning it. Concurrent misses for one key
/// share a single loader call.
pub struct Group {
    name: String,
    loader: Arc<dyn Loader>,
    cache: Cache,
    flights: FlightGroup<GroupResult<ByteView>>,
    counters: Counters,
}

impl Group {
    /// Create an LRU group with a `cache_bytes` budget
    pub fn new(name: impl Into<String>, cache_bytes: u64, loader: impl Loader + 'static) -> Self {
        Self::assemble(name.into(), Arc::new(loader), Cache::new(CacheConfig::lru(cache_bytes)))
    }

    /// Start building a group with non-default cache settings
    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder::new(name)
    }

    fn assemble(name: String, loader: Arc<dyn Loader>, cache: Cache) -> Self {
        Self { name, loader, cache, flights: FlightGroup::new(), counters: Counters::default() }
    }

    /// Group name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The group's cache
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Get the value for `key`, loading it on a miss
    ///
    /// An empty key yields an empty value without consulting the loader.
    pub fn get(&self, key: &str) -> GroupResult<ByteView> {
        Counters::bump(&self.counters.gets);

        if key.is_empty() {
            warn!(group = %self.name, "empty key requested");
            Counters::bump(&self.counters.empty_keys);
            return Ok(ByteView::default());
        }

        if let Some(value) = self.cache.get(key) {
            debug!(group = %self.name, key, "cache hit");
            Counters::bump(&self.counters.cache_hits);
            return Ok(value);
        }

        self.load(key)
    }

    /// Snapshot of request counters
    pub fn stats(&self) -> GroupStats {
        self.counters.snapshot()
    }

    fn load(&self, key: &str) -> GroupResult<ByteView> {
        match self.flights.run(key, || self.get_locally(key)) {
            Flight::Led(result) => result,
            Flight::Shared(result) => {
                Counters::bump(&self.counters.deduplicated_loads);
                result
            }
            Flight::Panicked => Err(GroupError::LoadPanicked { key: key.to_string() }),
        }
    }

    fn get_locally(&self, key: &str) -> GroupResult<ByteView> {
        // a flight that finished just before this one may have filled the slot;
        // the miss was already counted by `get`
        if let Some(value) = self.cache.peek(key) {
            Counters::bump(&self.counters.cache_hits);
            return Ok(value);
        }

        debug!(group = %self.name, key, "loading from source");
        Counters::bump(&self.counters.loads);
        let bytes = self.loader.load(key).map_err(|source| {
            Counters::bump(&self.counters.load_errors);
            GroupError::Load { key: key.to_string(), source: Arc::from(source) }
        })?;

        let value = ByteView::from(bytes);
        self.cache.add(key, value.clone());
        Ok(value)
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group").field("name", &self.name).field("cache", &self.cache).finish()
    }
}

/// Builder for [`Group`]
pub struct GroupBuilder {
    name: String,
    config: CacheConfig,
    loader: Option<Arc<dyn Loader>>,
    listener: Option<Arc<dyn EvictionListener>>,
}

impl GroupBuilder {
    /// Create a builder for a group called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), config: CacheConfig::default(), loader: None, listener: None }
    }

    /// Replace the whole cache configuration
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Byte budget for the group's cache; `0` is unbounded
    pub fn cache_bytes(mut self, max_bytes: u64) -> Self {
        self.config.max_bytes = max_bytes;
        self
    }

    /// Eviction strategy identifier
    pub fn strategy(mut self, strategy: impl Into<String>) -> Self {
        self.config.strategy = strategy.into();
        self
    }

    /// Enable cache hit/miss/eviction metrics
    pub fn track_metrics(mut self, enabled: bool) -> Self {
        self.config.track_metrics = enabled;
        self
    }

    /// Loader used on cache misses
    pub fn loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Loader given as a closure
    pub fn loader_fn<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<u8>, BoxError> + Send + Sync + 'static,
    {
        self.loader(LoaderFn::new(f))
    }

    /// Listener notified when the cache evicts an entry
    pub fn eviction_listener(mut self, listener: Arc<dyn EvictionListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Build the group
    ///
    /// Fails with [`GroupError::MissingLoader`] when no loader was set.
    pub fn build(self) -> GroupResult<Group> {
        let Some(loader) = self.loader else {
            return Err(GroupError::MissingLoader { group: self.name });
        };
        let cache = match self.listener {
            Some(listener) => Cache::with_listener(self.config, listener),
            None => Cache::new(self.config),
        };
        Ok(Group::assemble(self.name, loader, cache))
    }
}

impl fmt::Debug for GroupBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupBuilder")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("has_loader", &self.loader.is_some())
            .finish_non_exhaustive()
    }
}

/// Request counters for a [`Group`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupStats {
    /// Calls to `get`
    pub gets: u64,
    /// Requests answered from the cache
    pub cache_hits: u64,
    /// Loader invocations
    pub loads: u64,
    /// Loader invocations that returned an error
    pub load_errors: u64,
    /// Requests that joined another caller's in-flight load
    pub deduplicated_loads: u64,
    /// Requests rejected for an empty key
    pub empty_keys: u64,
}

#[derive(Debug, Default)]
struct Counters {
    gets: AtomicU64,
    cache_hits: AtomicU64,
    loads: AtomicU64,
    load_errors: AtomicU64,
    deduplicated_loads: AtomicU64,
    empty_keys: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> GroupStats {
        GroupStats {
            gets: self.gets.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            load_errors: self.load_errors.load(Ordering::Relaxed),
            deduplicated_loads: self.deduplicated_loads.load(Ordering::Relaxed),
            empty_keys: self.empty_keys.load(Ordering::Relaxed),
        }
    }
}
