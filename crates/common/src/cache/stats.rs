//! Cache statistics and metrics tracking
//!
//! This module provides types for tracking cache performance metrics
//! including hit rates, eviction counts, and byte usage.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Current number of entries
    pub entries: usize,

    /// Bytes currently charged against the budget
    pub used_bytes: u64,

    /// Byte budget (None = unbounded)
    pub max_bytes: Option<u64>,

    /// Total number of successful get operations
    pub hits: u64,

    /// Total number of failed get operations
    pub misses: u64,

    /// Total number of add operations
    pub adds: u64,

    /// Total number of evicted entries
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate hit rate (hits / total accesses)
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_accesses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Calculate miss rate (misses / total accesses)
    pub fn miss_rate(&self) -> f64 {
        if self.total_accesses() == 0 {
            0.0
        } else {
            1.0 - self.hit_rate()
        }
    }

    /// Calculate fill percentage (used_bytes / max_bytes)
    pub fn fill_percentage(&self) -> Option<f64> {
        self.max_bytes.map(|max| if max == 0 { 0.0 } else { self.used_bytes as f64 / max as f64 })
    }

    /// Total number of access operations (hits + misses)
    pub fn total_accesses(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Thread-safe metrics collector for cache operations
///
/// Clones share the same counters, so a clone can be moved into the eviction
/// hook while the cache keeps recording hits and misses.
#[derive(Debug, Clone, Default)]
pub(crate) struct MetricsCollector {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    adds: Arc<AtomicU64>,
    evictions: Arc<AtomicU64>,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_add(&self) {
        self.adds.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics snapshot
    pub(crate) fn snapshot(
        &self,
        entries: usize,
        used_bytes: u64,
        max_bytes: Option<u64>,
    ) -> CacheStats {
        CacheStats {
            entries,
            used_bytes,
            max_bytes,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            adds: self.adds.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero
    pub(crate) fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.adds.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}
