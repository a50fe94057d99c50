//! Test doubles for cache callbacks

use parking_lot::Mutex;

use crate::cache::{EvictionListener, Value};

/// Eviction listener that records every `(key, value length)` it receives
#[derive(Debug, Default)]
pub struct RecordingListener {
    evicted: Mutex<Vec<(String, usize)>>,
}

impl RecordingListener {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Evicted keys in the order they were reported
    pub fn keys(&self) -> Vec<String> {
        self.evicted.lock().iter().map(|(key, _)| key.clone()).collect()
    }

    /// Evicted `(key, value length)` pairs in the order they were reported
    pub fn entries(&self) -> Vec<(String, usize)> {
        self.evicted.lock().clone()
    }

    /// Number of evictions seen
    pub fn count(&self) -> usize {
        self.evicted.lock().len()
    }
}

impl EvictionListener for RecordingListener {
    fn on_evicted(&self, key: &str, value: &dyn Value) {
        self.evicted.lock().push((key.to_string(), value.len()));
    }
}
