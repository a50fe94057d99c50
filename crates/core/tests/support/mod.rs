//! Shared test helpers for `distcache-core` integration tests.
//!
//! Loaders here count their invocations so tests can assert how often the
//! source of truth was consulted.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::thread;
use std::time::Duration;

use distcache_core::{BoxError, Loader};
use parking_lot::Mutex;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness writer.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("distcache=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Error returned for keys the fake database does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNotFound(pub String);

impl fmt::Display for KeyNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} not exist", self.0)
    }
}

impl std::error::Error for KeyNotFound {}

/// In-memory source of truth that counts loads per key.
#[derive(Debug, Default)]
pub struct FakeDb {
    rows: HashMap<String, String>,
    loads: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
}

impl FakeDb {
    pub fn new<I, K, V>(rows: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Arc::new(Self::with_rows(rows, None))
    }

    /// Like [`FakeDb::new`], but every load sleeps for `delay` first.
    pub fn slow<I, K, V>(rows: I, delay: Duration) -> Arc<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Arc::new(Self::with_rows(rows, Some(delay)))
    }

    fn with_rows<I, K, V>(rows: I, delay: Option<Duration>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let rows = rows.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { rows, loads: Mutex::new(HashMap::new()), delay }
    }

    pub fn loads_for(&self, key: &str) -> usize {
        self.loads.lock().get(key).copied().unwrap_or(0)
    }

    pub fn total_loads(&self) -> usize {
        self.loads.lock().values().sum()
    }
}

/// Loader handle over a shared [`FakeDb`].
#[derive(Debug, Clone)]
pub struct DbLoader(pub Arc<FakeDb>);

impl Loader for DbLoader {
    fn load(&self, key: &str) -> Result<Vec<u8>, BoxError> {
        *self.0.loads.lock().entry(key.to_string()).or_insert(0) += 1;
        if let Some(delay) = self.0.delay {
            thread::sleep(delay);
        }
        match self.0.rows.get(key) {
            Some(value) => Ok(value.clone().into_bytes()),
            None => Err(KeyNotFound(key.to_string()).into()),
        }
    }
}

/// Loader that counts calls and always panics.
#[derive(Debug, Clone, Default)]
pub struct PanickingLoader {
    pub calls: Arc<AtomicUsize>,
}

impl PanickingLoader {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Loader for PanickingLoader {
    fn load(&self, key: &str) -> Result<Vec<u8>, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(100));
        panic!("loader failed hard for {key}");
    }
}
