//! Value contract and eviction callbacks shared by every strategy.

use std::any::Any;
use std::fmt;

/// A payload that can be stored in an eviction strategy.
///
/// The reported length is what the byte budget charges for the value, so it
/// must stay stable for as long as the value is stored.
pub trait Value: Any + Send + Sync {
    /// Size of the payload in bytes.
    fn len(&self) -> usize;

    /// Returns `true` when the payload holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upcast used to recover the concrete value type on reads.
    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value").field("len", &self.len()).finish_non_exhaustive()
    }
}

/// Callback invoked after an entry leaves a strategy because of the budget.
///
/// Runs while the strategy lock is held. Implementations must not call back
/// into the strategy that evicted the entry.
pub trait EvictionListener: Send + Sync {
    /// Called once per evicted entry.
    fn on_evicted(&self, key: &str, value: &dyn Value);
}

impl<F> EvictionListener for F
where
    F: Fn(&str, &dyn Value) + Send + Sync,
{
    fn on_evicted(&self, key: &str, value: &dyn Value) {
        self(key, value);
    }
}
