//! Eviction strategies and the factory that selects one by identifier.
//!
//! A strategy is a keyed store that keeps its total footprint (key bytes plus
//! value bytes) under a byte budget. [`LruStrategy`] is the only policy built
//! today; new policies implement [`EvictionStrategy`] and get a
//! [`StrategyKind`] variant.

mod lru;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use self::lru::LruStrategy;
use super::error::CacheError;
use super::value::{EvictionListener, Value};

/// A bounded keyed store with a replacement policy.
///
/// Every method takes `&self`; implementations guard their own state.
pub trait EvictionStrategy: Send + Sync {
    /// Insert or update `key`, then evict until the byte budget is met.
    fn add(&self, key: &str, value: Arc<dyn Value>);

    /// Look up `key`, marking it as recently used on a hit.
    fn get(&self, key: &str) -> Option<Arc<dyn Value>>;

    /// Evict the single entry the policy ranks lowest, returning its key.
    fn remove_oldest(&self) -> Option<String>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Returns `true` when nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes currently charged against the budget.
    fn used_bytes(&self) -> u64;

    /// Configured budget; `0` means unbounded.
    fn max_bytes(&self) -> u64;

    /// Which policy this strategy implements.
    fn kind(&self) -> StrategyKind;
}

/// Known eviction strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Least recently used.
    #[default]
    Lru,
}

impl StrategyKind {
    /// Identifier used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lru => "lru",
        }
    }

    /// Resolve an identifier, falling back to LRU when it is not recognised.
    pub fn resolve(identifier: &str) -> Self {
        identifier.parse().unwrap_or_else(|err: CacheError| {
            warn!(strategy = identifier, error = %err, "falling back to lru strategy");
            Self::Lru
        })
    }

    /// Construct a fresh strategy of this kind.
    pub fn build(
        self,
        max_bytes: u64,
        listener: Option<Arc<dyn EvictionListener>>,
    ) -> Box<dyn EvictionStrategy> {
        match self {
            Self::Lru => Box::new(LruStrategy::new(max_bytes, listener)),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(Self::Lru),
            _ => Err(CacheError::UnknownStrategy { identifier: s.to_string() }),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::strategy.
    use super::*;
    use crate::cache::ByteView;

    /// Validates `StrategyKind::from_str` for accepted spellings.
    ///
    /// Assertions:
    /// - Confirms case and surrounding whitespace are ignored.
    #[test]
    fn test_parse_known_identifier() {
        assert_eq!("lru".parse::<StrategyKind>().ok(), Some(StrategyKind::Lru));
        assert_eq!(" LRU ".parse::<StrategyKind>().ok(), Some(StrategyKind::Lru));
    }

    /// Validates `StrategyKind::from_str` for unknown identifiers.
    ///
    /// Assertions:
    /// - Ensures an `UnknownStrategy` error carries the raw identifier.
    #[test]
    fn test_parse_unknown_identifier() {
        let err = "lfu".parse::<StrategyKind>().unwrap_err();
        assert!(matches!(err, CacheError::UnknownStrategy { ref identifier } if identifier == "lfu"));
    }

    /// Validates `StrategyKind::resolve` lenient fallback.
    ///
    /// Assertions:
    /// - Confirms unknown and empty identifiers resolve to LRU.
    #[test]
    fn test_resolve_falls_back_to_lru() {
        assert_eq!(StrategyKind::resolve("fifo"), StrategyKind::Lru);
        assert_eq!(StrategyKind::resolve(""), StrategyKind::Lru);
        assert_eq!(StrategyKind::resolve("lru"), StrategyKind::Lru);
    }

    /// Validates `StrategyKind::build` output.
    ///
    /// Assertions:
    /// - Confirms the built strategy reports its kind and budget.
    /// - Ensures stored values are readable through the trait object.
    #[test]
    fn test_build_lru() {
        let strategy = StrategyKind::Lru.build(64, None);
        assert_eq!(strategy.kind(), StrategyKind::Lru);
        assert_eq!(strategy.max_bytes(), 64);
        assert!(strategy.is_empty());

        strategy.add("k", Arc::new(ByteView::from("v")));
        assert_eq!(strategy.len(), 1);
        assert_eq!(strategy.used_bytes(), 2);
        assert!(strategy.get("k").is_some());
    }

    /// Validates serde naming of `StrategyKind`.
    ///
    /// Assertions:
    /// - Confirms `Display` and `as_str` agree on the lowercase identifier.
    #[test]
    fn test_display_matches_identifier() {
        assert_eq!(StrategyKind::Lru.to_string(), "lru");
        assert_eq!(StrategyKind::default().as_str(), "lru");
    }
}
