//! Shared building blocks for distcache crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error taxonomy and configuration types
//! - `runtime`: the byte-budgeted cache, eviction strategies, and byte views
//! - `observability`: tracing instrumentation (implied by `runtime`)
//! - `test-utils`: fixtures shared by downstream test suites

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod cache;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "runtime")))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use cache::{
    ByteView, Cache, CacheConfig, CacheError, CacheStats, EvictionListener, EvictionStrategy,
    LruStrategy, StrategyKind, Value,
};
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
