//! Cache configuration types and builder patterns
//!
//! A [`CacheConfig`] carries the byte budget, the eviction strategy
//! identifier and whether access metrics are collected. It can be built in
//! code or deserialized from TOML:
//!
//! ```toml
//! max_bytes = 65536
//! strategy = "lru"
//! track_metrics = true
//! ```

use serde::Deserialize;

use crate::error::{CommonError, CommonResult};

/// Configuration for cache behavior
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum bytes (keys plus values) before eviction; `0` is unbounded
    pub max_bytes: u64,

    /// Eviction strategy identifier, resolved leniently when the cache is
    /// created
    pub strategy: String,

    /// Whether to collect hit/miss/eviction metrics
    pub track_metrics: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_bytes: 0, strategy: "lru".to_string(), track_metrics: false }
    }
}

impl CacheConfig {
    /// Create a new configuration builder
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// Quick preset for an LRU cache with a byte budget
    ///
    /// # Example
    /// ```
    /// use distcache_common::cache::CacheConfig;
    ///
    /// let config = CacheConfig::lru(2 << 10);
    /// assert_eq!(config.strategy, "lru");
    /// ```
    pub fn lru(max_bytes: u64) -> Self {
        Self { max_bytes, ..Self::default() }
    }

    /// Parse a configuration from a TOML document
    ///
    /// Missing fields take their defaults.
    pub fn from_toml_str(input: &str) -> CommonResult<Self> {
        let config: Self = toml::from_str(input)?;
        if config.strategy.trim().is_empty() {
            return Err(CommonError::config_field("strategy", "must not be empty"));
        }
        Ok(config)
    }
}

/// Builder for CacheConfig with fluent API
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the byte budget
    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.config.max_bytes = max_bytes;
        self
    }

    /// Set the eviction strategy identifier
    pub fn strategy(mut self, strategy: impl Into<String>) -> Self {
        self.config.strategy = strategy.into();
        self
    }

    /// Enable or disable metrics tracking
    pub fn track_metrics(mut self, enabled: bool) -> Self {
        self.config.track_metrics = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CacheConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::config.
    use super::*;

    /// Validates `CacheConfig::default` behavior for the cache config default
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `config.max_bytes` equals `0`.
    /// - Confirms `config.strategy` equals `"lru"`.
    /// - Ensures `!config.track_metrics` evaluates to true.
    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.max_bytes, 0);
        assert_eq!(config.strategy, "lru");
        assert!(!config.track_metrics);
    }

    /// Validates `CacheConfig::lru` preset.
    ///
    /// Assertions:
    /// - Confirms the budget is set and other fields are defaults.
    #[test]
    fn test_cache_config_lru_preset() {
        let config = CacheConfig::lru(2048);
        assert_eq!(config.max_bytes, 2048);
        assert_eq!(config.strategy, "lru");
        assert!(!config.track_metrics);
    }

    /// Validates `CacheConfig::builder` behavior for the builder chain
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms every setter is reflected in the built config.
    #[test]
    fn test_cache_config_builder() {
        let config =
            CacheConfig::builder().max_bytes(512).strategy("LRU").track_metrics(true).build();

        assert_eq!(config.max_bytes, 512);
        assert_eq!(config.strategy, "LRU");
        assert!(config.track_metrics);
    }

    /// Validates `CacheConfig::from_toml_str` with partial input.
    ///
    /// Assertions:
    /// - Confirms provided fields are read and missing ones default.
    #[test]
    fn test_from_toml_partial() {
        let config = CacheConfig::from_toml_str("max_bytes = 4096").unwrap();
        assert_eq!(config, CacheConfig::lru(4096));
    }

    /// Validates `CacheConfig::from_toml_str` with malformed input.
    ///
    /// Assertions:
    /// - Ensures a TOML serialization error is returned.
    /// - Ensures an empty strategy is rejected as a config error.
    #[test]
    fn test_from_toml_errors() {
        let err = CacheConfig::from_toml_str("max_bytes = \"lots\"").unwrap_err();
        assert!(matches!(err, CommonError::Serialization { .. }));

        let err = CacheConfig::from_toml_str("strategy = \"  \"").unwrap_err();
        assert!(matches!(err, CommonError::Config { field: ref f, .. } if f == "strategy"));
    }
}
