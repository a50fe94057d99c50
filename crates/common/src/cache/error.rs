//! Cache error types.

use std::time::Duration;

use thiserror::Error;

use crate::error::{CommonError, ErrorClassification, ErrorSeverity};

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors raised while configuring a cache.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The strategy identifier does not name a known eviction strategy.
    #[error("unknown eviction strategy '{identifier}'")]
    UnknownStrategy {
        /// Identifier as supplied by the caller.
        identifier: String,
    },

    /// Shared error variants.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl ErrorClassification for CacheError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::UnknownStrategy { .. } => false,
            Self::Common(err) => err.is_retryable(),
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownStrategy { .. } => ErrorSeverity::Error,
            Self::Common(err) => err.severity(),
        }
    }

    fn is_critical(&self) -> bool {
        match self {
            Self::UnknownStrategy { .. } => false,
            Self::Common(err) => err.is_critical(),
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::UnknownStrategy { .. } => None,
            Self::Common(err) => err.retry_after(),
        }
    }
}
