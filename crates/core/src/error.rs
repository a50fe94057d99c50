//! Group error types.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use distcache_common::error::{CommonError, ErrorClassification, ErrorSeverity};
use thiserror::Error;

/// Result type for group operations.
pub type GroupResult<T> = Result<T, GroupError>;

/// Errors raised while building groups or loading values.
///
/// Cloneable so one load outcome can be handed to every caller that joined
/// the same in-flight request.
#[derive(Debug, Clone, Error)]
pub enum GroupError {
    /// A group was built without a loader.
    #[error("group '{group}' was built without a loader")]
    MissingLoader {
        /// Name of the group being built.
        group: String,
    },

    /// The loader returned an error; the original error is the source.
    #[error("failed to load key '{key}': {source}")]
    Load {
        /// Key whose load failed.
        key: String,
        /// Error returned by the loader.
        source: Arc<dyn StdError + Send + Sync>,
    },

    /// The loader panicked while other callers were waiting on it.
    #[error("loader panicked while loading key '{key}'")]
    LoadPanicked {
        /// Key the panicking load was serving.
        key: String,
    },

    /// Shared error variants.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl GroupError {
    /// The loader's original error, for `Load` failures.
    pub fn loader_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Self::Load { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl ErrorClassification for GroupError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Load { .. } => true,
            Self::MissingLoader { .. } | Self::LoadPanicked { .. } => false,
            Self::Common(err) => err.is_retryable(),
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Load { .. } => ErrorSeverity::Warning,
            Self::MissingLoader { .. } => ErrorSeverity::Error,
            Self::LoadPanicked { .. } => ErrorSeverity::Critical,
            Self::Common(err) => err.severity(),
        }
    }

    fn is_critical(&self) -> bool {
        match self {
            Self::LoadPanicked { .. } => true,
            Self::Load { .. } | Self::MissingLoader { .. } => false,
            Self::Common(err) => err.is_critical(),
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Common(err) => err.retry_after(),
            _ => None,
        }
    }
}
