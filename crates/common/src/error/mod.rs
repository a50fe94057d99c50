//! Common error types shared by distcache crates
//!
//! The error handling system has three pieces:
//!
//! 1. **`CommonError`**: the error patterns that show up in more than one
//!    crate (configuration, serialization, lookups).
//!
//! 2. **`ErrorClassification` trait**: a standard interface for classifying
//!    errors by retryability, severity and criticality.
//!
//! 3. **`ErrorSeverity` enum**: a unified severity level for logging and
//!    alerting.
//!
//! Module-specific errors **compose** with `CommonError` instead of
//! duplicating its variants:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum GroupError {
//!     #[error("group '{group}' was built without a loader")]
//!     MissingLoader { group: String },
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//! ```
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Group not registered |
//! | **Warning** | Degraded but operational | Transient loader failure |
//! | **Error** | Failure requiring attention | Invalid configuration |
//! | **Critical** | System integrity at risk | Loader panicked mid-flight |

use std::fmt;
use std::time::Duration;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Common error variants that appear across multiple crates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Configuration-related errors
    Config {
        /// Offending configuration field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Serialization or deserialization errors
    Serialization {
        /// Data format being read, such as `TOML`.
        format: String,
        /// Parser message.
        message: String,
    },

    /// Resource not found errors
    NotFound {
        /// Kind of resource looked up.
        resource_type: String,
        /// Name or id that was requested.
        identifier: String,
    },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { field, message } => {
                write!(f, "Configuration error in field '{}': {}", field, message)
            }
            Self::Serialization { format, message } => {
                write!(f, "Serialization error ({}): {}", format, message)
            }
            Self::NotFound { resource_type, identifier } => {
                write!(f, "{} not found: '{}'", resource_type, identifier)
            }
        }
    }
}

impl std::error::Error for CommonError {}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config { .. } => ErrorSeverity::Error,
            Self::Serialization { .. } => ErrorSeverity::Error,
            Self::NotFound { .. } => ErrorSeverity::Info,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl CommonError {
    /// Create a configuration error for a specific field
    pub fn config_field<S: Into<String>, F: Into<String>>(field: F, message: S) -> Self {
        Self::Config { field: field.into(), message: message.into() }
    }

    /// Create a serialization error with format information
    pub fn serialization_format<S: Into<String>, F: Into<String>>(format: F, message: S) -> Self {
        Self::Serialization { format: format.into(), message: message.into() }
    }

    /// Create a not found error with identifier
    pub fn not_found_with_id<T: Into<String>, I: Into<String>>(
        resource_type: T,
        identifier: I,
    ) -> Self {
        Self::NotFound { resource_type: resource_type.into(), identifier: identifier.into() }
    }
}

/// Standard interface for classifying errors
///
/// Implemented by every error type in the workspace so callers can make
/// uniform retry and alerting decisions.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again, such as a loader hitting a flaky backend.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl From<toml::de::Error> for CommonError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization_format("TOML", err.to_string())
    }
}
