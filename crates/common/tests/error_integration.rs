//! Integration tests for `distcache_common::error`.
//!
//! These suites validate classification and module error delegation so
//! callers receive consistent failure semantics.

#![cfg(feature = "foundation")]

use std::time::Duration;

use distcache_common::error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
use thiserror::Error;

/// Validates that `CommonError` classification surfaces the expected
/// retryable, severity, and criticality combinations for each variant.
///
/// Assertions:
/// - Confirms `err.is_retryable()` equals `retryable`.
/// - Confirms `err.severity()` equals `severity`.
/// - Confirms `err.is_critical()` equals `critical`.
#[test]
fn classification_matrix_matches_expected_contract() {
    let cases = vec![
        (CommonError::config_field("strategy", "empty"), false, ErrorSeverity::Error, false),
        (CommonError::serialization_format("TOML", "bad"), false, ErrorSeverity::Error, false),
        (CommonError::not_found_with_id("group", "users"), false, ErrorSeverity::Info, false),
    ];

    for (err, retryable, severity, critical) in cases {
        assert_eq!(err.is_retryable(), retryable, "{err}");
        assert_eq!(err.severity(), severity, "{err}");
        assert_eq!(err.is_critical(), critical, "{err}");
        assert_eq!(err.retry_after(), None);
    }
}

#[derive(Debug, Error)]
enum LookupError {
    #[error("backend busy")]
    Busy,

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl ErrorClassification for LookupError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Busy => true,
            Self::Common(err) => err.is_retryable(),
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Busy => ErrorSeverity::Warning,
            Self::Common(err) => err.severity(),
        }
    }

    fn is_critical(&self) -> bool {
        match self {
            Self::Busy => false,
            Self::Common(err) => err.is_critical(),
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Busy => Some(Duration::from_millis(50)),
            Self::Common(err) => err.retry_after(),
        }
    }
}

fn lookup(name: &str) -> CommonResult<u32> {
    match name {
        "known" => Ok(7),
        other => Err(CommonError::not_found_with_id("group", other)),
    }
}

fn lookup_module(name: &str) -> Result<u32, LookupError> {
    if name == "busy" {
        return Err(LookupError::Busy);
    }
    Ok(lookup(name)?)
}

/// Validates that module errors composing `CommonError` delegate
/// classification and display.
///
/// Assertions:
/// - Confirms `?` converts `CommonError` into the module error.
/// - Confirms the module's own variant keeps its retry hint.
#[test]
fn module_error_delegates_to_common() {
    assert_eq!(lookup_module("known").ok(), Some(7));

    let err = lookup_module("absent").unwrap_err();
    assert_eq!(err.to_string(), "group not found: 'absent'");
    assert_eq!(err.severity(), ErrorSeverity::Info);
    assert!(!err.is_retryable());

    let err = lookup_module("busy").unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.retry_after(), Some(Duration::from_millis(50)));
}
