//! Test fixtures for common values.

use layerlog::{FieldValue, fields};
use thiserror::Error;

/// Error type for exercising the error sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TestError {
    /// A generic failure with a message.
    #[error("test failure: {0}")]
    Failure(String),
    /// A dependency timed out.
    #[error("upstream timed out after {0}ms")]
    Timeout(u64),
}

/// Create a [`TestError::Failure`].
#[must_use]
pub fn test_error(message: impl Into<String>) -> TestError {
    TestError::Failure(message.into())
}

/// Static fields describing a typical service deployment.
#[must_use]
pub fn test_static_fields() -> Vec<FieldValue> {
    fields!["service", "checkout", "region", "eu-west-1", "version", "1.4.2"]
}

/// Dynamic fields describing a typical request.
#[must_use]
pub fn test_request_fields() -> Vec<FieldValue> {
    fields!["request_id", "r-42", "user", "ada"]
}
