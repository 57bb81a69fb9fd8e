//! Logger error types.

use thiserror::Error;

/// Errors that can occur while configuring or reconfiguring a logger.
///
/// Logging calls themselves never return errors; these only surface from
/// configuration loading and level updates.
#[derive(Debug, Error)]
pub enum LogError {
    /// Level outside the `-1..=3` range.
    #[error("invalid log level: {0} (expected -1..=3)")]
    InvalidLevel(i32),

    /// Level name that does not match any known level.
    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Malformed configuration file.
    #[error("failed to parse {path}: {source}")]
    ParseError {
        /// Path of the offending file.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for logger operations.
pub type LogResult<T> = Result<T, LogError>;
