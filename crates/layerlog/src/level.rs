//! Severity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing_subscriber::filter::LevelFilter;

use crate::error::LogError;

/// Logging severity, ordered least to most severe.
///
/// The integer discriminants are the public wire values: a logger configured
/// with threshold `T` emits a call of severity `S` when `S >= T`.
/// [`Level::Disabled`] sits below everything and suppresses all output except
/// the error channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i8)]
pub enum Level {
    /// Suppress everything except errors.
    Disabled = -1,
    /// Verbose diagnostics.
    Debug = 0,
    /// Normal operational messages (default).
    #[default]
    Info = 1,
    /// Something unexpected but recoverable.
    Warn = 2,
    /// Failures. Never filtered.
    Error = 3,
}

impl Level {
    /// All levels in ascending order.
    pub const ALL: [Self; 5] = [
        Self::Disabled,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
    ];

    /// Map an integer to a level, or `None` if it is outside `-1..=3`.
    #[must_use]
    pub fn from_i32(level: i32) -> Option<Self> {
        match level {
            -1 => Some(Self::Disabled),
            0 => Some(Self::Debug),
            1 => Some(Self::Info),
            2 => Some(Self::Warn),
            3 => Some(Self::Error),
            _ => None,
        }
    }

    /// Map an integer to a level, substituting [`Level::Info`] when it is out
    /// of range.
    #[must_use]
    pub fn coerce(level: i32) -> Self {
        Self::from_i32(level).unwrap_or(Self::Info)
    }

    /// Integer value of this level.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        i32::from(self as i8)
    }

    /// Lowercase name, as written into records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Equivalent `tracing` filter. `Disabled` maps to [`LevelFilter::OFF`].
    #[must_use]
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Disabled => LevelFilter::OFF,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
        }
    }

    /// Equivalent `tracing` level, if this is an emitting severity.
    #[must_use]
    pub fn to_tracing(self) -> Option<tracing::Level> {
        match self {
            Self::Disabled => None,
            Self::Debug => Some(tracing::Level::DEBUG),
            Self::Info => Some(tracing::Level::INFO),
            Self::Warn => Some(tracing::Level::WARN),
            Self::Error => Some(tracing::Level::ERROR),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for Level {
    type Error = LogError;

    fn try_from(level: i32) -> Result<Self, LogError> {
        Self::from_i32(level).ok_or(LogError::InvalidLevel(level))
    }
}

impl FromStr for Level {
    type Err = LogError;

    /// Parse a level name (case-insensitive) or its integer value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "disabled" | "off" => Ok(Self::Disabled),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => match other.parse::<i32>() {
                Ok(n) => Self::try_from(n),
                Err(_) => Err(LogError::UnknownLevel(trimmed.to_string())),
            },
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Number(i64),
    Name(String),
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match LevelRepr::deserialize(deserializer)? {
            LevelRepr::Number(n) => i32::try_from(n)
                .ok()
                .and_then(Self::from_i32)
                .ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid log level: {n} (expected -1..=3)"))
                }),
            LevelRepr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}
