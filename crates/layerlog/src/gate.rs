//! Severity gate.
//!
//! Decides, per output sink, whether a call of a given severity is eligible
//! to be written. The gate is a plain value; a [`Logger`](crate::Logger)
//! stores one behind a lock and swaps it wholesale on level updates, so the
//! recorded level and both sink thresholds always change together.

use crate::level::Level;

/// The two output channels of a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// Debug, info and warn records.
    Normal,
    /// Error records.
    Error,
}

impl SinkKind {
    /// Channel a record of `severity` is routed to.
    #[must_use]
    pub fn for_severity(severity: Level) -> Self {
        if severity == Level::Error {
            Self::Error
        } else {
            Self::Normal
        }
    }
}

/// Threshold state of one logger instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityGate {
    threshold: Level,
}

impl SeverityGate {
    /// Gate with the given threshold.
    #[must_use]
    pub fn new(threshold: Level) -> Self {
        Self { threshold }
    }

    /// The configured minimum severity.
    #[must_use]
    pub fn threshold(&self) -> Level {
        self.threshold
    }

    /// Whether a call at `severity` may be written to `sink`.
    ///
    /// The error sink is never filtered. The normal sink admits `severity`
    /// when it is at or above the threshold, and nothing at all when the
    /// threshold is [`Level::Disabled`].
    #[must_use]
    pub fn permits(&self, sink: SinkKind, severity: Level) -> bool {
        match sink {
            SinkKind::Error => true,
            SinkKind::Normal => {
                self.threshold != Level::Disabled
                    && severity != Level::Disabled
                    && severity >= self.threshold
            },
        }
    }
}

impl Default for SeverityGate {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}
