//! Write-once static configuration.
//!
//! A [`GlobalConfig`] holds the service name and the static fields appended to
//! every record of every logger built against it. It is finalized by the
//! first qualifying logger construction and is immutable afterwards; there is
//! no reset.
//!
//! Loggers receive their config by injection ([`LoggerBuilder::config`]). The
//! free constructors use the process-wide instance from
//! [`GlobalConfig::global`].
//!
//! [`LoggerBuilder::config`]: crate::LoggerBuilder::config

use std::sync::{Arc, LazyLock, OnceLock};

use tracing::debug;

use crate::level::Level;
use crate::value::FieldValue;

static PROCESS_CONFIG: LazyLock<Arc<GlobalConfig>> =
    LazyLock::new(|| Arc::new(GlobalConfig::new()));

/// The values fixed by the first successful initialization.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticIdentity {
    /// Service or component name. Empty means "omit".
    pub name: String,
    /// Level of the initializing logger; the default for context fallbacks.
    pub level: Level,
    /// Flat static field list.
    pub fields: Vec<FieldValue>,
}

/// Process-wide, write-once logger configuration.
#[derive(Debug, Default)]
pub struct GlobalConfig {
    identity: OnceLock<StaticIdentity>,
}

impl GlobalConfig {
    /// Create an unconfigured instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide instance used by [`new_logger`](crate::new_logger) and
    /// friends.
    #[must_use]
    pub fn global() -> &'static Arc<Self> {
        &PROCESS_CONFIG
    }

    /// Store `name`, `level` and `static_fields` unless already configured.
    ///
    /// Returns `true` for the single call that performed the initialization.
    /// Concurrent callers block until the winner has finished, so every caller
    /// observes a configured instance once this returns.
    pub fn initialize_once(&self, name: &str, level: Level, static_fields: &[FieldValue]) -> bool {
        let mut won = false;
        self.identity.get_or_init(|| {
            won = true;
            StaticIdentity {
                name: name.to_string(),
                level,
                fields: static_fields.to_vec(),
            }
        });
        if won {
            debug!(
                name,
                static_fields = static_fields.len(),
                "static logger configuration finalized"
            );
        }
        won
    }

    /// Whether the first initialization has happened.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.identity.get().is_some()
    }

    /// The fixed identity, if configured.
    #[must_use]
    pub fn identity(&self) -> Option<&StaticIdentity> {
        self.identity.get()
    }

    /// Configured name, or `""`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.identity.get().map_or("", |id| id.name.as_str())
    }

    /// Configured level, or [`Level::Debug`] when unconfigured.
    #[must_use]
    pub fn level(&self) -> Level {
        self.identity.get().map_or(Level::Debug, |id| id.level)
    }

    /// Configured static fields, or an empty slice.
    #[must_use]
    pub fn static_fields(&self) -> &[FieldValue] {
        match self.identity.get() {
            Some(id) => &id.fields,
            None => &[],
        }
    }
}
