//! Logger configuration.
//!
//! [`LogConfig`] describes a logger declaratively and can be loaded from TOML
//! and overridden from the environment:
//!
//! ```toml
//! level = "info"          # or -1..=3
//! name = "billing"
//! format = "json"         # json | pretty | tracing
//! normal_target = "stdout"
//! error_target = "stderr"
//! timestamps = true
//! ansi = false
//!
//! [static_fields]
//! revision = "4f2a9c1"
//! region = "eu-west-1"
//! ```
//!
//! Environment overrides: `LAYERLOG_LEVEL`, `LAYERLOG_NAME`, `LAYERLOG_FORMAT`.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::{LogError, LogResult};
use crate::global::GlobalConfig;
use crate::level::Level;
use crate::logger::{Logger, LoggerBuilder};
use crate::value::FieldValue;
use crate::writer::{ConsoleWriter, JsonWriter, RecordWriter, TracingWriter};

/// Environment variable overriding the level.
pub const ENV_LEVEL: &str = "LAYERLOG_LEVEL";
/// Environment variable overriding the name.
pub const ENV_NAME: &str = "LAYERLOG_NAME";
/// Environment variable overriding the format.
pub const ENV_FORMAT: &str = "LAYERLOG_FORMAT";

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line (default).
    #[default]
    Json,
    /// Human-readable console lines, for development.
    Pretty,
    /// Forward records into the `tracing` pipeline.
    Tracing,
}

impl LogFormat {
    /// Build the writer for this format and destination.
    #[must_use]
    pub fn writer(self, target: LogTarget, timestamps: bool, ansi: bool) -> Arc<dyn RecordWriter> {
        match (self, target) {
            (Self::Json, LogTarget::Stdout) => json_writer(std::io::stdout, timestamps),
            (Self::Json, LogTarget::Stderr) => json_writer(std::io::stderr, timestamps),
            (Self::Pretty, LogTarget::Stdout) => {
                console_writer(std::io::stdout, timestamps, ansi)
            },
            (Self::Pretty, LogTarget::Stderr) => {
                console_writer(std::io::stderr, timestamps, ansi)
            },
            (Self::Tracing, _) => Arc::new(TracingWriter),
        }
    }
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "console" | "dev" => Ok(Self::Pretty),
            "tracing" => Ok(Self::Tracing),
            other => Err(LogError::ConfigError(format!("unknown log format: {other}"))),
        }
    }
}

fn json_writer<M>(make_writer: M, timestamps: bool) -> Arc<dyn RecordWriter>
where
    M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let writer = JsonWriter::new(make_writer);
    if timestamps {
        Arc::new(writer)
    } else {
        Arc::new(writer.without_timestamps())
    }
}

fn console_writer<M>(make_writer: M, timestamps: bool, ansi: bool) -> Arc<dyn RecordWriter>
where
    M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let mut writer = ConsoleWriter::new(make_writer);
    if !timestamps {
        writer = writer.without_timestamps();
    }
    if !ansi {
        writer = writer.without_ansi();
    }
    Arc::new(writer)
}

/// Log output target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Log to stdout.
    Stdout,
    /// Log to stderr.
    #[default]
    Stderr,
}

fn default_normal_target() -> LogTarget {
    LogTarget::Stdout
}

fn default_true() -> bool {
    true
}

/// Declarative logger configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum severity written to the normal sink.
    #[serde(default)]
    pub level: Level,
    /// Service name. Empty means "omit".
    #[serde(default)]
    pub name: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
    /// Destination for debug/info/warn records.
    #[serde(default = "default_normal_target")]
    pub normal_target: LogTarget,
    /// Destination for error records.
    #[serde(default)]
    pub error_target: LogTarget,
    /// Whether writers stamp a time on each record.
    #[serde(default = "default_true")]
    pub timestamps: bool,
    /// Whether the console format uses ANSI colours.
    #[serde(default = "default_true")]
    pub ansi: bool,
    /// Static fields, applied in key order.
    #[serde(default)]
    pub static_fields: BTreeMap<String, FieldValue>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::default(),
            name: String::new(),
            format: LogFormat::default(),
            normal_target: default_normal_target(),
            error_target: LogTarget::default(),
            timestamps: true,
            ansi: true,
            static_fields: BTreeMap::new(),
        }
    }
}

impl LogConfig {
    /// Create a config with the given level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Set the service name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set both output targets.
    #[must_use]
    pub fn with_targets(mut self, normal: LogTarget, error: LogTarget) -> Self {
        self.normal_target = normal;
        self.error_target = error;
        self
    }

    /// Add a static field.
    #[must_use]
    pub fn with_static_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.static_fields.insert(key.into(), value.into());
        self
    }

    /// Disable timestamps.
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    /// Disable ANSI colors.
    #[must_use]
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::ParseError`] if the text is not a valid config.
    pub fn from_toml_str(text: &str) -> LogResult<Self> {
        toml::from_str(text).map_err(|source| LogError::ParseError {
            path: "<string>".to_string(),
            source,
        })
    }

    /// Load a config from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::IoError`] if the file cannot be read and
    /// [`LogError::ParseError`] if it is malformed.
    pub fn load_file(path: impl AsRef<Path>) -> LogResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = toml::from_str(&text).map_err(|source| LogError::ParseError {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "loaded logger config");
        Ok(config)
    }

    /// Apply `LAYERLOG_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override holds an invalid level or format.
    pub fn apply_env(self) -> LogResult<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` in place of the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an override holds an invalid level or format.
    pub fn apply_env_from<F>(mut self, lookup: F) -> LogResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LEVEL) {
            self.level = level.parse()?;
        }
        if let Some(name) = lookup(ENV_NAME) {
            self.name = name;
        }
        if let Some(format) = lookup(ENV_FORMAT) {
            self.format = format.parse()?;
        }
        Ok(self)
    }

    /// Static fields as a flat `[key, value, ...]` list.
    #[must_use]
    pub fn static_field_list(&self) -> Vec<FieldValue> {
        self.static_fields
            .iter()
            .flat_map(|(k, v)| [FieldValue::from(k), v.clone()])
            .collect()
    }

    /// A [`LoggerBuilder`] preloaded from this config.
    pub fn builder(&self) -> LoggerBuilder {
        let mut builder = LoggerBuilder::new(self.level.as_i32())
            .name(self.name.clone())
            .static_fields(&self.static_field_list())
            .format(self.format)
            .targets(self.normal_target, self.error_target);
        if !self.timestamps {
            builder = builder.without_timestamps();
        }
        if !self.ansi {
            builder = builder.without_ansi();
        }
        builder
    }

    /// Build a logger against the process-global static configuration.
    #[must_use]
    pub fn build_logger(&self) -> Logger {
        self.builder().build()
    }

    /// Build a logger against an explicit static configuration.
    #[must_use]
    pub fn build_logger_in(&self, config: Arc<GlobalConfig>) -> Logger {
        self.builder().config(config).build()
    }
}
