//! Record writers.
//!
//! A [`RecordWriter`] is the structured-output backend a logger hands its
//! composed records to. Writers never fail observably: I/O and serialization
//! problems are reported through `tracing` and the record is dropped.
//!
//! Provided writers:
//! - [`JsonWriter`]: one JSON object per line (production).
//! - [`ConsoleWriter`]: human-readable single-line output (development).
//! - [`TracingWriter`]: forwards records as `tracing` events.
//! - [`MemoryWriter`]: keeps records in memory (tests, inspection).
//!
//! The byte-level writers are generic over [`MakeWriter`], so anything that
//! works as a `tracing-subscriber` output (stdout, stderr, a shared buffer)
//! works here too.

use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::{Mutex, PoisonError};

use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use tracing::warn;
use tracing_subscriber::fmt::MakeWriter;

use crate::level::Level;
use crate::record::{ERROR_KEY, Record};
use crate::value::FieldValue;

/// Destination for composed records.
pub trait RecordWriter: Send + Sync {
    /// Write one record.
    fn write_record(&self, record: &Record);
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn write_line<M>(make_writer: &M, line: &[u8])
where
    M: for<'a> MakeWriter<'a>,
{
    let mut writer = make_writer.make_writer();
    if let Err(e) = writer.write_all(line) {
        warn!(error = %e, "failed to write log record");
    }
}

/// Writes each record as a single-line JSON object.
///
/// Key order is `level`, composed fields, `error`, `time`, `message`.
#[derive(Debug, Clone)]
pub struct JsonWriter<M> {
    make_writer: M,
    timestamps: bool,
}

impl<M> JsonWriter<M>
where
    M: for<'a> MakeWriter<'a> + Send + Sync,
{
    /// Create a JSON writer that stamps a `time` field on every record.
    #[must_use]
    pub fn new(make_writer: M) -> Self {
        Self {
            make_writer,
            timestamps: true,
        }
    }

    /// Omit the `time` field.
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }
}

impl<M> RecordWriter for JsonWriter<M>
where
    M: for<'a> MakeWriter<'a> + Send + Sync,
{
    fn write_record(&self, record: &Record) {
        let time = self.timestamps.then(timestamp);
        let map = record.to_json_map(time.as_deref());
        let mut line = match serde_json::to_vec(&map) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to serialize log record");
                return;
            },
        };
        line.push(b'\n');
        write_line(&self.make_writer, &line);
    }
}

/// Writes records as `TIME LVL message key=value ... error=...` lines.
#[derive(Debug, Clone)]
pub struct ConsoleWriter<M> {
    make_writer: M,
    timestamps: bool,
    ansi: bool,
}

impl<M> ConsoleWriter<M>
where
    M: for<'a> MakeWriter<'a> + Send + Sync,
{
    /// Create a console writer with timestamps and colours.
    #[must_use]
    pub fn new(make_writer: M) -> Self {
        Self {
            make_writer,
            timestamps: true,
            ansi: true,
        }
    }

    /// Omit the leading timestamp.
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    /// Disable ANSI colours.
    #[must_use]
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    fn level_tag(&self, level: Level) -> String {
        let tag = match level {
            Level::Disabled => "???",
            Level::Debug => "DBG",
            Level::Info => "INF",
            Level::Warn => "WRN",
            Level::Error => "ERR",
        };
        if !self.ansi {
            return tag.to_string();
        }
        match level {
            Level::Disabled => tag.to_string(),
            Level::Debug => tag.bright_black().to_string(),
            Level::Info => tag.green().to_string(),
            Level::Warn => tag.yellow().to_string(),
            Level::Error => tag.red().bold().to_string(),
        }
    }

    fn key(&self, key: &str) -> String {
        if self.ansi {
            format!("{key}=").cyan().to_string()
        } else {
            format!("{key}=")
        }
    }

    fn render(&self, record: &Record) -> String {
        let mut line = String::new();
        if self.timestamps {
            let _ = write!(line, "{} ", timestamp());
        }
        line.push_str(&self.level_tag(record.level));
        if !record.message.is_empty() {
            line.push(' ');
            line.push_str(&record.message);
        }
        for (key, value) in &record.fields {
            let _ = write!(line, " {}{}", self.key(key), console_value(value));
        }
        if let Some(err) = &record.error {
            let rendered = console_value(&FieldValue::from(err.as_str()));
            if self.ansi {
                let _ = write!(line, " {}{}", self.key(ERROR_KEY), rendered.red());
            } else {
                let _ = write!(line, " {}{}", self.key(ERROR_KEY), rendered);
            }
        }
        line.push('\n');
        line
    }
}

fn console_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Str(s) | FieldValue::Other(s) if s.is_empty() || s.contains(char::is_whitespace) => {
            format!("{s:?}")
        },
        other => other.key_string().into_owned(),
    }
}

impl<M> RecordWriter for ConsoleWriter<M>
where
    M: for<'a> MakeWriter<'a> + Send + Sync,
{
    fn write_record(&self, record: &Record) {
        write_line(&self.make_writer, self.render(record).as_bytes());
    }
}

/// Forwards records into the `tracing` pipeline under the `layerlog` target.
///
/// Composed fields are attached as a single JSON-encoded `fields` value since
/// `tracing` field names must be known at compile time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWriter;

impl RecordWriter for TracingWriter {
    fn write_record(&self, record: &Record) {
        let fields = serde_json::Value::Object(
            record
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        );
        let error = record.error.as_deref();
        let message = record.message.as_str();
        match record.level {
            Level::Disabled => {},
            Level::Debug => {
                tracing::debug!(target: "layerlog", fields = %fields, error, "{message}");
            },
            Level::Info => {
                tracing::info!(target: "layerlog", fields = %fields, error, "{message}");
            },
            Level::Warn => {
                tracing::warn!(target: "layerlog", fields = %fields, error, "{message}");
            },
            Level::Error => {
                tracing::error!(target: "layerlog", fields = %fields, error, "{message}");
            },
        }
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    records: Mutex<Vec<Record>>,
}

impl MemoryWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records written so far.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent record.
    #[must_use]
    pub fn last(&self) -> Option<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Number of records written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all recorded entries.
    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl RecordWriter for MemoryWriter {
    fn write_record(&self, record: &Record) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }
}
