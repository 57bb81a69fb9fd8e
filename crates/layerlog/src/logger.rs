//! Logger instances.
//!
//! A [`Logger`] is a cheaply clonable handle. Clones refer to the same
//! logical instance: a level update or a dynamic-field change made through one
//! clone is seen by all of them. Use [`Logger::fork`] to get an independent
//! instance.
//!
//! # Call path
//!
//! ```text
//! info("msg", fields)
//!     → SeverityGate::permits      (dropped here when below threshold)
//!     → compose(name, message, dynamic, static)
//!     → RecordWriter::write_record (normal sink)
//!
//! error(err, "msg", fields)
//!     → compose(...) + error        (never gated)
//!     → RecordWriter::write_record (error sink)
//! ```

use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::warn;

use crate::compose::compose;
use crate::config::{LogFormat, LogTarget};
use crate::error::{LogError, LogResult};
use crate::fields;
use crate::gate::{SeverityGate, SinkKind};
use crate::global::GlobalConfig;
use crate::level::Level;
use crate::record::Record;
use crate::value::FieldValue;
use crate::writer::RecordWriter;

static DEFAULT_LOGGER: LazyLock<RwLock<Logger>> = LazyLock::new(|| {
    RwLock::new(
        LoggerBuilder::new(Level::Debug.as_i32())
            .name("logger")
            .build(),
    )
});

/// The package default logger.
///
/// Created on first use with level [`Level::Debug`]. Replaced by
/// [`set_default`], [`Logger::set_as_default`], or by the first logger whose
/// construction finalizes the process-global configuration.
#[must_use]
pub fn default_logger() -> Logger {
    DEFAULT_LOGGER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replace the package default logger.
pub fn set_default(logger: Logger) {
    *DEFAULT_LOGGER
        .write()
        .unwrap_or_else(PoisonError::into_inner) = logger;
}

/// Build a JSON logger writing to stdout (normal) and stderr (errors).
///
/// `level` outside `-1..=3` becomes [`Level::Info`]. When `static_fields`
/// holds at least one complete pair and the process-global configuration is
/// still open, `name` and `static_fields` finalize it and the new logger
/// becomes the package default. Otherwise `name` and `static_fields` are
/// ignored.
#[must_use]
pub fn new_logger(level: i32, name: &str, static_fields: &[FieldValue]) -> Logger {
    LoggerBuilder::new(level)
        .name(name)
        .static_fields(static_fields)
        .build()
}

/// Same as [`new_logger`] but writes human-readable console lines.
///
/// Not intended for production.
#[must_use]
pub fn new_dev_logger(level: i32, name: &str, static_fields: &[FieldValue]) -> Logger {
    LoggerBuilder::new(level)
        .name(name)
        .static_fields(static_fields)
        .format(LogFormat::Pretty)
        .build()
}

/// Builder for [`Logger`].
#[must_use]
pub struct LoggerBuilder {
    level: i32,
    name: String,
    static_fields: Vec<FieldValue>,
    format: LogFormat,
    normal_target: LogTarget,
    error_target: LogTarget,
    timestamps: bool,
    ansi: bool,
    normal: Option<Arc<dyn RecordWriter>>,
    error: Option<Arc<dyn RecordWriter>>,
    config: Option<Arc<GlobalConfig>>,
}

impl LoggerBuilder {
    /// Start a builder with the given raw level.
    pub fn new(level: i32) -> Self {
        Self {
            level,
            name: String::new(),
            static_fields: Vec::new(),
            format: LogFormat::default(),
            normal_target: LogTarget::Stdout,
            error_target: LogTarget::Stderr,
            timestamps: true,
            ansi: true,
            normal: None,
            error: None,
            config: None,
        }
    }

    /// Name stored in the static configuration if this build finalizes it.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Static fields stored if this build finalizes the configuration.
    pub fn static_fields(mut self, fields: &[FieldValue]) -> Self {
        self.static_fields = fields.to_vec();
        self
    }

    /// Output format for the default writers.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Destinations for the default writers.
    pub fn targets(mut self, normal: LogTarget, error: LogTarget) -> Self {
        self.normal_target = normal;
        self.error_target = error;
        self
    }

    /// Omit timestamps from the default writers.
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    /// Disable ANSI colours in the default writers.
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    /// Use `writer` for debug/info/warn records.
    pub fn normal_writer(mut self, writer: Arc<dyn RecordWriter>) -> Self {
        self.normal = Some(writer);
        self
    }

    /// Use `writer` for error records.
    pub fn error_writer(mut self, writer: Arc<dyn RecordWriter>) -> Self {
        self.error = Some(writer);
        self
    }

    /// Build against `config` instead of the process-global configuration.
    pub fn config(mut self, config: Arc<GlobalConfig>) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the logger, finalizing the static configuration if this is the
    /// first qualifying construction.
    #[must_use]
    pub fn build(self) -> Logger {
        let level = Level::coerce(self.level);
        let config = self
            .config
            .unwrap_or_else(|| Arc::clone(GlobalConfig::global()));
        let normal = self.normal.unwrap_or_else(|| {
            self.format
                .writer(self.normal_target, self.timestamps, self.ansi)
        });
        let error = self.error.unwrap_or_else(|| {
            self.format
                .writer(self.error_target, self.timestamps, self.ansi)
        });

        let logger = Logger {
            inner: Arc::new(LoggerInner {
                gate: RwLock::new(SeverityGate::new(level)),
                dynamic: RwLock::new(Vec::new()),
                normal,
                error,
                config: Arc::clone(&config),
            }),
        };

        if self.static_fields.len() > 1
            && !config.is_configured()
            && config.initialize_once(&self.name, level, &self.static_fields)
            && Arc::ptr_eq(&config, GlobalConfig::global())
        {
            set_default(logger.clone());
        }

        logger
    }
}

struct LoggerInner {
    gate: RwLock<SeverityGate>,
    dynamic: RwLock<Vec<FieldValue>>,
    normal: Arc<dyn RecordWriter>,
    error: Arc<dyn RecordWriter>,
    config: Arc<GlobalConfig>,
}

/// Leveled structured logger.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// Start a [`LoggerBuilder`].
    pub fn builder(level: i32) -> LoggerBuilder {
        LoggerBuilder::new(level)
    }

    /// Current threshold.
    #[must_use]
    pub fn level(&self) -> Level {
        self.gate().threshold()
    }

    /// Whether a call at `severity` would currently be written.
    #[must_use]
    pub fn enabled(&self, severity: Level) -> bool {
        self.gate()
            .permits(SinkKind::for_severity(severity), severity)
    }

    /// The static configuration this logger reads from.
    #[must_use]
    pub fn config(&self) -> &Arc<GlobalConfig> {
        &self.inner.config
    }

    /// Whether both handles refer to the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Log at debug severity.
    pub fn debug(&self, message: &str, fields: &[FieldValue]) {
        self.log(Level::Debug, message, fields);
    }

    /// Log at info severity.
    pub fn info(&self, message: &str, fields: &[FieldValue]) {
        self.log(Level::Info, message, fields);
    }

    /// Log at warn severity.
    pub fn warn(&self, message: &str, fields: &[FieldValue]) {
        self.log(Level::Warn, message, fields);
    }

    /// Log `err` to the error sink. Never filtered by level.
    pub fn error<E>(&self, err: &E, message: &str, fields: &[FieldValue])
    where
        E: std::error::Error + ?Sized,
    {
        let record = self.record(Level::Error, message, fields, Some(err.to_string()));
        self.inner.error.write_record(&record);
    }

    /// Debug with an argument list: `[message, key, value, ...]`.
    ///
    /// An empty list is a no-op. The message is the first argument rendered
    /// with the key stringification rule.
    pub fn debug_args(&self, args: &[FieldValue]) {
        self.log_args(Level::Debug, args);
    }

    /// Info with an argument list. See [`Logger::debug_args`].
    pub fn info_args(&self, args: &[FieldValue]) {
        self.log_args(Level::Info, args);
    }

    /// Warn with an argument list. See [`Logger::debug_args`].
    pub fn warn_args(&self, args: &[FieldValue]) {
        self.log_args(Level::Warn, args);
    }

    /// Error with an optional argument list. An empty list still writes the
    /// error with an empty message.
    pub fn error_args<E>(&self, err: &E, args: &[FieldValue])
    where
        E: std::error::Error + ?Sized,
    {
        match args.split_first() {
            Some((message, fields)) => self.error(err, &message.key_string(), fields),
            None => self.error(err, "", &[]),
        }
    }

    /// Replace the dynamic fields of this instance.
    pub fn set_dyna(&self, fields: &[FieldValue]) {
        *self.dynamic_mut() = fields.to_vec();
    }

    /// Append one dynamic pair.
    pub fn add_dyna(&self, key: impl Into<FieldValue>, value: impl Into<FieldValue>) {
        let mut dynamic = self.dynamic_mut();
        dynamic.push(key.into());
        dynamic.push(value.into());
    }

    /// Remove all dynamic fields.
    pub fn reset_dyna(&self) {
        self.dynamic_mut().clear();
    }

    /// Snapshot of the dynamic field list.
    #[must_use]
    pub fn dyna(&self) -> Vec<FieldValue> {
        self.inner
            .dynamic
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Change the threshold of this instance.
    ///
    /// The gate for both sinks is swapped in one step. An info record
    /// describing the change is then written if the replaced gate admitted
    /// info. Returns the previous level.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidLevel`] and leaves the instance untouched
    /// when `level` is outside `-1..=3`.
    pub fn update_log_level(&self, level: i32) -> LogResult<Level> {
        let Some(next) = Level::from_i32(level) else {
            warn!(level, "rejected out-of-range log level update");
            return Err(LogError::InvalidLevel(level));
        };

        let previous = {
            let mut gate = self
                .inner
                .gate
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *gate, SeverityGate::new(next))
        };

        if previous.permits(SinkKind::Normal, Level::Info) {
            let record = self.record(
                Level::Info,
                "log level updated",
                &fields!["previous_level", previous.threshold(), "log_level", next],
                None,
            );
            self.inner.normal.write_record(&record);
        }
        Ok(previous.threshold())
    }

    /// A new, independent instance with the same sinks, configuration, level
    /// and a copy of the current dynamic fields.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                gate: RwLock::new(*self.gate()),
                dynamic: RwLock::new(self.dyna()),
                normal: Arc::clone(&self.inner.normal),
                error: Arc::clone(&self.inner.error),
                config: Arc::clone(&self.inner.config),
            }),
        }
    }

    /// Make this logger the package default and return it.
    ///
    /// ```rust,no_run
    /// let logger = layerlog::new_logger(0, "svc", &[]).set_as_default();
    /// logger.info("ready", &[]);
    /// ```
    pub fn set_as_default(self) -> Self {
        set_default(self.clone());
        self
    }

    fn gate(&self) -> std::sync::RwLockReadGuard<'_, SeverityGate> {
        self.inner
            .gate
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn dynamic_mut(&self) -> std::sync::RwLockWriteGuard<'_, Vec<FieldValue>> {
        self.inner
            .dynamic
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn log_args(&self, severity: Level, args: &[FieldValue]) {
        if let Some((message, fields)) = args.split_first() {
            self.log(severity, &message.key_string(), fields);
        }
    }

    fn log(&self, severity: Level, message: &str, fields: &[FieldValue]) {
        if !self.gate().permits(SinkKind::Normal, severity) {
            return;
        }
        let record = self.record(severity, message, fields, None);
        self.inner.normal.write_record(&record);
    }

    fn record(
        &self,
        severity: Level,
        message: &str,
        fields: &[FieldValue],
        error: Option<String>,
    ) -> Record {
        let config = &self.inner.config;
        let composed = {
            let dynamic = self
                .inner
                .dynamic
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            compose(config.name(), fields, &dynamic, config.static_fields())
        };
        Record {
            level: severity,
            fields: composed,
            error,
            message: message.to_string(),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("name", &self.inner.config.name())
            .field("dynamic", &self.dyna())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::writer::MemoryWriter;

    struct Harness {
        config: Arc<GlobalConfig>,
        normal: Arc<MemoryWriter>,
        error: Arc<MemoryWriter>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                config: Arc::new(GlobalConfig::new()),
                normal: Arc::new(MemoryWriter::new()),
                error: Arc::new(MemoryWriter::new()),
            }
        }

        fn logger(&self, level: i32, name: &str, statics: &[FieldValue]) -> Logger {
            Logger::builder(level)
                .name(name)
                .static_fields(statics)
                .config(Arc::clone(&self.config))
                .normal_writer(self.normal.clone())
                .error_writer(self.error.clone())
                .build()
        }
    }

    fn boom() -> io::Error {
        io::Error::other("boom")
    }

    #[test]
    fn test_out_of_range_construction_level_is_info() {
        let h = Harness::new();
        assert_eq!(h.logger(17, "", &[]).level(), Level::Info);
        assert_eq!(h.logger(-5, "", &[]).level(), Level::Info);
        assert_eq!(h.logger(-1, "", &[]).level(), Level::Disabled);
    }

    #[test]
    fn test_gating_by_severity() {
        let h = Harness::new();
        let logger = h.logger(Level::Warn.as_i32(), "svc", &[]);

        logger.debug("d", &[]);
        logger.info("i", &[]);
        assert!(h.normal.is_empty());

        logger.warn("w", &[]);
        assert_eq!(h.normal.len(), 1);
        assert_eq!(h.normal.last().unwrap().level, Level::Warn);

        logger.error(&boom(), "e", &[]);
        assert_eq!(h.error.len(), 1);
        assert_eq!(h.normal.len(), 1);
    }

    #[test]
    fn test_error_bypasses_disabled() {
        let h = Harness::new();
        let logger = h.logger(Level::Disabled.as_i32(), "", &[]);

        logger.warn("w", &[]);
        logger.error(&boom(), "failed", &fields!["attempt", 2]);

        assert!(h.normal.is_empty());
        let records = h.error.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].error.as_deref(), Some("boom"));
        assert_eq!(records[0].message, "failed");
        assert_eq!(records[0].field("attempt"), Some(&FieldValue::Int(2)));
    }

    #[test]
    fn test_args_forms() {
        let h = Harness::new();
        let logger = h.logger(Level::Debug.as_i32(), "", &[]);

        logger.info_args(&[]);
        assert!(h.normal.is_empty());

        logger.info_args(&fields!["hello", "x", 1]);
        let record = h.normal.last().unwrap();
        assert_eq!(record.message, "hello");
        assert_eq!(record.field("x"), Some(&FieldValue::Int(1)));

        logger.debug_args(&fields![404]);
        assert_eq!(h.normal.last().unwrap().message, "404");

        logger.error_args(&boom(), &[]);
        let record = h.error.last().unwrap();
        assert_eq!(record.message, "");
        assert_eq!(record.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_dynamic_fields_lifecycle() {
        let h = Harness::new();
        let logger = h.logger(Level::Debug.as_i32(), "svc", &fields!["rev", "123"]);

        logger.set_dyna(&fields!["request", "r-1"]);
        logger.add_dyna("user", "ada");
        assert_eq!(logger.dyna(), fields!["request", "r-1", "user", "ada"]);

        logger.info("with dyna", &[]);
        let record = h.normal.last().unwrap();
        assert_eq!(record.field("request"), Some(&FieldValue::from("r-1")));
        assert_eq!(record.field("user"), Some(&FieldValue::from("ada")));

        logger.reset_dyna();
        logger.info("without dyna", &[]);
        let record = h.normal.last().unwrap();
        assert!(record.field("request").is_none());
        assert!(record.field("user").is_none());
        assert_eq!(record.field("rev"), Some(&FieldValue::from("123")));
        assert_eq!(record.field("name"), Some(&FieldValue::from("svc")));
    }

    #[test]
    fn test_dynamic_fields_isolated_between_instances() {
        let h = Harness::new();
        let first = h.logger(Level::Debug.as_i32(), "svc", &fields!["rev", "1"]);
        let second = h.logger(Level::Debug.as_i32(), "", &[]);
        let forked = first.fork();

        first.add_dyna("only", "first");
        assert!(second.dyna().is_empty());
        assert!(forked.dyna().is_empty());

        second.info("second", &[]);
        assert!(h.normal.last().unwrap().field("only").is_none());
    }

    #[test]
    fn test_clones_share_instance() {
        let h = Harness::new();
        let logger = h.logger(Level::Info.as_i32(), "", &[]);
        let clone = logger.clone();

        clone.add_dyna("shared", true);
        assert_eq!(logger.dyna(), fields!["shared", true]);
        assert!(logger.ptr_eq(&clone));
        assert!(!logger.ptr_eq(&logger.fork()));
    }

    #[test]
    fn test_update_log_level_visible_to_clones() {
        let h = Harness::new();
        let logger = h.logger(Level::Error.as_i32(), "", &[]);
        let clone = logger.clone();

        let previous = clone.update_log_level(Level::Debug.as_i32()).unwrap();
        assert_eq!(previous, Level::Error);
        assert_eq!(logger.level(), Level::Debug);

        logger.debug("now visible", &[]);
        assert_eq!(h.normal.last().unwrap().message, "now visible");
    }

    #[test]
    fn test_update_log_level_audit_uses_previous_threshold() {
        let h = Harness::new();

        let quiet = h.logger(Level::Error.as_i32(), "", &[]);
        quiet.update_log_level(Level::Debug.as_i32()).unwrap();
        assert!(h.normal.is_empty());

        let chatty = h.logger(Level::Info.as_i32(), "", &[]);
        chatty.update_log_level(Level::Error.as_i32()).unwrap();
        let records = h.normal.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::Info);
        assert_eq!(records[0].message, "log level updated");
        assert_eq!(records[0].field("previous_level"), Some(&FieldValue::from("info")));
        assert_eq!(records[0].field("log_level"), Some(&FieldValue::from("error")));

        chatty.warn("suppressed", &[]);
        assert_eq!(h.normal.len(), 1);
    }

    #[test]
    fn test_concurrent_updates_audit_matches_returned_level() {
        let h = Harness::new();
        let logger = h.logger(Level::Debug.as_i32(), "", &[]);

        let returned: Vec<Level> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|worker| {
                    let logger = logger.clone();
                    scope.spawn(move || {
                        (0..50)
                            .map(|n| {
                                let next = if (worker + n) % 2 == 0 { Level::Warn } else { Level::Debug };
                                logger.update_log_level(next.as_i32()).unwrap()
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            workers
                .into_iter()
                .flat_map(|worker| worker.join().unwrap())
                .collect()
        });

        let audited: Vec<FieldValue> = h
            .normal
            .records()
            .iter()
            .filter_map(|record| record.field("previous_level").cloned())
            .collect();
        let admitted = returned.iter().filter(|level| **level == Level::Debug).count();
        assert_eq!(audited.len(), admitted);
        assert!(audited.iter().all(|level| *level == FieldValue::from("debug")));
    }

    #[test]
    fn test_update_log_level_rejects_out_of_range() {
        let h = Harness::new();
        let logger = h.logger(Level::Info.as_i32(), "", &[]);

        assert!(matches!(
            logger.update_log_level(9),
            Err(LogError::InvalidLevel(9))
        ));
        assert_eq!(logger.level(), Level::Info);
        assert!(h.normal.is_empty());
    }

    #[test]
    fn test_builder_with_injected_config_finalizes_once() {
        let h = Harness::new();
        let _first = h.logger(Level::Info.as_i32(), "svc", &fields!["rev", "123"]);
        let second = h.logger(Level::Info.as_i32(), "other", &fields!["rev", "999"]);

        assert_eq!(h.config.name(), "svc");
        second.info("hello", &[]);
        let record = h.normal.last().unwrap();
        assert_eq!(record.field("rev"), Some(&FieldValue::from("123")));
        assert_eq!(record.field("name"), Some(&FieldValue::from("svc")));
    }

    #[test]
    fn test_single_static_argument_does_not_configure() {
        let h = Harness::new();
        let _logger = h.logger(Level::Info.as_i32(), "svc", &fields!["lonely"]);
        assert!(!h.config.is_configured());
    }

    #[test]
    fn test_concurrent_logging_through_shared_handle() {
        let h = Harness::new();
        let logger = h.logger(Level::Debug.as_i32(), "", &[]);

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let logger = logger.clone();
                scope.spawn(move || {
                    for n in 0..25 {
                        logger.info("tick", &fields!["worker", worker, "n", n]);
                    }
                });
            }
        });

        assert_eq!(h.normal.len(), 200);
    }
}
