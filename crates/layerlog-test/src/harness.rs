//! Isolated logger harness.

use std::sync::{Arc, Once};

use layerlog::{FieldValue, GlobalConfig, Logger, MemoryWriter, Record};
use tracing_subscriber::EnvFilter;

/// Loggers built against a private [`GlobalConfig`] with in-memory sinks.
///
/// Every harness owns its own configuration, so tests using separate
/// harnesses never observe each other's static fields, even when they run in
/// parallel.
#[derive(Debug, Clone)]
pub struct TestHarness {
    /// The static configuration shared by loggers from this harness.
    pub config: Arc<GlobalConfig>,
    /// Receives debug, info and warn records.
    pub normal: Arc<MemoryWriter>,
    /// Receives error records.
    pub error: Arc<MemoryWriter>,
}

impl TestHarness {
    /// Create a harness with an unconfigured [`GlobalConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Arc::new(GlobalConfig::new()),
            normal: Arc::new(MemoryWriter::new()),
            error: Arc::new(MemoryWriter::new()),
        }
    }

    /// Build a logger the way [`layerlog::new_logger`] would, but against
    /// this harness's configuration and sinks.
    #[must_use]
    pub fn logger(&self, level: i32, name: &str, static_fields: &[FieldValue]) -> Logger {
        Logger::builder(level)
            .name(name)
            .static_fields(static_fields)
            .config(Arc::clone(&self.config))
            .normal_writer(self.normal.clone())
            .error_writer(self.error.clone())
            .build()
    }

    /// Records written to the normal sink.
    #[must_use]
    pub fn normal_records(&self) -> Vec<Record> {
        self.normal.records()
    }

    /// Records written to the error sink.
    #[must_use]
    pub fn error_records(&self) -> Vec<Record> {
        self.error.records()
    }

    /// Messages of the normal sink's records, in write order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.normal
            .records()
            .into_iter()
            .map(|record| record.message)
            .collect()
    }

    /// Forget everything written so far. The configuration is kept.
    pub fn clear(&self) {
        self.normal.clear();
        self.error.clear();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

static TRACING: Once = Once::new();

/// Install a test-friendly `tracing` subscriber once per process.
///
/// Honours `RUST_LOG`, defaulting to `layerlog=debug`. Output goes through
/// the test writer, so it is only shown for failing tests.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("layerlog=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerlog::{Level, fields};

    #[test]
    fn test_harnesses_are_isolated() {
        let first = TestHarness::new();
        let second = TestHarness::new();

        let _first = first.logger(1, "first", &fields!["k", "one"]);
        let _second = second.logger(1, "second", &fields!["k", "two"]);

        assert_eq!(first.config.name(), "first");
        assert_eq!(second.config.name(), "second");
    }

    #[test]
    fn test_sinks_are_split() {
        let harness = TestHarness::new();
        let logger = harness.logger(Level::Debug.as_i32(), "svc", &[]);

        logger.info("normal", &[]);
        logger.error(&std::io::Error::other("boom"), "failed", &[]);

        assert_eq!(harness.messages(), vec!["normal".to_string()]);
        assert_eq!(harness.error_records().len(), 1);

        harness.clear();
        assert!(harness.normal_records().is_empty());
        assert!(harness.error_records().is_empty());
    }

    #[test]
    fn test_init_test_tracing_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }
}
