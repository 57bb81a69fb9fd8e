//! Prelude module - commonly used types for convenient import.
//!
//! Use `use layerlog::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust,no_run
//! use layerlog::prelude::*;
//!
//! # fn main() -> LogResult<()> {
//! let logger = LogConfig::new(Level::Info)
//!     .with_name("ingest")
//!     .apply_env()?
//!     .build_logger();
//!
//! logger.add_dyna("worker", 3);
//! logger.info("batch accepted", &fields!["rows", 512]);
//! # Ok(())
//! # }
//! ```

// Errors
pub use crate::{LogError, LogResult};

// Levels and fields
pub use crate::{FieldValue, Level, fields};

// Loggers
pub use crate::{Logger, LoggerBuilder, default_logger, new_dev_logger, new_logger};

// Configuration
pub use crate::{GlobalConfig, LogConfig, LogFormat, LogTarget};

// Request context
pub use crate::{RequestContext, RequestGuard, bind_logger, logger_from_context};
