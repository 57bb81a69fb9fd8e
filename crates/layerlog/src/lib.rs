//! Layerlog - leveled, structured logging with layered fields.
//!
//! This crate provides:
//! - A [`Logger`] with four severities and a runtime-adjustable threshold
//! - Three field layers per record: static (process-wide, written once),
//!   dynamic (per logger), and per-call message fields
//! - A write-once [`GlobalConfig`] holding the package identity
//! - Request contexts that carry a logger across call boundaries
//! - JSON, console and `tracing` output backends
//!
//! # Example
//!
//! ```rust,no_run
//! use layerlog::{RequestContext, bind_logger, fields, logger_from_context, new_logger};
//!
//! let logger = new_logger(1, "billing", &fields!["region", "eu-west-1"]);
//! logger.info("service started", &fields!["port", 8080]);
//!
//! // Carry a request-scoped logger through a context.
//! let ctx = RequestContext::new("http").with_logger(logger);
//! let ctx = bind_logger(&ctx, &fields!["request_id", "r-42"]);
//!
//! let (log, _) = logger_from_context(&ctx);
//! log.debug("charging card", &fields!["amount", 1200]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

mod compose;
mod config;
mod context;
mod error;
mod gate;
mod global;
mod level;
mod logger;
mod record;
mod value;
mod writer;

pub use compose::{FieldSet, NAME_KEY, compose, pairs};
pub use config::{ENV_FORMAT, ENV_LEVEL, ENV_NAME, LogConfig, LogFormat, LogTarget};
pub use context::{RequestContext, RequestGuard, bind_logger, logger_from_context};
pub use error::{LogError, LogResult};
pub use gate::{SeverityGate, SinkKind};
pub use global::{GlobalConfig, StaticIdentity};
pub use level::Level;
pub use logger::{Logger, LoggerBuilder, default_logger, new_dev_logger, new_logger, set_default};
pub use record::{ERROR_KEY, Record};
pub use value::{FieldValue, NIL};
pub use writer::{ConsoleWriter, JsonWriter, MemoryWriter, RecordWriter, TracingWriter};
