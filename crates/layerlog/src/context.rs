//! Request context carrying a logger across call boundaries.
//!
//! A [`RequestContext`] is an immutable, clonable value passed down a request's
//! call chain. Besides correlation metadata it has a typed slot for a
//! [`Logger`]; the slot is a struct field, so no string key can collide with
//! it and the stored handle is exactly the one returned on lookup.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields;
use crate::global::GlobalConfig;
use crate::logger::{Logger, LoggerBuilder};
use crate::value::FieldValue;

/// Per-request state handed down a call chain, including its logger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Identifies this request.
    pub request_id: Uuid,
    /// Shared by a request and every child derived from it.
    pub correlation_id: Uuid,
    /// `request_id` of the context this one was derived from.
    pub parent_id: Option<Uuid>,
    /// Creation time.
    pub started_at: DateTime<Utc>,
    /// Component that created the context.
    pub source: String,
    /// Name of the work being done, if known.
    pub operation: Option<String>,
    /// Free-form string annotations, copied into children.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(skip)]
    logger: Option<Logger>,
}

impl RequestContext {
    /// Create a new request context without a bound logger.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let id = Uuid::new_v4();
        Self {
            request_id: id,
            correlation_id: id,
            parent_id: None,
            started_at: Utc::now(),
            source: source.into(),
            operation: None,
            metadata: HashMap::new(),
            logger: None,
        }
    }

    /// Create a child context that inherits correlation info and the bound
    /// logger.
    #[must_use]
    pub fn child(&self, source: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            correlation_id: self.correlation_id,
            parent_id: Some(self.request_id),
            started_at: Utc::now(),
            source: source.into(),
            operation: None,
            metadata: self.metadata.clone(),
            logger: self.logger.clone(),
        }
    }

    /// Join an existing correlation group.
    #[must_use]
    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = id;
        self
    }

    /// Name the work being done.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Attach one annotation.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Bind `logger` as-is, replacing any logger already bound.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The bound logger, if any.
    #[must_use]
    pub fn bound_logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }

    /// Time since creation.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        // started_at is never in the future
        #[allow(clippy::arithmetic_side_effects)]
        let elapsed = Utc::now() - self.started_at;
        elapsed
    }

    /// [`elapsed`](Self::elapsed) in whole milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed().num_milliseconds()
    }

    /// An `info` span tagged with the request identifiers.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "request",
            request_id = %self.request_id,
            correlation_id = %self.correlation_id,
            source = %self.source,
            operation = self.operation.as_deref(),
        )
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new("unknown")
    }
}

/// Return a context carrying a logger.
///
/// The logger is the one already bound to `ctx`, or a fresh default one. When
/// `fields` is non-empty it replaces the logger's dynamic fields; an already
/// bound logger is forked first so the parent context's logger keeps its own
/// fields.
#[must_use]
pub fn bind_logger(ctx: &RequestContext, fields: &[FieldValue]) -> RequestContext {
    let (logger, found) = logger_from_context(ctx);
    let logger = if fields.is_empty() {
        logger
    } else {
        let logger = if found { logger.fork() } else { logger };
        logger.set_dyna(fields);
        logger
    };
    ctx.clone().with_logger(logger)
}

/// Look up the logger bound to `ctx`.
///
/// Returns the bound handle and `true`, or a freshly built logger using the
/// process-global level and name and `false`. Never fails.
#[must_use]
pub fn logger_from_context(ctx: &RequestContext) -> (Logger, bool) {
    match &ctx.logger {
        Some(logger) => (logger.clone(), true),
        None => {
            let config = GlobalConfig::global();
            let logger = LoggerBuilder::new(config.level().as_i32())
                .name(config.name())
                .build();
            (logger, false)
        },
    }
}

/// Logs the start of a request on creation and its duration on drop.
pub struct RequestGuard {
    context: RequestContext,
    logger: Logger,
    /// Entered for the guard's lifetime.
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl RequestGuard {
    /// Create a new request guard, logging through the context's logger.
    #[must_use]
    pub fn new(context: RequestContext) -> Self {
        let span = context.span().entered();
        let (logger, _) = logger_from_context(&context);
        logger.debug(
            "request started",
            &fields![
                "request_id", context.request_id,
                "source", context.source.as_str(),
                "operation", context.operation.as_deref(),
            ],
        );
        Self {
            context,
            logger,
            span,
        }
    }

    /// The guarded context.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// The logger requests under this guard log through.
    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.logger.debug(
            "request completed",
            &fields![
                "request_id", self.context.request_id,
                "elapsed_ms", self.context.elapsed_ms(),
            ],
        );
    }
}
