//! The composed record handed to writers.

use serde::Serialize;

use crate::compose::FieldSet;
use crate::level::Level;

/// Reserved key for the application error on error records.
pub const ERROR_KEY: &str = "error";

const LEVEL_KEY: &str = "level";
const TIME_KEY: &str = "time";
const MESSAGE_KEY: &str = "message";

/// One composed log record.
///
/// Writers decide how to render it and whether to stamp a time; the core only
/// decides which fields are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Severity of the call.
    pub level: Level,
    /// Composed fields, including `name` when configured.
    pub fields: FieldSet,
    /// Rendered application error (error records only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The log message. Empty for error calls without a message.
    pub message: String,
}

impl Record {
    /// Look up a composed field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&crate::FieldValue> {
        self.fields.get(key)
    }

    /// Flatten into a JSON object.
    ///
    /// Key order is `level`, fields, `error`, `time`, `message`. A composed
    /// field is dropped when its key is a reserved key written for this
    /// record.
    #[must_use]
    pub fn to_json_map(&self, time: Option<&str>) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert(LEVEL_KEY.to_string(), self.level.as_str().into());
        for (key, value) in &self.fields {
            let reserved = match key.as_str() {
                LEVEL_KEY | MESSAGE_KEY => true,
                ERROR_KEY => self.error.is_some(),
                TIME_KEY => time.is_some(),
                _ => false,
            };
            if !reserved {
                map.insert(key.clone(), value.to_json());
            }
        }
        if let Some(err) = &self.error {
            map.insert(ERROR_KEY.to_string(), err.as_str().into());
        }
        if let Some(time) = time {
            map.insert(TIME_KEY.to_string(), time.into());
        }
        map.insert(MESSAGE_KEY.to_string(), self.message.as_str().into());
        map
    }
}
