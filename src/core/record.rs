//! Records handed to appenders and the payloads callers log

use serde_json::{Map, Value};

/// Finished record: field name → value, in the order the fields were composed
pub type Record = Map<String, Value>;

/// Record key that carries the log message
pub const MESSAGE_KEY: &str = "msg";

/// What a caller passes to a log call: structured fields, a message, or both
///
/// # Example
///
/// ```
/// use rust_structured_logger::core::LogPayload;
/// use serde_json::json;
///
/// let payload = LogPayload::from(json!({"user": "alice"})).with_message("signed in");
/// assert_eq!(payload.message.as_deref(), Some("signed in"));
/// assert!(payload.fields.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogPayload {
    pub fields: Option<Record>,
    pub message: Option<String>,
}

impl LogPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload with only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            fields: None,
            message: Some(message.into()),
        }
    }

    /// Payload with only fields
    pub fn fields(fields: Record) -> Self {
        Self {
            fields: Some(fields),
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields
            .get_or_insert_with(Record::new)
            .insert(key.into(), value.into());
        self
    }

    /// Number of structured fields, ignoring the message
    pub fn field_count(&self) -> usize {
        self.fields.as_ref().map_or(0, Map::len)
    }
}

impl From<&str> for LogPayload {
    fn from(message: &str) -> Self {
        Self::message(message)
    }
}

impl From<String> for LogPayload {
    fn from(message: String) -> Self {
        Self::message(message)
    }
}

impl From<Record> for LogPayload {
    fn from(fields: Record) -> Self {
        Self::fields(fields)
    }
}

/// Objects become fields, strings become the message, `null` is empty, and
/// any other value is logged as its JSON text.
impl From<Value> for LogPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self::fields(fields),
            Value::String(message) => Self::message(message),
            Value::Null => Self::new(),
            other => Self::message(other.to_string()),
        }
    }
}

impl<M: Into<String>> From<(Value, M)> for LogPayload {
    fn from((fields, message): (Value, M)) -> Self {
        LogPayload::from(fields).with_message(message)
    }
}
