//! Timestamp formats for the `time` base field

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How the `time` field of a record is rendered
///
/// Numeric formats produce JSON numbers, the rest produce strings.
///
/// # Examples
///
/// ```
/// use rust_structured_logger::core::TimestampFormat;
/// use chrono::Utc;
///
/// let value = TimestampFormat::UnixMillis.to_value(&Utc::now());
/// assert!(value.is_u64());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Milliseconds since the Unix epoch: `1736332245123`
    #[default]
    UnixMillis,

    /// Seconds since the Unix epoch: `1736332245`
    Unix,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 with offset: `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Any strftime-compatible format string
    Custom(String),
}

impl TimestampFormat {
    /// Render as text
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Render as a record value
    #[must_use]
    pub fn to_value(&self, datetime: &DateTime<Utc>) -> Value {
        match self {
            TimestampFormat::UnixMillis => Value::from(datetime.timestamp_millis()),
            TimestampFormat::Unix => Value::from(datetime.timestamp()),
            _ => Value::String(self.format(datetime)),
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::Unix | TimestampFormat::UnixMillis)
    }
}
