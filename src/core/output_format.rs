//! Output formats for composed records
//!
//! - Json: one JSON object per line, fields in composition order
//! - Logfmt: `key=value` pairs
//! - Text: human-readable `[time] LEVEL message key=value ...`

use super::base_fields::{LEVEL_KEY, TIME_KEY};
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::record::{Record, MESSAGE_KEY};
use serde_json::Value;

/// Output format for records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Machine-readable JSON (default)
    ///
    /// Example: `{"level":30,"time":1736332245123,"pid":42,"hostname":"box","msg":"Request processed"}`
    #[default]
    Json,

    /// Logfmt format (key=value pairs)
    ///
    /// Example: `level=30 time=1736332245123 msg="Request processed"`
    Logfmt,

    /// Human-readable text
    ///
    /// Example: `[1736332245123] INFO  Request processed pid=42 hostname=box`
    Text,
}

impl OutputFormat {
    /// Encode a record as a single line (without the trailing newline)
    pub fn format(&self, record: &Record) -> Result<String> {
        match self {
            OutputFormat::Json => serde_json::to_string(record)
                .map_err(|e| LoggerError::formatter("JSON", e.to_string())),
            OutputFormat::Logfmt => Ok(self.format_logfmt(record)),
            OutputFormat::Text => Ok(self.format_text(record)),
        }
    }

    /// Level of a record, when its `level` field holds a known numeric level
    pub fn record_level(record: &Record) -> Option<LogLevel> {
        record
            .get(LEVEL_KEY)
            .and_then(Value::as_u64)
            .and_then(LogLevel::from_value)
    }

    fn format_logfmt(&self, record: &Record) -> String {
        record
            .iter()
            .map(|(key, value)| {
                let formatted = match value {
                    Value::String(s) => escape_logfmt_value(s),
                    other => escape_logfmt_value(&other.to_string()),
                };
                format!("{}={}", escape_logfmt_key(key), formatted)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn format_text(&self, record: &Record) -> String {
        let mut parts = Vec::with_capacity(record.len());

        if let Some(time) = record.get(TIME_KEY) {
            parts.push(format!("[{}]", sanitize(&plain(time))));
        }
        match (Self::record_level(record), record.get(LEVEL_KEY)) {
            (Some(level), _) => parts.push(format!("{:5}", level.to_str())),
            (None, Some(raw)) => parts.push(format!("{:5}", sanitize(&plain(raw)))),
            (None, None) => {}
        }
        if let Some(message) = record.get(MESSAGE_KEY) {
            parts.push(sanitize(&plain(message)));
        }

        for (key, value) in record {
            if key == TIME_KEY || key == LEVEL_KEY || key == MESSAGE_KEY {
                continue;
            }
            parts.push(format!("{}={}", sanitize(key), sanitize(&plain(value))));
        }

        parts.join(" ")
    }
}

/// String values unquoted, everything else as JSON text
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Escape control characters so one record stays on one line
fn sanitize(text: &str) -> String {
    if !text.chars().any(char::is_control) {
        return text.to_string();
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        push_escaped(&mut escaped, c);
    }
    escaped
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c if c.is_control() => out.push_str(&format!("\\u{{{:04x}}}", c as u32)),
        c => out.push(c),
    }
}

fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
        .collect()
}

fn escape_logfmt_value(value: &str) -> String {
    if value.is_empty()
        || value
            .chars()
            .any(|c| c == ' ' || c == '"' || c == '=' || c.is_control())
    {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            c => push_escaped(&mut quoted, c),
        }
    }
    quoted.push('"');
    quoted
}
