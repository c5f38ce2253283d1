//! Base fields attached to every record: level, time, pid and hostname

use super::log_level::LogLevel;
use super::record::Record;
use super::timestamp::TimestampFormat;
use chrono::Utc;
use serde_json::Value;

pub const LEVEL_KEY: &str = "level";
pub const TIME_KEY: &str = "time";
pub const PID_KEY: &str = "pid";
pub const HOSTNAME_KEY: &str = "hostname";

/// Source of the metadata fields a logger injects ahead of caller fields
///
/// When a wildcard serializer is registered the compositor hands these fields
/// to the wildcard and emits only what it returns.
pub trait BaseFields: Send + Sync {
    fn write_base_fields(&self, level: LogLevel, record: &mut Record);
}

/// Default base fields: numeric level, time, process id and host name
#[derive(Debug, Clone)]
pub struct ProcessBaseFields {
    pid: u32,
    hostname: String,
    timestamp_format: TimestampFormat,
    include_time: bool,
    include_process: bool,
}

impl ProcessBaseFields {
    pub fn new() -> Self {
        Self {
            pid: std::process::id(),
            hostname: detect_hostname(),
            timestamp_format: TimestampFormat::default(),
            include_time: true,
            include_process: true,
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Toggle the `time` field
    #[must_use]
    pub fn with_time(mut self, include: bool) -> Self {
        self.include_time = include;
        self
    }

    /// Toggle the `pid` and `hostname` fields
    #[must_use]
    pub fn with_process_info(mut self, include: bool) -> Self {
        self.include_process = include;
        self
    }

    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Default for ProcessBaseFields {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseFields for ProcessBaseFields {
    fn write_base_fields(&self, level: LogLevel, record: &mut Record) {
        record.insert(LEVEL_KEY.to_string(), Value::from(level.value()));
        if self.include_time {
            record.insert(
                TIME_KEY.to_string(),
                self.timestamp_format.to_value(&Utc::now()),
            );
        }
        if self.include_process {
            record.insert(PID_KEY.to_string(), Value::from(self.pid));
            record.insert(
                HOSTNAME_KEY.to_string(),
                Value::String(self.hostname.clone()),
            );
        }
    }
}

fn detect_hostname() -> String {
    if let Ok(name) = std::env::var("HOSTNAME") {
        let name = name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }
    std::fs::read_to_string("/etc/hostname")
        .ok()
        .map(|contents| contents.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fields_in_order() {
        let base = ProcessBaseFields::new().with_hostname("test-host");
        let mut record = Record::new();
        base.write_base_fields(LogLevel::Warn, &mut record);

        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys, vec!["level", "time", "pid", "hostname"]);
        assert_eq!(record["level"], 40);
        assert_eq!(record["hostname"], "test-host");
        assert_eq!(record["pid"], std::process::id());
        assert!(record["time"].is_i64() || record["time"].is_u64());
    }

    #[test]
    fn test_toggles() {
        let base = ProcessBaseFields::new()
            .with_time(false)
            .with_process_info(false);
        let mut record = Record::new();
        base.write_base_fields(LogLevel::Info, &mut record);

        assert_eq!(record.len(), 1);
        assert_eq!(record["level"], 30);
    }

    #[test]
    fn test_hostname_detected() {
        assert!(!ProcessBaseFields::new().hostname().is_empty());
    }
}
