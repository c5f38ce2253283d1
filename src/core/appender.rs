//! Appender trait for log output destinations

use super::{error::Result, record::Record};

/// Destination for composed records
///
/// Appenders receive the record after serializers ran; they choose the byte
/// encoding (see [`OutputFormat`](super::OutputFormat)) and the sink.
pub trait Appender: Send + Sync {
    fn append(&mut self, record: &Record) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
