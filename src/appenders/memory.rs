//! In-memory appender that keeps every record it receives

use crate::core::{Appender, OutputFormat, Record, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Captures records in a shared buffer
///
/// Clones share the buffer, so a clone can be handed to a logger while the
/// original is kept for inspection.
///
/// # Example
///
/// ```
/// use rust_structured_logger::prelude::*;
///
/// let capture = MemoryAppender::new();
/// let logger = Logger::builder().appender(capture.clone()).build().unwrap();
/// logger.info("hello").unwrap();
/// assert_eq!(capture.last().unwrap()["msg"], "hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    records: Arc<Mutex<Vec<Record>>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every captured record, oldest first
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn last(&self) -> Option<Record> {
        self.records.lock().last().cloned()
    }

    /// Captured records encoded with `format`, one line each
    pub fn lines(&self, format: OutputFormat) -> Result<Vec<String>> {
        self.records
            .lock()
            .iter()
            .map(|record| format.format(record))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Remove and return every captured record
    pub fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.records.lock())
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, record: &Record) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clones_share_buffer() {
        let capture = MemoryAppender::new();
        let mut handle = capture.clone();
        handle
            .append(json!({"a": 1}).as_object().unwrap())
            .unwrap();

        assert_eq!(capture.len(), 1);
        assert_eq!(capture.lines(OutputFormat::Json).unwrap(), vec![r#"{"a":1}"#]);
        assert_eq!(capture.take().len(), 1);
        assert!(capture.is_empty());
    }
}
