//! JSON appender for structured logging

use crate::core::{Appender, LoggerError, Record, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// JSON file appender
///
/// Writes each record as a single-line JSON object (JSONL format), fields in
/// the order they were composed. Compatible with log aggregation tools like
/// ELK, Loki, etc.
pub struct JsonAppender {
    writer: BufWriter<File>,
    pretty: bool,
}

impl JsonAppender {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            writer: BufWriter::new(Self::open(path)?),
            pretty: false,
        })
    }

    /// Multi-line pretty JSON, for reading by eye
    pub fn new_pretty<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            writer: BufWriter::new(Self::open(path)?),
            pretty: true,
        })
    }

    fn open<P: AsRef<Path>>(path: P) -> Result<File> {
        Ok(OpenOptions::new().create(true).append(true).open(path)?)
    }
}

impl Appender for JsonAppender {
    fn name(&self) -> &str {
        "json"
    }

    fn append(&mut self, record: &Record) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(record)
        } else {
            serde_json::to_string(record)
        }
        .map_err(|e| LoggerError::formatter("JSON", e.to_string()))?;

        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonAppender {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
