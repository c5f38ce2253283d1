//! Console appender implementation

use crate::core::{Appender, LogLevel, OutputFormat, Record, Result};
use colored::Colorize;

pub struct ConsoleAppender {
    use_colors: bool,
    output_format: OutputFormat,
}

impl ConsoleAppender {
    /// Colored text output
    pub fn new() -> Self {
        Self {
            use_colors: true,
            output_format: OutputFormat::Text,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            output_format: OutputFormat::Text,
        }
    }

    /// Set the output format for this appender
    ///
    /// # Example
    ///
    /// ```
    /// use rust_structured_logger::appenders::ConsoleAppender;
    /// use rust_structured_logger::OutputFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    fn render(&self, record: &Record) -> Result<String> {
        let line = self.output_format.format(record)?;
        if !self.use_colors || self.output_format != OutputFormat::Text {
            return Ok(line);
        }

        // Colors apply to the level token only
        Ok(match OutputFormat::record_level(record) {
            Some(level) => {
                let plain = format!("{:5}", level.to_str());
                let colored = plain.color(level.color_code()).to_string();
                line.replacen(&plain, &colored, 1)
            }
            None => line,
        })
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &Record) -> Result<()> {
        let output = self.render(record)?;

        // Route Error and Fatal levels to stderr, others to stdout
        match OutputFormat::record_level(record) {
            Some(LogLevel::Error | LogLevel::Fatal) => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
