//! Basic logger usage example
//!
//! Demonstrates field serializers, bindings and output formats with the
//! console appender.
//!
//! Run with: cargo run --example basic_usage

use rust_structured_logger::prelude::*;
use serde_json::json;

fn main() -> Result<()> {
    println!("=== Rust Structured Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .min_level(LogLevel::Trace)
        .appender(ConsoleAppender::new())
        .std_serializer("err")
        .serializer("password", Serializer::new(|_| json!("[redacted]")))
        .binding("service", "checkout")
        .build()?;

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message")?;
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.warn("This is a warning message")?;
    logger.error("This is an error message")?;
    logger.fatal("This is a fatal message")?;

    println!("\n2. Fields pass through their serializers:");
    logger.info(
        LogPayload::from(json!({"user": "alice", "password": "hunter2"}))
            .with_message("user signed in"),
    )?;
    logger.error(json!({
        "err": {"name": "TimeoutError", "message": "upstream timed out", "retry": 3}
    }))?;

    println!("\n3. Changing the minimum level:");
    logger.set_min_level(LogLevel::Warn);
    logger.info("This info message is filtered")?;
    logger.warn("This warning is shown")?;

    println!("\n4. JSON and logfmt output:");
    let json_logger = Logger::builder()
        .appender(ConsoleAppender::new().with_output_format(OutputFormat::Json))
        .timestamp_format(TimestampFormat::Rfc3339)
        .build()?;
    json_logger.info(LogPayload::from(json!({"order": 1042})).with_message("order placed"))?;

    let logfmt_logger = Logger::builder()
        .appender(ConsoleAppender::new().with_output_format(OutputFormat::Logfmt))
        .build()?;
    logfmt_logger.info(LogPayload::from(json!({"order": 1042})).with_message("order shipped"))?;

    println!("\n5. Macros:");
    rust_structured_logger::info!(logger, json!({"attempt": 2}); "retrying {}", "payment")?;
    rust_structured_logger::warn!(logger, "queue depth at {}%", 85)?;

    logger.flush()?;

    println!(
        "\nMetrics: {} logged, {} filtered",
        logger.metrics().total_logged(),
        logger.metrics().filtered_count()
    );

    println!("\n=== Example completed ===");
    Ok(())
}
