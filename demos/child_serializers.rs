//! Child logger serializer example
//!
//! Demonstrates how child loggers inherit, override and extend their
//! parent's serializers, and how a wildcard serializer reshapes records.
//!
//! Run with: cargo run --example child_serializers

use rust_structured_logger::prelude::*;
use serde_json::json;

fn main() -> Result<()> {
    println!("=== Rust Structured Logger - Child Serializers Example ===\n");

    let capture = MemoryAppender::new();
    let parent = Logger::builder()
        .appender(capture.clone())
        .base_fields(ProcessBaseFields::new().with_time(false).with_process_info(false))
        .serializer("user", Serializer::new(|v| json!(v["name"].clone())))
        .serializer("card", Serializer::new(|_| json!("****")))
        .build()?;

    // Overrides `user`, inherits `card`, adds `order`
    let child = parent.child(
        ChildOptions::new()
            .binding("module", "billing")
            .serializer("user", Serializer::new(|v| json!(v["id"].clone())))
            .serializer("order", Serializer::new(|v| json!(format!("#{}", v)))),
    )?;

    let fields = json!({
        "user": {"id": 7, "name": "alice"},
        "card": "4111111111111111",
        "order": 1042
    });
    parent.info(LogPayload::from(fields.clone()).with_message("from parent"))?;
    child.info(LogPayload::from(fields).with_message("from child"))?;

    println!("1. Parent and child records:");
    for line in capture.lines(OutputFormat::Json)? {
        println!("   {}", line);
    }

    // The wildcard sees the fully composed record and owns its final shape
    let audited = child.child(ChildOptions::new().wildcard_serializer(Serializer::new(
        |record| {
            json!({
                "audit": true,
                "who": record["user"].clone(),
                "what": record["msg"].clone(),
            })
        },
    )))?;
    capture.take();
    audited.warn(LogPayload::from(json!({"user": {"id": 7}})).with_message("refund issued"))?;

    println!("\n2. Record reshaped by a wildcard serializer:");
    for line in capture.lines(OutputFormat::Json)? {
        println!("   {}", line);
    }

    // Failing serializers are reported to the caller under the default policy
    let strict = parent.child(ChildOptions::new().serializer(
        "amount",
        Serializer::fallible(|v| {
            v.as_f64()
                .map(|n| json!(format!("{:.2}", n)))
                .ok_or("amount must be a number")
        }),
    ))?;
    match strict.info(json!({"amount": "lots"})) {
        Ok(()) => println!("\n3. Unexpectedly logged"),
        Err(e) => println!("\n3. Serializer failure reported: {}", e),
    }

    println!(
        "\nMetrics: {} logged, {} serializer failures",
        parent.metrics().total_logged(),
        parent.metrics().serializer_failures()
    );

    println!("\n=== Example completed ===");
    Ok(())
}
