//! Stress tests for concurrent use of a logger hierarchy
//!
//! These tests verify:
//! - Parent and children log from many threads without losing records
//! - Child derivation while other threads log leaves every registry intact
//! - Failing serializers under load are counted, not emitted

use rust_structured_logger::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

/// Every record from every thread reaches the shared appender with the right serializer
#[test]
fn test_concurrent_parent_and_child_logging() {
    let capture = MemoryAppender::new();
    let parent = Logger::builder()
        .serializer("owner", Serializer::new(|_| json!("parent")))
        .appender(capture.clone())
        .build()
        .unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let parent = parent.clone();
            thread::spawn(move || {
                let child = parent
                    .child(
                        ChildOptions::new()
                            .binding("thread", t)
                            .serializer("owner", Serializer::new(|_| json!("child"))),
                    )
                    .unwrap();
                for i in 0..PER_THREAD {
                    if i % 2 == 0 {
                        parent.info(json!({"owner": "x", "i": i})).unwrap();
                    } else {
                        child.info(json!({"owner": "x", "i": i})).unwrap();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    let records = capture.records();
    assert_eq!(records.len(), THREADS * PER_THREAD);

    for record in &records {
        let from_child = record.contains_key("thread");
        let expected = if from_child { "child" } else { "parent" };
        assert_eq!(record["owner"], expected);
    }
    assert_eq!(parent.metrics().total_logged(), (THREADS * PER_THREAD) as u64);
    assert_eq!(parent.dropped_count(), 0);
}

/// Deriving many children while the parent logs never changes the parent's registry
#[test]
fn test_derivation_under_load() {
    let capture = MemoryAppender::new();
    let parent = Logger::builder()
        .serializer("shared", Serializer::new(|_| json!("parent")))
        .appender(capture.clone())
        .build()
        .unwrap();
    let derived = Arc::new(AtomicUsize::new(0));

    let writers: Vec<_> = (0..THREADS / 2)
        .map(|_| {
            let parent = parent.clone();
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    parent.info(json!({"shared": 1})).unwrap();
                }
            })
        })
        .collect();

    let deriving: Vec<_> = (0..THREADS / 2)
        .map(|t| {
            let parent = parent.clone();
            let derived = Arc::clone(&derived);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let child = parent
                        .child(ChildOptions::new().serializer(
                            format!("field_{}_{}", t, i),
                            Serializer::new(|_| json!("child")),
                        ))
                        .unwrap();
                    assert_eq!(child.registry().len(), 2);
                    derived.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(deriving) {
        handle.join().expect("worker thread panicked");
    }

    assert_eq!(derived.load(Ordering::Relaxed), (THREADS / 2) * PER_THREAD);
    assert_eq!(parent.registry().len(), 1);
    assert!(capture
        .records()
        .iter()
        .all(|record| record["shared"] == "parent"));
}

/// Serializer failures across threads are counted and never reach the appender
#[test]
fn test_failing_serializer_under_load() {
    let capture = MemoryAppender::new();
    let logger = Logger::builder()
        .serializer(
            "payload",
            Serializer::fallible(|v| {
                if v.as_u64().is_some_and(|n| n % 10 == 0) {
                    Err("multiple of ten")
                } else {
                    Ok(v.clone())
                }
            }),
        )
        .appender(capture.clone())
        .build()
        .unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let logger = logger.clone();
            thread::spawn(move || {
                let mut failures = 0;
                for i in 0..PER_THREAD {
                    if logger.info(json!({"payload": i})).is_err() {
                        failures += 1;
                    }
                }
                failures
            })
        })
        .collect();

    let failures: usize = handles
        .into_iter()
        .map(|handle| handle.join().expect("logging thread panicked"))
        .sum();

    let expected_failures = THREADS * PER_THREAD.div_ceil(10);
    assert_eq!(failures, expected_failures);
    assert_eq!(capture.len(), THREADS * PER_THREAD - expected_failures);
    assert_eq!(
        logger.metrics().serializer_failures(),
        expected_failures as u64
    );
}
