//! Criterion benchmarks for rust_structured_logger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_structured_logger::prelude::*;
use serde_json::json;

fn field_map(count: usize) -> SerializerMap {
    (0..count).fold(SerializerMap::new(), |map, i| {
        map.with(format!("field_{}", i), Serializer::new(|v| v.clone()))
    })
}

/// Records go nowhere so the benchmark measures composition only
struct NullAppender;

impl Appender for NullAppender {
    fn append(&mut self, record: &Record) -> Result<()> {
        black_box(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

// ============================================================================
// Child Derivation Benchmarks
// ============================================================================

fn bench_child_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("child_derivation");
    group.throughput(Throughput::Elements(1));

    for parent_size in [0usize, 8, 64] {
        let parent = Logger::builder()
            .serializers(field_map(parent_size))
            .build()
            .unwrap();

        group.bench_with_input(
            BenchmarkId::new("bindings_only", parent_size),
            &parent,
            |b, parent| {
                b.iter(|| {
                    let child = parent
                        .child(ChildOptions::new().binding("request_id", "abc"))
                        .unwrap();
                    black_box(child)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("one_override", parent_size),
            &parent,
            |b, parent| {
                b.iter(|| {
                    let child = parent
                        .child(
                            ChildOptions::new()
                                .serializer("field_0", Serializer::new(|_| json!("child"))),
                        )
                        .unwrap();
                    black_box(child)
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Record Composition Benchmarks
// ============================================================================

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    group.throughput(Throughput::Elements(1));

    let plain = Logger::new();
    group.bench_function("message_only", |b| {
        b.iter(|| {
            let record = plain
                .compositor()
                .compose(LogLevel::Info, black_box("Info message").into())
                .unwrap();
            black_box(record)
        });
    });

    let serialized = Logger::builder()
        .serializers(field_map(4))
        .std_serializer("err")
        .build()
        .unwrap();
    group.bench_function("four_serialized_fields", |b| {
        b.iter(|| {
            let payload = LogPayload::from(json!({
                "field_0": 0, "field_1": 1, "field_2": 2, "field_3": 3,
                "err": {"name": "Error", "message": "boom"}
            }));
            let record = serialized
                .compositor()
                .compose(LogLevel::Info, black_box(payload))
                .unwrap();
            black_box(record)
        });
    });

    let wildcard = Logger::builder()
        .wildcard_serializer(Serializer::new(|record| {
            json!({"level": record["level"].clone(), "msg": record["msg"].clone()})
        }))
        .build()
        .unwrap();
    group.bench_function("wildcard", |b| {
        b.iter(|| {
            let record = wildcard
                .compositor()
                .compose(LogLevel::Info, black_box("Info message").into())
                .unwrap();
            black_box(record)
        });
    });

    group.finish();
}

// ============================================================================
// End-to-end Logging Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let root = Logger::builder()
        .appender(NullAppender)
        .serializer("user", Serializer::new(|v| v["id"].clone()))
        .build()
        .unwrap();
    let mut deep = root.clone();
    for depth in 0..8 {
        deep = deep
            .child(ChildOptions::new().binding(format!("layer_{}", depth), depth))
            .unwrap();
    }

    group.bench_function("root", |b| {
        b.iter(|| {
            root.info(black_box(json!({"user": {"id": 7, "name": "alice"}})))
                .unwrap();
        });
    });

    group.bench_function("depth_8_child", |b| {
        b.iter(|| {
            deep.info(black_box(json!({"user": {"id": 7, "name": "alice"}})))
                .unwrap();
        });
    });

    group.bench_function("filtered", |b| {
        b.iter(|| {
            root.debug(black_box("Debug message")).unwrap();
        });
    });

    group.finish();
}

// ============================================================================
// Output Format Benchmarks
// ============================================================================

fn bench_output_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("output_format");

    let record = Logger::new()
        .compositor()
        .compose(
            LogLevel::Info,
            LogPayload::from(json!({"user": "alice", "count": 3})).with_message("done"),
        )
        .unwrap();

    for format in [OutputFormat::Json, OutputFormat::Logfmt, OutputFormat::Text] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", format)),
            &record,
            |b, record| {
                b.iter(|| black_box(format.format(record).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_child_derivation,
    bench_compose,
    bench_logging,
    bench_output_format,
);

criterion_main!(benches);
