//! Benchmark – `jsonstep::JsonStream` and `jsonstep::ArrayStream`
#![allow(missing_docs)]

use std::{
    hint::black_box,
    sync::{Arc, OnceLock},
    time::Duration,
};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use jsonstep::{ArrayStream, FromJson, JsonStream, JsonValue, ObjectSchema, Parameter, SchemaBuilder, Target};

/// A deterministic array of `records` small objects.
fn make_records(records: usize) -> String {
    let mut s = String::from("[");
    for i in 0..records {
        if i > 0 {
            s.push_str(", ");
        }
        s.push_str(&format!(
            r#"{{"id": {i}, "name": "record é {i}", "score": {}.{:02}, "tags": ["a", "b"], "ok": true}}"#,
            i % 97,
            i % 100
        ));
    }
    s.push(']');
    s
}

struct Record {
    id: i64,
    score: f64,
}

impl FromJson for Record {
    fn target() -> Target {
        static SCHEMA: OnceLock<Arc<ObjectSchema>> = OnceLock::new();
        Target::Object(Arc::clone(SCHEMA.get_or_init(|| {
            SchemaBuilder::<Record>::new("Record")
                .constructor([Parameter::new::<i64>("id"), Parameter::new::<f64>("score")], |args| {
                    Ok(Record {
                        id: args.take("id")?,
                        score: args.take("score")?,
                    })
                })
                .ignore("name")
                .ignore("tags")
                .ignore("ok")
                .build()
        })))
    }
}

fn run_document(payload: &str, parts: usize) -> JsonValue {
    let chunk_size = payload.len().div_ceil(parts);
    let mut stream = JsonStream::<JsonValue>::new();
    let mut start = 0;
    while start < payload.len() {
        let mut end = (start + chunk_size).min(payload.len());
        while !payload.is_char_boundary(end) {
            end += 1;
        }
        stream.feed(&payload[start..end]).expect("feed");
        start = end;
    }
    stream.finish().expect("finish")
}

fn run_records(payload: &str) -> f64 {
    let mut total = 0.0;
    let mut stream = ArrayStream::new(|r: Record| total += r.score + r.id as f64);
    stream.feed(payload).expect("feed");
    stream.finish().expect("finish");
    total
}

fn bench_char_stream(c: &mut Criterion) {
    let payload = make_records(500);

    let mut group = c.benchmark_group("json_stream_split");
    for &parts in &[1usize, 100, 5_000] {
        group.bench_with_input(BenchmarkId::from_parameter(parts), &parts, |b, &parts| {
            b.iter(|| black_box(run_document(black_box(&payload), parts)));
        });
    }
    group.finish();

    c.bench_function("array_stream_records", |b| {
        b.iter(|| black_box(run_records(black_box(&payload))));
    });

    c.bench_function("serde_json_baseline", |b| {
        b.iter(|| black_box(serde_json::from_str::<serde_json::Value>(black_box(&payload)).expect("parse")));
    });
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(5))
            .measurement_time(Duration::from_secs(10));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_char_stream }
criterion_main!(benches);
