//! Benchmarks for chatmap parsing, matching and merging.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench parsing -- telegram`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chatmap::config::{MsgPosition, ParseConfig};
use chatmap::detect::detect_platform;
use chatmap::geojson::to_geojson;
use chatmap::matcher::resolve_features;
use chatmap::merger::{merge, merge_parallel};
use chatmap::message::{Location, MessageRecord};
use chatmap::index::MessageIndex;
use chatmap::parser::Parser;
use chatmap::parsers::{SignalParser, TelegramParser, WhatsAppParser};

use chrono::{TimeZone, Utc};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Every tenth message shares a location.
fn generate_telegram_json(count: usize) -> String {
    let mut messages = Vec::with_capacity(count);
    for i in 0..count {
        let sender = if i % 2 == 0 { "Alice" } else { "Bob" };
        let timestamp = 1705314600 + (i as i64 * 60);
        if i % 10 == 9 {
            messages.push(format!(
                r#"{{"id": {}, "type": "message", "date_unixtime": "{}", "from": "{}", "text": "", "location_information": {{"latitude": {}, "longitude": {}}}}}"#,
                i,
                timestamp,
                sender,
                (i % 90) as f64 * 0.5,
                (i % 180) as f64 * 0.5
            ));
        } else {
            messages.push(format!(
                r#"{{"id": {}, "type": "message", "date_unixtime": "{}", "from": "{}", "text": "Message number {}"}}"#,
                i, timestamp, sender, i
            ));
        }
    }
    format!(
        r#"{{"name": "Test Chat", "type": "personal_chat", "messages": [{}]}}"#,
        messages.join(",\n")
    )
}

fn generate_whatsapp_txt(count: usize) -> String {
    let mut lines = Vec::with_capacity(count);
    for i in 0..count {
        let sender = if i % 2 == 0 { "Alice" } else { "Bob" };
        let hour = (i / 60) % 24;
        let minute = i % 60;
        let body = if i % 10 == 9 {
            format!("location: https://maps.google.com/?q={}.5,{}.25", i % 80, i % 170)
        } else {
            format!("Message number {i}")
        };
        lines.push(format!("[15.01.24, {:02}:{:02}:00] {}: {}", hour, minute, sender, body));
    }
    lines.join("\n")
}

fn generate_signal_md(count: usize) -> String {
    let mut lines = Vec::with_capacity(count);
    for i in 0..count {
        let hour = (i / 60) % 24;
        let minute = i % 60;
        let body = if i % 10 == 9 {
            format!("geo:{}.5,{}.25", i % 80, i % 170)
        } else {
            format!("![image.jpg](./media/img_{i}.jpg)")
        };
        lines.push(format!("[2024-03-02 {:02}:{:02}] Alice: {}", hour, minute, body));
    }
    lines.join("\n")
}

fn generate_index(count: usize) -> MessageIndex {
    (0..count)
        .map(|i| {
            let time = Utc.timestamp_opt(1_705_314_600 + i as i64 * 60, 0).unwrap();
            let record = MessageRecord::new("Alice", format!("Message {i}")).with_time(time);
            if i % 10 == 9 {
                record.with_location(Location::new(1.0, 2.0))
            } else {
                record
            }
        })
        .collect()
}

// =============================================================================
// Parsing Benchmarks
// =============================================================================

fn bench_telegram_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("telegram_parsing");
    let parser = TelegramParser::new();
    let config = ParseConfig::default();

    for size in [100_usize, 1_000, 10_000] {
        let json = generate_telegram_json(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| {
                let output = parser.parse_str(black_box(json), &config).unwrap();
                black_box(output)
            });
        });
    }
    group.finish();
}

fn bench_whatsapp_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("whatsapp_parsing");
    let parser = WhatsAppParser::new();
    let config = ParseConfig::default();

    for size in [100_usize, 1_000, 10_000] {
        let txt = generate_whatsapp_txt(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &txt, |b, txt| {
            b.iter(|| {
                let output = parser.parse_str(black_box(txt), &config).unwrap();
                black_box(output)
            });
        });
    }
    group.finish();
}

fn bench_signal_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal_parsing");
    let parser = SignalParser::new();
    let config = ParseConfig::default();

    for size in [100_usize, 1_000, 10_000] {
        let md = generate_signal_md(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &md, |b, md| {
            b.iter(|| {
                let output = parser.parse_str(black_box(md), &config).unwrap();
                black_box(output)
            });
        });
    }
    group.finish();
}

// =============================================================================
// Matching and Detection Benchmarks
// =============================================================================

fn bench_resolve_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_features");

    for position in [MsgPosition::Closest, MsgPosition::Before, MsgPosition::After] {
        let index = generate_index(10_000);
        group.bench_with_input(
            BenchmarkId::from_parameter(position),
            &index,
            |b, index| {
                b.iter(|| {
                    let mut index = index.clone();
                    let features =
                        resolve_features(&mut index, position, MessageRecord::is_context_candidate);
                    black_box(features)
                });
            },
        );
    }
    group.finish();
}

fn bench_detect(c: &mut Criterion) {
    let telegram = generate_telegram_json(1_000);
    let whatsapp = generate_whatsapp_txt(1_000);

    c.bench_function("detect_telegram", |b| {
        b.iter(|| black_box(detect_platform(black_box(&telegram))))
    });
    c.bench_function("detect_whatsapp", |b| {
        b.iter(|| black_box(detect_platform(black_box(&whatsapp))))
    });
}

// =============================================================================
// End-to-End Pipeline Benchmark
// =============================================================================

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    let config = ParseConfig::default();

    for size in [1_000_usize, 10_000] {
        let files = vec![
            ("result.json".to_string(), generate_telegram_json(size)),
            ("chat.txt".to_string(), generate_whatsapp_txt(size)),
            ("signal.md".to_string(), generate_signal_md(size)),
        ];
        group.throughput(Throughput::Elements(3 * size as u64));

        group.bench_with_input(BenchmarkId::new("sequential", size), &files, |b, files| {
            b.iter(|| {
                // Full pipeline: detect -> parse -> merge -> serialize
                let output = merge(files.iter().map(|(n, t)| (n.as_str(), t.as_str())), &config);
                black_box(to_geojson(&output.geojson, false).unwrap())
            });
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &files, |b, files| {
            b.iter(|| {
                let output = merge_parallel(files.as_slice(), &config);
                black_box(to_geojson(&output.geojson, false).unwrap())
            });
        });
    }
    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_telegram_parsing,
    bench_whatsapp_parsing,
    bench_signal_parsing,
    bench_resolve_features,
    bench_detect,
    bench_full_pipeline,
);

criterion_main!(benches);
