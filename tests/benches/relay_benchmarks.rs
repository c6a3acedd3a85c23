//! # Rendezvous Relay Benchmarks
//!
//! Hot paths on every inbound frame and every join/leave:
//!
//! | Path | Work |
//! |------|------|
//! | Registry lookup | one read lock, one channel clone |
//! | Registry snapshot | one read lock, copy of every identity |
//! | Envelope routing | parse, strip routing fields, re-encode with `src` |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rv_01_session_registry::{SessionId, SessionRegistry};
use rv_02_signal_relay::RoutedEnvelope;
use serde_json::json;

fn populated_registry(size: usize) -> SessionRegistry<u64> {
    let registry = SessionRegistry::new();
    for n in 0..size {
        registry.add(registry.new_identity(), n as u64);
    }
    registry
}

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("session-registry");

    group.bench_function("new_identity", |b| {
        let registry = SessionRegistry::<u64>::new();
        b.iter(|| black_box(registry.new_identity()))
    });

    for size in [10, 100, 1_000, 10_000] {
        let registry = populated_registry(size);
        let probe = SessionId::from((size / 2).max(1).to_string());

        group.bench_with_input(BenchmarkId::new("get", size), &size, |b, _| {
            b.iter(|| black_box(registry.get(&probe)))
        });

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("list", size), &size, |b, _| {
            b.iter(|| black_box(registry.list()))
        });
    }

    group.finish();
}

fn bench_envelope_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope-routing");
    let src = SessionId::from("1");

    for sdp_len in [128, 2_048, 16_384] {
        let text = json!({
            "type": "offer",
            "target": "2",
            "offer": {"type": "offer", "sdp": "a".repeat(sdp_len)}
        })
        .to_string();

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_and_forward", sdp_len), &text, |b, text| {
            b.iter(|| {
                let routed = RoutedEnvelope::parse(black_box(text)).unwrap();
                black_box(routed.into_forward(src.clone()).encode())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_registry, bench_envelope_routing);
criterion_main!(benches);
