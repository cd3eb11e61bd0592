//! Encoder benchmarks
//!
//! Parsing is linear in trace length; centrality is dominated by the per-node
//! BFS passes and the dense eigen solve, so graph size is varied separately.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use stracegraph::call_graph::CallGraph;
use stracegraph::centrality::CentralityScores;
use stracegraph::config::EncoderConfig;
use stracegraph::encode_calls;
use stracegraph::trace_reader::parse_trace;

/// Deterministic pseudo-random trace over `distinct` call names
fn synthetic_calls(len: usize, distinct: usize) -> Vec<String> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            format!("call_{}", state as usize % distinct)
        })
        .collect()
}

fn synthetic_text(len: usize) -> String {
    synthetic_calls(len, 32)
        .iter()
        .map(|name| format!("{}(3, \"...\", 4096) = 4096\n", name))
        .collect()
}

fn config() -> EncoderConfig {
    EncoderConfig::builtin().expect("builtin config")
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_trace");
    let sets = config().syscalls;

    for len in [1_000usize, 10_000, 100_000].iter() {
        let text = synthetic_text(*len);
        group.throughput(Throughput::Elements(*len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| parse_trace(black_box(text), false, &sets));
        });
    }

    group.finish();
}

fn bench_graph_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_build");
    let sets = config().syscalls;

    for len in [1_000usize, 10_000, 100_000].iter() {
        let calls = synthetic_calls(*len, 64);
        group.throughput(Throughput::Elements(*len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &calls, |b, calls| {
            b.iter(|| CallGraph::from_calls(black_box(calls), &sets));
        });
    }

    group.finish();
}

fn bench_centrality(c: &mut Criterion) {
    let mut group = c.benchmark_group("centrality");
    group.measurement_time(Duration::from_secs(10));
    let len = 20_000;

    for distinct in [16usize, 64, 256].iter() {
        let config = config();
        let calls = synthetic_calls(len, *distinct);
        let graph = CallGraph::from_calls(&calls, &config.syscalls).expect("graph");
        group.bench_with_input(BenchmarkId::from_parameter(distinct), &graph, |b, graph| {
            b.iter(|| CentralityScores::compute(black_box(graph), &config.centrality));
        });
    }

    group.finish();
}

fn bench_encode_end_to_end(c: &mut Criterion) {
    let len = 10_000;
    let config = config();
    let calls = synthetic_calls(len, 48);

    c.bench_function("encode_calls_10k", |b| {
        b.iter(|| encode_calls(black_box(&calls), &config));
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_graph_build,
    bench_centrality,
    bench_encode_end_to_end
);
criterion_main!(benches);
