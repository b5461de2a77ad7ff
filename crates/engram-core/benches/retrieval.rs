//! Benchmarks for the retrieval and blending pipeline
//!
//! Tests performance of:
//! - Exact retrieval over growing stores, with and without the index
//! - Partial-matching retrieval through the similarity cache
//! - Blending over the full candidate set

#![allow(clippy::expect_used)] // Fine in benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use engram_core::{attrs, Memory, Parameters, Similarity};

const KINDS: usize = 10;

fn populated(chunks: usize, index: bool) -> Memory {
	let mut memory = Memory::with_parameters(Parameters {
		noise: 0.0,
		temperature: Some(1.0),
		seed: Some(1),
		index: if index { vec!["kind".to_owned()] } else { Vec::new() },
		..Parameters::default()
	})
	.expect("valid parameters");
	for i in 0..chunks {
		let _ = memory
			.learn_and_advance(
				attrs! {
					"kind" => (i % KINDS) as i64,
					"payload" => i as i64,
					"outcome" => (i % 7) as i64,
				},
				1.0,
			)
			.expect("learnable chunk");
	}
	memory
}

fn bench_exact_retrieve(c: &mut Criterion) {
	let mut group = c.benchmark_group("exact_retrieve");

	for chunks in &[100usize, 1000, 5000] {
		for (label, indexed) in [("scan", false), ("indexed", true)] {
			let mut memory = populated(*chunks, indexed);
			let probe = attrs! { "kind" => 3 };
			let _ = group.throughput(Throughput::Elements(*chunks as u64));
			let _ = group.bench_with_input(
				BenchmarkId::new(label, chunks),
				chunks,
				|bench, _| {
					bench.iter(|| memory.retrieve(black_box(&probe)).expect("retrieves"));
				},
			);
		}
	}

	group.finish();
}

fn bench_partial_retrieve(c: &mut Criterion) {
	let mut group = c.benchmark_group("partial_retrieve");

	for chunks in &[100usize, 1000, 5000] {
		let mut memory = populated(*chunks, false);
		memory.set_mismatch(Some(1.0)).expect("valid mismatch");
		memory
			.similarity(
				&["kind"],
				&Similarity::numeric(|x, y| 1.0 - (x - y).abs() / KINDS as f64),
				1.0,
			)
			.expect("valid similarity");
		let probe = attrs! { "kind" => 3.5 };
		let _ = group.throughput(Throughput::Elements(*chunks as u64));
		let _ = group.bench_with_input(BenchmarkId::new("chunks", chunks), chunks, |bench, _| {
			bench.iter(|| memory.retrieve(black_box(&probe)).expect("retrieves"));
		});
	}

	group.finish();
}

fn bench_blend(c: &mut Criterion) {
	let mut group = c.benchmark_group("blend");

	for chunks in &[100usize, 1000, 5000] {
		let mut memory = populated(*chunks, false);
		let probe = attrs! { "kind" => 3 };
		let _ = group.throughput(Throughput::Elements(*chunks as u64));
		let _ = group.bench_with_input(BenchmarkId::new("chunks", chunks), chunks, |bench, _| {
			bench.iter(|| memory.blend("outcome", black_box(&probe)).expect("blends"));
		});
	}

	group.finish();
}

criterion_group!(benches, bench_exact_retrieve, bench_partial_retrieve, bench_blend);

criterion_main!(benches);
