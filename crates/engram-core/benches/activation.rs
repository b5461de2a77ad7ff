//! Benchmarks for the activation mathematics
//!
//! Tests performance of:
//! - Base-level activation over growing reinforcement histories
//! - The approximate and hybrid base-level forms
//! - Logistic noise sampling
//! - Softmax weight computation

#![allow(clippy::expect_used)] // Fine in benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use engram_core::activation::{
	base_level_approximate, base_level_exact, base_level_hybrid, blending_weight, logistic_noise,
};
use engram_core::ZeroAge;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate a plausible reinforcement history ending before `now`.
fn generate_references(count: usize, now: f64) -> Vec<f64> {
	let mut rng = StdRng::seed_from_u64(42);
	let mut references: Vec<f64> = (0..count).map(|_| rng.gen::<f64>() * (now - 1.0)).collect();
	references.sort_by(f64::total_cmp);
	references
}

fn bench_base_level_exact(c: &mut Criterion) {
	let mut group = c.benchmark_group("base_level_exact");
	let now = 10_000.0;

	for count in &[5usize, 10, 50, 100, 1000] {
		let references = generate_references(*count, now);
		let _ = group.throughput(Throughput::Elements(*count as u64));
		let _ = group.bench_with_input(BenchmarkId::new("references", count), count, |bench, _| {
			bench.iter(|| {
				base_level_exact(black_box(&references), black_box(now), 0.5, ZeroAge::Skip)
			});
		});
	}

	group.finish();
}

fn bench_base_level_approximations(c: &mut Criterion) {
	let mut group = c.benchmark_group("base_level_approximations");
	let now = 10_000.0;
	let references = generate_references(1000, now);

	let _ = group.bench_function("counted", |bench| {
		bench.iter(|| {
			base_level_approximate(black_box(1000), black_box(0.5), black_box(now), 0.5, ZeroAge::Skip)
		});
	});

	for keep in &[4usize, 16, 64] {
		let recent = &references[references.len() - keep..];
		let _ = group.bench_with_input(BenchmarkId::new("hybrid", keep), keep, |bench, _| {
			bench.iter(|| {
				base_level_hybrid(
					black_box(recent),
					1000,
					black_box(references[0]),
					black_box(now),
					0.5,
					ZeroAge::Skip,
				)
			});
		});
	}

	group.finish();
}

fn bench_logistic_noise(c: &mut Criterion) {
	let mut group = c.benchmark_group("logistic_noise");
	let mut rng = StdRng::seed_from_u64(7);

	let _ = group.throughput(Throughput::Elements(1));
	let _ = group.bench_function("sample", |bench| {
		bench.iter(|| logistic_noise(black_box(&mut rng), black_box(0.25)));
	});

	group.finish();
}

fn bench_blending_weights(c: &mut Criterion) {
	let mut group = c.benchmark_group("blending_weights");

	for count in &[100usize, 1000, 10_000] {
		let mut rng = StdRng::seed_from_u64(11);
		let activations: Vec<f64> = (0..*count).map(|_| rng.gen::<f64>().mul_add(5.0, -2.0)).collect();

		let _ = group.throughput(Throughput::Elements(*count as u64));
		let _ = group.bench_with_input(BenchmarkId::new("candidates", count), count, |bench, _| {
			bench.iter(|| {
				activations
					.iter()
					.map(|a| blending_weight(black_box(*a), 0.35))
					.sum::<f64>()
			});
		});
	}

	group.finish();
}

criterion_group!(
	benches,
	bench_base_level_exact,
	bench_base_level_approximations,
	bench_logistic_noise,
	bench_blending_weights,
);

criterion_main!(benches);
