//! Activation Mathematics
//!
//! The quantities that decide what memory surfaces. For chunk i,
//!
//! ```text
//! A_i = B_i + ε_i + P_i
//! ```
//!
//! 1. **Base level** (recency/frequency): `B = ln[Σ(t − t_j)^(−d)]`
//! 2. **Noise**: ε ~ Logistic(0, σ)
//! 3. **Partial match**: `P = μ·Σ ω_k(S_k − 1)`
//!
//! This module holds the pure functions; the retrieval engine assembles
//! them per candidate. Base level comes in three forms matching how much
//! of the reinforcement history was retained: exact, count-approximated,
//! or a hybrid of the two.

use crate::params::ZeroAge;
use rand::Rng;

/// Exact base-level activation from the full reinforcement history.
///
/// `B = ln Σ_j (now − t_j)^(−d)`
///
/// Zero-age references are singular and resolved by `zero_age`: skipped,
/// or floored to a small positive age. If no term survives the result is
/// −∞ and the chunk cannot win a retrieval.
#[must_use]
pub fn base_level_exact(references: &[f64], now: f64, decay: f64, zero_age: ZeroAge) -> f64 {
	let sum: f64 = references
		.iter()
		.filter_map(|&t| age_term(now - t, zero_age))
		.map(|age| age.powf(-decay))
		.sum();
	if sum > 0.0 {
		sum.ln()
	} else {
		f64::NEG_INFINITY
	}
}

/// Approximate base-level activation from a reference count alone.
///
/// `B = ln(n / (1 − d)) − d·ln(now − first)`
///
/// Valid only for decay < 1, which parameter validation guarantees
/// before this is reached. A zero lifetime is resolved by `zero_age`
/// like a zero-age reference.
#[must_use]
pub fn base_level_approximate(
	count: u64,
	first: f64,
	now: f64,
	decay: f64,
	zero_age: ZeroAge,
) -> f64 {
	if count == 0 {
		return f64::NEG_INFINITY;
	}
	let Some(lifetime) = age_term(now - first, zero_age) else {
		return f64::NEG_INFINITY;
	};
	#[allow(clippy::cast_precision_loss)]
	let n = count as f64;
	n.ln() - (1.0 - decay).ln() - decay * lifetime.ln()
}

/// Hybrid base-level activation: exact over the retained `recent`
/// references, with the `count − recent.len()` older ones treated as
/// uniformly distributed between the first reference and the oldest
/// retained one:
///
/// `Σ_old ≈ (n_old)·[(now − first)^(1−d) − (now − t_k)^(1−d)]
///           / [(1 − d)·(t_k − first)]`
///
/// where `t_k` is the oldest retained reference. Valid only for
/// decay < 1.
#[must_use]
pub fn base_level_hybrid(
	recent: &[f64],
	count: u64,
	first: f64,
	now: f64,
	decay: f64,
	zero_age: ZeroAge,
) -> f64 {
	let mut sum: f64 = recent
		.iter()
		.filter_map(|&t| age_term(now - t, zero_age))
		.map(|age| age.powf(-decay))
		.sum();
	let older = count.saturating_sub(recent.len() as u64);
	if older > 0 {
		#[allow(clippy::cast_precision_loss)]
		let n_old = older as f64;
		let oldest_retained = recent.first().copied().unwrap_or(first);
		let span = oldest_retained - first;
		if span > 0.0 {
			let whole = now - first;
			let tail = now - oldest_retained;
			sum += n_old * (whole.powf(1.0 - decay) - tail.powf(1.0 - decay))
				/ ((1.0 - decay) * span);
		} else if let Some(age) = age_term(now - first, zero_age) {
			sum += n_old * age.powf(-decay);
		}
	}
	if sum > 0.0 {
		sum.ln()
	} else {
		f64::NEG_INFINITY
	}
}

fn age_term(age: f64, zero_age: ZeroAge) -> Option<f64> {
	if age > 0.0 {
		Some(age)
	} else {
		match zero_age {
			ZeroAge::Skip => None,
			ZeroAge::Floor(epsilon) => Some(epsilon),
		}
	}
}

/// Draws one logistic noise sample with the given scale, by inverting
/// the logistic CDF over a uniform draw:
///
/// `ε = σ·ln(u / (1 − u))`
///
/// A zero scale returns exactly zero without consuming randomness.
#[must_use]
pub fn logistic_noise<R: Rng>(rng: &mut R, scale: f64) -> f64 {
	if scale == 0.0 {
		return 0.0;
	}
	let mut u: f64 = rng.gen();
	while u <= 0.0 {
		u = rng.gen();
	}
	scale * (u / (1.0 - u)).ln()
}

/// Softmax weight of one activation under the blending temperature.
///
/// `w = exp(A / τ)`
#[must_use]
pub fn blending_weight(activation: f64, temperature: f64) -> f64 {
	(activation / temperature).exp()
}

/// Blended activation of a cohort from the sum of its softmax weights.
///
/// `BA = τ·ln Σ exp(A_i / τ)`
#[must_use]
pub fn blended_activation(weight_sum: f64, temperature: f64) -> f64 {
	temperature * weight_sum.ln()
}
