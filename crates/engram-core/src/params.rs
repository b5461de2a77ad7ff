//! Memory Parameters
//!
//! The knobs that shape retrieval:
//!
//! - `noise` σ — scale of the logistic activation noise
//! - `decay` d — base-level decay exponent (`None` disables base level)
//! - `temperature` τ — blending softmax scale (`None` derives σ·√2)
//! - `mismatch` μ — partial-matching penalty (`None` means exact only)
//! - `threshold` — activation floor for retrieval (`None` disables)
//! - `optimized_learning` — full, counted, or k-most-recent histories
//!
//! Defaults follow the classic ACT-R fits: σ = 0.25, d = 0.5,
//! threshold = −10.

use crate::error::{MemoryError, Result};
use serde::{Deserialize, Serialize};

/// Default activation-noise scale.
pub const DEFAULT_NOISE: f64 = 0.25;

/// Default base-level decay exponent.
pub const DEFAULT_DECAY: f64 = 0.5;

/// Default retrieval threshold.
pub const DEFAULT_THRESHOLD: f64 = -10.0;

/// Smallest usable blending temperature; anything lower overflows the
/// softmax weights.
pub const MINIMUM_TEMPERATURE: f64 = 0.01;

/// How reinforcement histories are stored and base-level activation is
/// computed from them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizedLearning {
	/// Keep every reinforcement timestamp; compute the exact base level.
	#[default]
	Off,
	/// Keep only the first-reinforcement time and a count; approximate.
	/// Requires decay < 1.
	On,
	/// Keep the k most recent timestamps exactly and approximate the
	/// older ones. Requires decay < 1.
	Recent(usize),
}

/// Policy for base-level terms whose reinforcement age is zero, where
/// `(t - t_j)^-d` is singular.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ZeroAge {
	/// Drop the singular terms. A chunk with only zero-age references
	/// gets a base level of −∞ and cannot win a retrieval.
	#[default]
	Skip,
	/// Substitute the given small positive age for zero.
	Floor(f64),
}

/// Policy for a salience derivative probed where the similarity
/// derivative is undefined (target equals the chunk's value).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalienceFallback {
	/// Surface [`MemoryError::UndefinedDerivative`].
	#[default]
	Error,
	/// Use zero, the average of the one-sided derivatives for the
	/// absolute-difference similarity families.
	Zero,
}

/// The full parameter block of a [`Memory`](crate::Memory).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Parameters {
	/// Logistic activation-noise scale σ ≥ 0.
	pub noise: f64,
	/// Base-level decay exponent d ≥ 0, or `None` to disable base-level
	/// activation entirely (different from 0, which disables only decay).
	pub decay: Option<f64>,
	/// Blending temperature τ ≥ [`MINIMUM_TEMPERATURE`], or `None` to
	/// derive σ·√2 at blend time.
	pub temperature: Option<f64>,
	/// Mismatch penalty μ ≥ 0, or `None` for exact matching only.
	pub mismatch: Option<f64>,
	/// Minimum activation for a successful retrieval, or `None` for no
	/// floor.
	pub threshold: Option<f64>,
	/// Reinforcement-history representation.
	pub optimized_learning: OptimizedLearning,
	/// When true, similarity functions follow the traditional ACT-R
	/// scale [−1, 0] instead of the natural [0, 1].
	pub use_actr_similarity: bool,
	/// Policy for zero-age base-level terms.
	pub zero_age: ZeroAge,
	/// Policy for undefined salience derivatives.
	pub salience_fallback: SalienceFallback,
	/// Seed for the per-memory random number generator; `None` seeds
	/// from entropy.
	pub seed: Option<u64>,
	/// Attribute names maintained in the secondary retrieval index.
	pub index: Vec<String>,
}

impl Default for Parameters {
	fn default() -> Self {
		Self {
			noise: DEFAULT_NOISE,
			decay: Some(DEFAULT_DECAY),
			temperature: None,
			mismatch: None,
			threshold: Some(DEFAULT_THRESHOLD),
			optimized_learning: OptimizedLearning::default(),
			use_actr_similarity: false,
			zero_age: ZeroAge::default(),
			salience_fallback: SalienceFallback::default(),
			seed: None,
			index: Vec::new(),
		}
	}
}

impl Parameters {
	/// Checks every parameter against its domain.
	pub fn validate(&self) -> Result<()> {
		validate_noise(self.noise)?;
		validate_decay(self.decay, self.optimized_learning)?;
		validate_temperature(self.temperature)?;
		validate_mismatch(self.mismatch)?;
		validate_threshold(self.threshold)?;
		validate_optimized_learning(self.optimized_learning)?;
		validate_zero_age(self.zero_age)?;
		Ok(())
	}

	/// Resolves the effective blending temperature: the explicit τ, or
	/// σ·√2 when unset. Fails when the resolved value is too small to
	/// divide activations by.
	pub fn blending_temperature(&self) -> Result<f64> {
		let resolved = self
			.temperature
			.unwrap_or_else(|| self.noise * std::f64::consts::SQRT_2);
		if resolved < MINIMUM_TEMPERATURE {
			return Err(MemoryError::InvalidParameter(format!(
				"blending temperature {resolved} is below the minimum {MINIMUM_TEMPERATURE}; \
				 set an explicit temperature or raise the noise"
			)));
		}
		Ok(resolved)
	}
}

pub(crate) fn validate_noise(noise: f64) -> Result<()> {
	if !noise.is_finite() || noise < 0.0 {
		return Err(MemoryError::InvalidParameter(format!(
			"the noise, {noise}, must be a non-negative real"
		)));
	}
	Ok(())
}

pub(crate) fn validate_decay(decay: Option<f64>, learning: OptimizedLearning) -> Result<()> {
	let Some(d) = decay else { return Ok(()) };
	if !d.is_finite() || d < 0.0 {
		return Err(MemoryError::InvalidParameter(format!(
			"the decay, {d}, must be a non-negative real"
		)));
	}
	if d >= 1.0 && learning != OptimizedLearning::Off {
		return Err(MemoryError::InvalidParameter(format!(
			"the decay, {d}, must be less than one when optimized learning is enabled"
		)));
	}
	Ok(())
}

pub(crate) fn validate_temperature(temperature: Option<f64>) -> Result<()> {
	let Some(t) = temperature else { return Ok(()) };
	if !t.is_finite() || t < MINIMUM_TEMPERATURE {
		return Err(MemoryError::InvalidParameter(format!(
			"the temperature, {t}, must not be less than {MINIMUM_TEMPERATURE}"
		)));
	}
	Ok(())
}

pub(crate) fn validate_mismatch(mismatch: Option<f64>) -> Result<()> {
	let Some(m) = mismatch else { return Ok(()) };
	if !m.is_finite() || m < 0.0 {
		return Err(MemoryError::InvalidParameter(format!(
			"the mismatch penalty, {m}, must be a non-negative real"
		)));
	}
	Ok(())
}

pub(crate) fn validate_threshold(threshold: Option<f64>) -> Result<()> {
	let Some(t) = threshold else { return Ok(()) };
	if t.is_nan() {
		return Err(MemoryError::InvalidParameter(
			"the threshold must be a real number".to_owned(),
		));
	}
	Ok(())
}

pub(crate) fn validate_optimized_learning(learning: OptimizedLearning) -> Result<()> {
	if learning == OptimizedLearning::Recent(0) {
		return Err(MemoryError::InvalidParameter(
			"optimized learning must retain at least one recent reference; use Off instead"
				.to_owned(),
		));
	}
	Ok(())
}

pub(crate) fn validate_zero_age(zero_age: ZeroAge) -> Result<()> {
	if let ZeroAge::Floor(epsilon) = zero_age {
		if !epsilon.is_finite() || epsilon <= 0.0 {
			return Err(MemoryError::InvalidParameter(format!(
				"the zero-age floor, {epsilon}, must be a positive real"
			)));
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let params = Parameters::default();
		assert!(params.validate().is_ok());
		assert!((params.noise - 0.25).abs() < 1e-12);
		assert_eq!(params.decay, Some(0.5));
		assert_eq!(params.threshold, Some(-10.0));
		assert_eq!(params.mismatch, None);
		assert_eq!(params.optimized_learning, OptimizedLearning::Off);
	}

	#[test]
	fn test_derived_temperature() {
		let params = Parameters::default();
		let t = params.blending_temperature().unwrap();
		assert!((t - 0.353_553_4).abs() < 1e-6);
	}

	#[test]
	fn test_temperature_too_low() {
		let params = Parameters {
			noise: 0.0,
			..Parameters::default()
		};
		assert!(params.blending_temperature().is_err());

		let params = Parameters {
			temperature: Some(0.0001),
			..Parameters::default()
		};
		assert!(params.validate().is_err());
	}

	#[test]
	fn test_domains() {
		assert!(validate_noise(-1.0).is_err());
		assert!(validate_decay(Some(-0.5), OptimizedLearning::Off).is_err());
		assert!(validate_decay(Some(5.0), OptimizedLearning::Off).is_ok());
		assert!(validate_decay(Some(1.0), OptimizedLearning::On).is_err());
		assert!(validate_decay(Some(1.0), OptimizedLearning::Recent(4)).is_err());
		assert!(validate_decay(None, OptimizedLearning::On).is_ok());
		assert!(validate_mismatch(Some(-0.1)).is_err());
		assert!(validate_optimized_learning(OptimizedLearning::Recent(0)).is_err());
		assert!(validate_zero_age(ZeroAge::Floor(0.0)).is_err());
		assert!(validate_zero_age(ZeroAge::Floor(0.001)).is_ok());
	}
}
