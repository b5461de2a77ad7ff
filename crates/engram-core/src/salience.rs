//! Salience
//!
//! How much does a probe attribute matter to the value a blend just
//! produced? Differentiating the blended value `BV = Σ p_i·v_i` with
//! respect to the probe attribute `a` at target value `y` gives
//!
//! ```text
//! ∂BV/∂a = Σ_i p_i·v_i·(d_i − Σ_j p_j·d_j)
//! d_i = μ·ω_a·(∂ξ_a/∂x)(y, chunk_i.a)
//! ```
//!
//! The probabilities and outcome values come from the activation-history
//! trace of the most recent blend; the derivatives from the similarity
//! registry. The derivative is undefined where the target equals a
//! chunk's value, resolved by the memory's salience-fallback policy.

use crate::error::{MemoryError, Result};
use crate::memory::Memory;
use crate::params::SalienceFallback;
use crate::value::Value;

impl Memory {
	/// The salience of probe attribute `attribute` at `target`: the
	/// partial derivative of the most recent blend's value with respect
	/// to that attribute of the probe.
	///
	/// Requires partial matching (a mismatch penalty), an attached
	/// derivative for the attribute, and an activation-history trace of
	/// the blend being differentiated.
	pub fn salience(&mut self, attribute: &str, target: impl Into<Value>) -> Result<f64> {
		let target = target.into();
		if !target.is_well_formed() {
			return Err(MemoryError::InvalidParameter(
				"the salience target must be finite".to_owned(),
			));
		}
		let Some(mismatch) = self.params.mismatch else {
			return Err(MemoryError::InvalidParameter(
				"salience requires partial matching; set the mismatch penalty".to_owned(),
			));
		};
		if !self.recorder.is_enabled() {
			return Err(MemoryError::TraceRequired);
		}
		let Some(span) = self.recorder.last_blend().cloned() else {
			return Err(MemoryError::TraceRequired);
		};

		let mut rows: Vec<(f64, f64, Value)> = Vec::with_capacity(span.len);
		for record in &self.recorder.records()[span.start..span.start + span.len] {
			let Some(probability) = record.retrieval_probability else {
				continue;
			};
			let Some(outcome) = record
				.attributes
				.get(&span.output)
				.and_then(Value::as_number)
			else {
				continue;
			};
			let Some(value) = record.attributes.get(attribute).cloned() else {
				return Err(MemoryError::UnknownAttribute(attribute.to_owned()));
			};
			rows.push((probability, outcome, value));
		}
		if rows.is_empty() {
			return Ok(0.0);
		}

		let weight = self.registry.weight(attribute);
		let fallback = self.params.salience_fallback;
		let mut derivatives = Vec::with_capacity(rows.len());
		for (_, _, value) in &rows {
			let raw = match self.registry.derivative(attribute, &target, value)? {
				Some(d) => d,
				None => match fallback {
					SalienceFallback::Zero => 0.0,
					SalienceFallback::Error => {
						return Err(MemoryError::UndefinedDerivative(format!(
							"the derivative for {attribute:?} is undefined at the target \
							 {target}, which equals a candidate's value"
						)));
					}
				},
			};
			derivatives.push(raw * mismatch * weight);
		}

		let mean_derivative: f64 = rows
			.iter()
			.zip(&derivatives)
			.map(|((probability, _, _), d)| probability * d)
			.sum();
		Ok(rows
			.iter()
			.zip(&derivatives)
			.map(|((probability, outcome, _), d)| probability * outcome * (d - mean_derivative))
			.sum())
	}
}
