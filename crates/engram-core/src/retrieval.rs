//! Retrieval and Blending
//!
//! The complete pipeline, one pass per operation:
//!
//! 1. Validate parameters
//! 2. Enumerate candidates (through the index where possible)
//! 3. Filter on exact-match attributes
//! 4. Compute each survivor's activation `A = B + ε + P`
//! 5. Cull below the threshold
//! 6. Select (retrieve) or aggregate (blend)
//! 7. Append to the history, rehearse on success
//!
//! Blending turns activations into softmax weights `exp(A/τ)` and
//! averages the outcome attribute under them; `discrete_blend` compares
//! whole sub-cohorts by blended activation, and `best_blend` runs one
//! blend per choice and keeps the best.

use crate::activation::blending_weight;
use crate::chunk::{Chunk, ChunkId};
use crate::error::{MemoryError, Result};
use crate::history::HistoryRecord;
use crate::memory::{validate_probe, Memory};
use crate::value::{Attributes, Value};
use rand::Rng;
use smallvec::SmallVec;
use tracing::trace;

/// One scored candidate, with its history record when tracing.
struct Candidate {
	id: ChunkId,
	activation: f64,
	record: Option<usize>,
}

impl Memory {
	// ========================================================================
	// Retrieval
	// ========================================================================

	/// Returns the matching chunk with the highest activation at or
	/// above the threshold, or `None` when nothing matches. Ties break
	/// uniformly at random.
	pub fn retrieve(&mut self, probe: &Attributes) -> Result<Option<&Chunk>> {
		let id = self.retrieve_id(probe, false)?;
		Ok(id.and_then(|id| self.store.get(id)))
	}

	/// [`retrieve`](Self::retrieve), additionally reinforcing the chosen
	/// chunk at the current time. Nothing is reinforced when nothing is
	/// retrieved.
	pub fn retrieve_rehearsing(&mut self, probe: &Attributes) -> Result<Option<&Chunk>> {
		let id = self.retrieve_id(probe, true)?;
		Ok(id.and_then(|id| self.store.get(id)))
	}

	fn retrieve_id(&mut self, probe: &Attributes, rehearse: bool) -> Result<Option<ChunkId>> {
		let mark = self.recorder.begin_blend();
		let candidates = match self.score_candidates(probe) {
			Ok(candidates) => candidates,
			Err(error) => {
				self.recorder.truncate(mark);
				return Err(error);
			}
		};
		let Some(best) = candidates
			.iter()
			.map(|c| c.activation)
			.max_by(f64::total_cmp)
		else {
			return Ok(None);
		};
		let ties: SmallVec<[ChunkId; 4]> = candidates
			.iter()
			.filter(|c| c.activation == best)
			.map(|c| c.id)
			.collect();
		let chosen = if ties.len() == 1 {
			ties[0]
		} else {
			ties[self.rng.gen_range(0..ties.len())]
		};
		if rehearse {
			self.cite(chosen);
		}
		trace!(chunk = %chosen, activation = best, "retrieved");
		Ok(Some(chosen))
	}

	// ========================================================================
	// Blending
	// ========================================================================

	/// Returns the probability-weighted average of `output` over the
	/// chunks matching the probe, or `None` when no eligible chunk
	/// carries `output`. Chunks carrying a non-numeric `output` are an
	/// error; a probe matching chunks of which none carries `output` is
	/// an error too.
	pub fn blend(&mut self, output: &str, probe: &Attributes) -> Result<Option<f64>> {
		let temperature = self.params.blending_temperature()?;
		let mark = self.recorder.begin_blend();
		let result = self.blend_inner(output, probe, temperature);
		match result {
			Ok(value) => {
				self.recorder.end_blend(mark, output);
				Ok(value)
			}
			Err(error) => {
				self.recorder.truncate(mark);
				Err(error)
			}
		}
	}

	fn blend_inner(
		&mut self,
		output: &str,
		probe: &Attributes,
		temperature: f64,
	) -> Result<Option<f64>> {
		let candidates = self.score_candidates(probe)?;
		if candidates.is_empty() {
			return Ok(None);
		}
		let mut participating: Vec<(Candidate, f64)> = Vec::with_capacity(candidates.len());
		for candidate in candidates {
			let Some(chunk) = self.store.get(candidate.id) else {
				continue;
			};
			match chunk.get(output) {
				None => {}
				Some(Value::Number(outcome)) => {
					let outcome = *outcome;
					participating.push((candidate, outcome));
				}
				Some(_) => {
					return Err(MemoryError::NonNumericBlend {
						attribute: output.to_owned(),
						chunk: chunk.name(),
					});
				}
			}
		}
		if participating.is_empty() {
			return Err(MemoryError::UnknownAttribute(output.to_owned()));
		}
		let mut weight_sum = 0.0;
		let mut weighted_outcomes = 0.0;
		let mut weights: Vec<f64> = Vec::with_capacity(participating.len());
		for (candidate, outcome) in &participating {
			let weight = blending_weight(candidate.activation, temperature);
			weight_sum += weight;
			weighted_outcomes += weight * outcome;
			weights.push(weight);
		}
		if weight_sum <= 0.0 || !weight_sum.is_finite() {
			return Ok(None);
		}
		for ((candidate, _), weight) in participating.iter().zip(weights) {
			self.recorder
				.stamp_probability(candidate.record, weight / weight_sum);
		}
		let blended = weighted_outcomes / weight_sum;
		trace!(output, blended, "blended");
		Ok(Some(blended))
	}

	/// Returns the value of `output`, among those of the chunks matching
	/// the probe, whose sub-cohort achieves the highest blended
	/// activation `τ·ln Σ exp(A/τ)` — equivalently, the value carrying
	/// the largest share of retrieval probability. Ties break uniformly
	/// at random.
	pub fn discrete_blend(&mut self, output: &str, probe: &Attributes) -> Result<Option<Value>> {
		let temperature = self.params.blending_temperature()?;
		let mark = self.recorder.begin_blend();
		let result = self.discrete_blend_inner(output, probe, temperature);
		if result.is_err() {
			self.recorder.truncate(mark);
		}
		result
	}

	fn discrete_blend_inner(
		&mut self,
		output: &str,
		probe: &Attributes,
		temperature: f64,
	) -> Result<Option<Value>> {
		let candidates = self.score_candidates(probe)?;
		if candidates.is_empty() {
			return Ok(None);
		}
		let mut cohorts: Vec<(Value, f64)> = Vec::new();
		let mut weighted: Vec<(Candidate, f64)> = Vec::with_capacity(candidates.len());
		for candidate in candidates {
			let Some(chunk) = self.store.get(candidate.id) else {
				continue;
			};
			let Some(value) = chunk.get(output).cloned() else {
				continue;
			};
			let weight = blending_weight(candidate.activation, temperature);
			match cohorts.iter_mut().find(|(v, _)| *v == value) {
				Some((_, sum)) => *sum += weight,
				None => cohorts.push((value, weight)),
			}
			weighted.push((candidate, weight));
		}
		if cohorts.is_empty() {
			return Err(MemoryError::UnknownAttribute(output.to_owned()));
		}
		let weight_sum: f64 = weighted.iter().map(|(_, w)| w).sum();
		if weight_sum > 0.0 && weight_sum.is_finite() {
			for (candidate, weight) in &weighted {
				self.recorder
					.stamp_probability(candidate.record, weight / weight_sum);
			}
		}
		let best = cohorts
			.iter()
			.map(|(_, sum)| *sum)
			.max_by(f64::total_cmp)
			.unwrap_or(0.0);
		let ties: Vec<&Value> = cohorts
			.iter()
			.filter(|(_, sum)| *sum == best)
			.map(|(value, _)| value)
			.collect();
		let chosen = if ties.len() == 1 {
			ties[0].clone()
		} else {
			ties[self.rng.gen_range(0..ties.len())].clone()
		};
		Ok(Some(chosen))
	}

	/// Blends `output` once per choice, with `choice_attribute` bound to
	/// that choice on top of the probe, and returns the choice with the
	/// largest blended value together with that value. Choices matching
	/// no eligible chunk are skipped; ties break uniformly at random.
	pub fn best_blend<C: Into<Value>>(
		&mut self,
		output: &str,
		choices: impl IntoIterator<Item = C>,
		choice_attribute: &str,
		probe: &Attributes,
	) -> Result<Option<(Value, f64)>> {
		let mut best: Option<f64> = None;
		let mut ties: Vec<Value> = Vec::new();
		for choice in choices {
			let choice = choice.into();
			let mut merged = probe.clone();
			let _ = merged.insert(choice_attribute, choice.clone());
			let Some(blended) = self.blend(output, &merged)? else {
				continue;
			};
			match best {
				Some(value) if blended == value => ties.push(choice),
				Some(value) if blended > value => {
					best = Some(blended);
					ties = vec![choice];
				}
				Some(_) => {}
				None => {
					best = Some(blended);
					ties = vec![choice];
				}
			}
		}
		let Some(value) = best else {
			return Ok(None);
		};
		let chosen = if ties.len() == 1 {
			ties.swap_remove(0)
		} else {
			let i = self.rng.gen_range(0..ties.len());
			ties.swap_remove(i)
		};
		Ok(Some((chosen, value)))
	}

	// ========================================================================
	// Scoring
	// ========================================================================

	/// Enumerates candidates for a probe and scores the eligible ones:
	/// subset filtering, exact matching, activation, threshold culling.
	fn score_candidates(&mut self, probe: &Attributes) -> Result<Vec<Candidate>> {
		validate_probe(probe)?;
		let partial_matching = self.params.mismatch.is_some();
		let mut exact: SmallVec<[(&str, &Value); 8]> = SmallVec::new();
		let mut partial: SmallVec<[(&str, &Value); 8]> = SmallVec::new();
		for (name, value) in probe.iter() {
			if partial_matching && self.registry.has(name) {
				partial.push((name, value));
			} else {
				exact.push((name, value));
			}
		}

		let ids: Vec<ChunkId> = match self.store.index_candidates(&exact) {
			Some(ids) => ids,
			None => self.store.ids().collect(),
		};

		let tracing_on = self.recorder.is_enabled();
		let mut candidates = Vec::new();
		for id in ids {
			let Some(chunk) = self.store.get(id) else {
				continue;
			};
			if !probe.names().all(|name| chunk.attributes().contains(name)) {
				continue;
			}
			let matches_exactly = exact
				.iter()
				.all(|(name, value)| chunk.get(name) == Some(*value));
			let mut record = tracing_on.then(|| HistoryRecord {
				name: chunk.name(),
				creation: chunk.creation(),
				attributes: chunk.attributes().clone(),
				references: chunk.references(),
				eligible: matches_exactly,
				base_level: None,
				noise: None,
				mismatch: None,
				activation: None,
				retrieval_probability: None,
			});
			if !matches_exactly {
				let _ = record.map(|r| self.recorder.push(r));
				continue;
			}
			let base = self.base_level_of(chunk);
			let chunk_values: SmallVec<[Value; 8]> = partial
				.iter()
				.filter_map(|(name, _)| chunk.get(name).cloned())
				.collect();

			let noise = self.sample_noise(id);
			let penalty = if partial_matching {
				let scale = self.params.mismatch.unwrap_or(0.0);
				let mut dissimilarity = 0.0;
				for ((name, probe_value), chunk_value) in partial.iter().zip(&chunk_values) {
					let similarity = self
						.registry
						.similarity(name, chunk_value, probe_value)?
						.unwrap_or(1.0);
					dissimilarity += self.registry.weight(name) * (similarity - 1.0);
				}
				Some(scale * dissimilarity)
			} else {
				None
			};
			let activation = base + noise + penalty.unwrap_or(0.0);
			if let Some(r) = record.as_mut() {
				r.base_level = Some(base);
				r.noise = Some(noise);
				r.mismatch = penalty;
				r.activation = Some(activation);
			}
			let index = record.and_then(|r| self.recorder.push(r));
			candidates.push(Candidate {
				id,
				activation,
				record: index,
			});
		}

		if let Some(threshold) = self.params.threshold {
			candidates.retain(|candidate| {
				let keep = candidate.activation >= threshold;
				if !keep {
					self.recorder.mark_ineligible(candidate.record);
				}
				keep
			});
		}
		Ok(candidates)
	}
}
