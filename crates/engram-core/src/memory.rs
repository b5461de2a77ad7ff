//! The Memory
//!
//! A `Memory` owns everything one cognitive agent remembers: the chunk
//! store, the parameter block, the similarity registry, a seedable
//! random number generator, and the optional activation-history
//! recorder. Time is a dimensionless, non-decreasing real number that
//! the model advances explicitly.
//!
//! Multiple `Memory` instances are fully independent and can run on
//! separate threads; a single instance is not synchronized.

use crate::activation::{base_level_approximate, base_level_exact, base_level_hybrid, logistic_noise};
use crate::chunk::{Chunk, ChunkId, References, ReferencesUsed};
use crate::error::{MemoryError, Result};
use crate::history::{HistoryRecord, Recorder};
use crate::params::{self, OptimizedLearning, Parameters, SalienceFallback, ZeroAge};
use crate::similarity::{Derivative, Similarity, SimilarityRegistry};
use crate::store::ChunkStore;
use crate::value::Attributes;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};
use tracing::debug;

#[derive(Debug)]
pub(crate) struct NoiseCache {
	time: f64,
	samples: HashMap<ChunkId, f64>,
}

/// A collection of learned chunks with a notion of time and the
/// parameters governing their retrieval.
pub struct Memory {
	pub(crate) store: ChunkStore,
	pub(crate) params: Parameters,
	pub(crate) registry: SimilarityRegistry,
	pub(crate) rng: StdRng,
	pub(crate) recorder: Recorder,
	noise_cache: Option<NoiseCache>,
	time: f64,
}

impl Default for Memory {
	fn default() -> Self {
		Self::new()
	}
}

impl Memory {
	/// Creates a memory with default parameters (σ = 0.25, d = 0.5,
	/// threshold = −10, exact matching only).
	#[must_use]
	pub fn new() -> Self {
		// Defaults are valid by construction.
		match Self::with_parameters(Parameters::default()) {
			Ok(memory) => memory,
			Err(_) => unreachable!("default parameters validate"),
		}
	}

	/// Creates a memory with the given parameters, validating each
	/// against its domain.
	pub fn with_parameters(params: Parameters) -> Result<Self> {
		params.validate()?;
		let rng = match params.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_entropy(),
		};
		let mut store = ChunkStore::default();
		store.set_index(params.index.clone());
		let registry = SimilarityRegistry::new(params.use_actr_similarity);
		Ok(Self {
			store,
			registry,
			rng,
			recorder: Recorder::default(),
			noise_cache: None,
			time: 0.0,
			params,
		})
	}

	// ========================================================================
	// Time
	// ========================================================================

	/// The memory's current time.
	#[must_use]
	pub fn time(&self) -> f64 {
		self.time
	}

	/// Adds `amount` to the current time and returns the new time.
	/// Advancing flushes any fixed-noise samples.
	pub fn advance(&mut self, amount: f64) -> Result<f64> {
		if !amount.is_finite() || amount < 0.0 {
			return Err(MemoryError::InvalidTime(format!(
				"time cannot be advanced by {amount}"
			)));
		}
		if amount > 0.0 {
			self.time += amount;
			if let Some(cache) = self.noise_cache.as_mut() {
				cache.time = self.time;
				cache.samples.clear();
			}
		}
		Ok(self.time)
	}

	// ========================================================================
	// Learning
	// ========================================================================

	/// Adds or reinforces the chunk with the given attributes at the
	/// current time, returning its id.
	pub fn learn(&mut self, attributes: impl Into<Attributes>) -> Result<ChunkId> {
		let attributes = attributes.into();
		validate_attributes(&attributes, "learn")?;
		let id = match self.store.find(&attributes) {
			Some(id) => id,
			None => self
				.store
				.insert(attributes, self.time, self.params.optimized_learning),
		};
		self.cite(id);
		Ok(id)
	}

	/// [`learn`](Self::learn), then [`advance`](Self::advance) by
	/// `amount`. The amount is validated before anything is learned.
	pub fn learn_and_advance(
		&mut self,
		attributes: impl Into<Attributes>,
		amount: f64,
	) -> Result<ChunkId> {
		if !amount.is_finite() || amount < 0.0 {
			return Err(MemoryError::InvalidTime(format!(
				"time cannot be advanced by {amount}"
			)));
		}
		let id = self.learn(attributes)?;
		let _ = self.advance(amount)?;
		Ok(id)
	}

	/// Undoes one `learn` of the given attributes performed at time
	/// `when`: removes that reinforcement, deleting the chunk if none
	/// remain. Returns false when no such reinforcement exists.
	pub fn forget(&mut self, attributes: &Attributes, when: f64) -> Result<bool> {
		validate_attributes(attributes, "forget")?;
		let Some(id) = self.store.find(attributes) else {
			return Ok(false);
		};
		let Some(chunk) = self.store.get_mut(id) else {
			return Ok(false);
		};
		let creation = chunk.creation();
		if !chunk.references.forget(when, creation)? {
			return Ok(false);
		}
		if chunk.reference_count() == 0 {
			self.store.remove(id);
		}
		Ok(true)
	}

	pub(crate) fn cite(&mut self, id: ChunkId) {
		let time = self.time;
		if let Some(chunk) = self.store.get_mut(id) {
			chunk.references.record(time);
		}
	}

	// ========================================================================
	// Reset
	// ========================================================================

	/// Deletes the memory's chunks and returns its time to zero. When
	/// `preserve_prepopulated` is set, chunks created at time zero
	/// survive with a single reference at time zero. Parameters are
	/// untouched; the history and any fixed-noise samples are cleared.
	pub fn reset(&mut self, preserve_prepopulated: bool) {
		let mode = self.params.optimized_learning;
		self.reset_inner(preserve_prepopulated, mode);
	}

	/// [`reset`](Self::reset) that also switches the optimized-learning
	/// representation, the only point where that is possible once chunks
	/// have been learned.
	pub fn reset_with_learning(
		&mut self,
		preserve_prepopulated: bool,
		learning: OptimizedLearning,
	) -> Result<()> {
		params::validate_optimized_learning(learning)?;
		params::validate_decay(self.params.decay, learning)?;
		self.params.optimized_learning = learning;
		self.reset_inner(preserve_prepopulated, learning);
		Ok(())
	}

	fn reset_inner(&mut self, preserve_prepopulated: bool, mode: OptimizedLearning) {
		self.store.reset(preserve_prepopulated, mode);
		self.time = 0.0;
		self.recorder.clear();
		if let Some(cache) = self.noise_cache.as_mut() {
			cache.time = 0.0;
			cache.samples.clear();
		}
		debug!(chunks = self.store.len(), "memory reset");
	}

	// ========================================================================
	// Introspection
	// ========================================================================

	/// Number of distinct chunks.
	#[must_use]
	pub fn len(&self) -> usize {
		self.store.len()
	}

	/// True when no chunks have been learned.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.store.is_empty()
	}

	/// Looks up a chunk by id.
	#[must_use]
	pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
		self.store.get(id)
	}

	/// The chunks, in insertion order.
	pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
		self.store.iter()
	}

	/// Writes a table describing every chunk: name, contents, creation
	/// time, reference count, and retained reinforcement times.
	pub fn print_chunks(&self, writer: &mut impl Write) -> io::Result<()> {
		const HEADERS: [&str; 5] = [
			"chunk name",
			"chunk contents",
			"created at",
			"reference count",
			"references",
		];
		let rows: Vec<[String; 5]> = self
			.chunks()
			.map(|chunk| {
				let references = match chunk.references() {
					ReferencesUsed::Times(times) => times
						.iter()
						.map(|t| format_time(*t))
						.collect::<Vec<_>>()
						.join(", "),
					ReferencesUsed::Count(count) => count.to_string(),
				};
				[
					chunk.name(),
					chunk.attributes().to_string(),
					format_time(chunk.creation()),
					chunk.reference_count().to_string(),
					references,
				]
			})
			.collect();
		if rows.is_empty() {
			return Ok(());
		}
		let mut widths: [usize; 5] = HEADERS.map(str::len);
		for row in &rows {
			for (width, cell) in widths.iter_mut().zip(row.iter()) {
				*width = (*width).max(cell.len());
			}
		}
		let rule = |writer: &mut dyn Write| -> io::Result<()> {
			for width in widths {
				write!(writer, "+{}", "-".repeat(width + 2))?;
			}
			writeln!(writer, "+")
		};
		let line = |writer: &mut dyn Write, cells: &[String; 5]| -> io::Result<()> {
			for (width, cell) in widths.iter().copied().zip(cells.iter()) {
				write!(writer, "| {cell:<width$} ")?;
			}
			writeln!(writer, "|")
		};
		rule(writer)?;
		line(writer, &HEADERS.map(str::to_owned))?;
		rule(writer)?;
		for row in &rows {
			line(writer, row)?;
		}
		rule(writer)
	}

	/// The chunk table as a string, for quick inspection.
	#[must_use]
	pub fn chunk_table(&self) -> String {
		let mut buffer = Vec::new();
		// Writing to a Vec cannot fail.
		let _ = self.print_chunks(&mut buffer);
		String::from_utf8_lossy(&buffer).into_owned()
	}

	// ========================================================================
	// Similarity registry
	// ========================================================================

	/// Assigns a similarity function and weight to each named attribute,
	/// enabling partial matching on them when `mismatch` is set.
	/// Replaces any previous assignment, including its derivative.
	pub fn similarity(
		&mut self,
		attributes: &[&str],
		function: &Similarity,
		weight: f64,
	) -> Result<()> {
		self.registry.assign(attributes, function, weight)
	}

	/// Removes the similarity functions of the named attributes,
	/// returning them to exact matching.
	pub fn clear_similarity(&mut self, attributes: &[&str]) {
		self.registry.clear(attributes);
	}

	/// Attaches a salience derivative to an attribute that already has a
	/// similarity function.
	pub fn set_derivative(&mut self, attribute: &str, derivative: Derivative) -> Result<()> {
		self.registry.set_derivative(attribute, derivative)
	}

	// ========================================================================
	// Activation history
	// ========================================================================

	/// Turns the activation-history recorder on or off. Toggling clears
	/// any existing records.
	pub fn record_history(&mut self, enabled: bool) {
		self.recorder.set_enabled(enabled);
	}

	/// The recorded activation history, in candidate order within each
	/// operation and operation order across them.
	#[must_use]
	pub fn history(&self) -> &[HistoryRecord] {
		self.recorder.records()
	}

	/// Clears the recorded history without disabling the recorder.
	pub fn clear_history(&mut self) {
		self.recorder.clear();
	}

	// ========================================================================
	// Fixed noise
	// ========================================================================

	/// Enters a scope in which repeated activations of the same chunk at
	/// the same time reuse one noise sample. The scope ends when the
	/// returned guard drops; advancing time flushes the samples.
	pub fn fixed_noise(&mut self) -> FixedNoise<'_> {
		let prior = self.noise_cache.take();
		self.noise_cache = Some(NoiseCache {
			time: self.time,
			samples: HashMap::new(),
		});
		FixedNoise {
			memory: self,
			prior,
		}
	}

	pub(crate) fn sample_noise(&mut self, id: ChunkId) -> f64 {
		if self.params.noise == 0.0 {
			return 0.0;
		}
		if let Some(cache) = self.noise_cache.as_mut() {
			if cache.time != self.time {
				cache.time = self.time;
				cache.samples.clear();
			}
			if let Some(&sample) = cache.samples.get(&id) {
				return sample;
			}
		}
		let sample = logistic_noise(&mut self.rng, self.params.noise);
		if let Some(cache) = self.noise_cache.as_mut() {
			let _ = cache.samples.insert(id, sample);
		}
		sample
	}

	// ========================================================================
	// Base level
	// ========================================================================

	pub(crate) fn base_level_of(&self, chunk: &Chunk) -> f64 {
		let Some(decay) = self.params.decay else {
			return 0.0;
		};
		let zero_age = self.params.zero_age;
		match &chunk.references {
			References::Full(times) => base_level_exact(times, self.time, decay, zero_age),
			References::Counted { first, count } => {
				base_level_approximate(*count, *first, self.time, decay, zero_age)
			}
			References::Recent {
				first,
				count,
				recent,
				..
			} => {
				let retained: smallvec::SmallVec<[f64; 8]> = recent.iter().copied().collect();
				base_level_hybrid(&retained, *count, *first, self.time, decay, zero_age)
			}
		}
	}

	// ========================================================================
	// Parameters
	// ========================================================================

	/// The full parameter block.
	#[must_use]
	pub fn parameters(&self) -> &Parameters {
		&self.params
	}

	/// The activation-noise scale σ.
	#[must_use]
	pub fn noise(&self) -> f64 {
		self.params.noise
	}

	/// Sets the activation-noise scale σ ≥ 0, discarding any fixed-noise
	/// samples drawn under the old scale.
	pub fn set_noise(&mut self, noise: f64) -> Result<()> {
		params::validate_noise(noise)?;
		if noise != self.params.noise {
			self.params.noise = noise;
			if let Some(cache) = self.noise_cache.as_mut() {
				cache.samples.clear();
			}
		}
		Ok(())
	}

	/// The base-level decay exponent, `None` when base-level activation
	/// is disabled.
	#[must_use]
	pub fn decay(&self) -> Option<f64> {
		self.params.decay
	}

	/// Sets the decay exponent d ≥ 0, or disables base-level activation
	/// with `None`. Must stay below 1 under optimized learning.
	pub fn set_decay(&mut self, decay: Option<f64>) -> Result<()> {
		params::validate_decay(decay, self.params.optimized_learning)?;
		self.params.decay = decay;
		Ok(())
	}

	/// The explicit blending temperature, `None` when derived from the
	/// noise.
	#[must_use]
	pub fn temperature(&self) -> Option<f64> {
		self.params.temperature
	}

	/// Sets the blending temperature, or `None` to derive σ·√2.
	pub fn set_temperature(&mut self, temperature: Option<f64>) -> Result<()> {
		params::validate_temperature(temperature)?;
		self.params.temperature = temperature;
		Ok(())
	}

	/// The mismatch penalty μ, `None` when partial matching is off.
	#[must_use]
	pub fn mismatch(&self) -> Option<f64> {
		self.params.mismatch
	}

	/// Sets the mismatch penalty μ ≥ 0, or disables partial matching
	/// with `None`.
	pub fn set_mismatch(&mut self, mismatch: Option<f64>) -> Result<()> {
		params::validate_mismatch(mismatch)?;
		self.params.mismatch = mismatch;
		Ok(())
	}

	/// The retrieval threshold, `None` when disabled.
	#[must_use]
	pub fn threshold(&self) -> Option<f64> {
		self.params.threshold
	}

	/// Sets the minimum activation for retrieval, or disables the floor
	/// with `None`.
	pub fn set_threshold(&mut self, threshold: Option<f64>) -> Result<()> {
		params::validate_threshold(threshold)?;
		self.params.threshold = threshold;
		Ok(())
	}

	/// The reinforcement-history representation.
	#[must_use]
	pub fn optimized_learning(&self) -> OptimizedLearning {
		self.params.optimized_learning
	}

	/// Switches the optimized-learning representation. Only possible
	/// while the memory holds no chunks; use
	/// [`reset_with_learning`](Self::reset_with_learning) otherwise.
	pub fn set_optimized_learning(&mut self, learning: OptimizedLearning) -> Result<()> {
		if !self.store.is_empty() {
			return Err(MemoryError::InvalidParameter(
				"optimized learning can only change while the memory is empty; \
				 use reset_with_learning"
					.to_owned(),
			));
		}
		params::validate_optimized_learning(learning)?;
		params::validate_decay(self.params.decay, learning)?;
		self.params.optimized_learning = learning;
		Ok(())
	}

	/// Whether similarities follow the traditional ACT-R scale [−1, 0].
	#[must_use]
	pub fn use_actr_similarity(&self) -> bool {
		self.params.use_actr_similarity
	}

	/// Switches between the natural and ACT-R similarity scales,
	/// invalidating cached similarities.
	pub fn set_use_actr_similarity(&mut self, actr: bool) {
		self.params.use_actr_similarity = actr;
		self.registry.set_scale(actr);
	}

	/// The zero-age base-level policy.
	#[must_use]
	pub fn zero_age(&self) -> ZeroAge {
		self.params.zero_age
	}

	/// Sets the zero-age base-level policy.
	pub fn set_zero_age(&mut self, zero_age: ZeroAge) -> Result<()> {
		params::validate_zero_age(zero_age)?;
		self.params.zero_age = zero_age;
		Ok(())
	}

	/// The undefined-derivative salience policy.
	#[must_use]
	pub fn salience_fallback(&self) -> SalienceFallback {
		self.params.salience_fallback
	}

	/// Sets the undefined-derivative salience policy.
	pub fn set_salience_fallback(&mut self, fallback: SalienceFallback) {
		self.params.salience_fallback = fallback;
	}

	/// The indexed attribute names.
	#[must_use]
	pub fn index(&self) -> &[String] {
		self.store.indexed_attributes()
	}

	/// Declares the attributes kept in the secondary retrieval index and
	/// rebuilds it.
	pub fn set_index(&mut self, attributes: Vec<String>) {
		self.params.index = attributes.clone();
		self.store.set_index(attributes);
	}
}

impl fmt::Debug for Memory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Memory")
			.field("time", &self.time)
			.field("chunks", &self.store.len())
			.field("params", &self.params)
			.finish_non_exhaustive()
	}
}

fn validate_attributes(attributes: &Attributes, operation: &str) -> Result<()> {
	if attributes.is_empty() {
		return Err(MemoryError::InvalidParameter(format!(
			"no attributes to {operation}"
		)));
	}
	for (name, value) in attributes.iter() {
		if !value.is_well_formed() {
			return Err(MemoryError::InvalidParameter(format!(
				"attribute {name:?} holds a non-finite number"
			)));
		}
	}
	Ok(())
}

pub(crate) fn validate_probe(probe: &Attributes) -> Result<()> {
	for (name, value) in probe.iter() {
		if !value.is_well_formed() {
			return Err(MemoryError::InvalidParameter(format!(
				"probe attribute {name:?} holds a non-finite number"
			)));
		}
	}
	Ok(())
}

fn format_time(time: f64) -> String {
	if time.fract() == 0.0 && time.abs() < 1e15 {
		#[allow(clippy::cast_possible_truncation)]
		let whole = time as i64;
		whole.to_string()
	} else {
		time.to_string()
	}
}

/// Guard for a fixed-noise scope; dereferences to the underlying
/// [`Memory`] and restores the prior noise state when dropped.
pub struct FixedNoise<'a> {
	memory: &'a mut Memory,
	prior: Option<NoiseCache>,
}

impl Deref for FixedNoise<'_> {
	type Target = Memory;

	fn deref(&self) -> &Memory {
		self.memory
	}
}

impl DerefMut for FixedNoise<'_> {
	fn deref_mut(&mut self) -> &mut Memory {
		self.memory
	}
}

impl Drop for FixedNoise<'_> {
	fn drop(&mut self) {
		self.memory.noise_cache = self.prior.take();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attrs;

	fn seeded() -> Memory {
		Memory::with_parameters(Parameters {
			seed: Some(42),
			..Parameters::default()
		})
		.unwrap()
	}

	#[test]
	fn test_learn_and_reinforce() {
		let mut m = Memory::new();
		let a = m.learn(attrs! { "color" => "red", "size" => 4 }).unwrap();
		let _ = m.advance(1.0).unwrap();
		let b = m.learn(attrs! { "color" => "blue", "size" => 4 }).unwrap();
		let _ = m.advance(1.0).unwrap();
		let again = m.learn(attrs! { "size" => 4, "color" => "red" }).unwrap();
		assert_eq!(a, again);
		assert_ne!(a, b);
		assert_eq!(m.len(), 2);
		assert_eq!(m.chunk(a).unwrap().reference_count(), 2);
		let ReferencesUsed::Times(times) = m.chunk(a).unwrap().references() else {
			panic!("full history expected");
		};
		assert_eq!(times, vec![0.0, 2.0]);
	}

	#[test]
	fn test_learn_rejects_bad_input() {
		let mut m = Memory::new();
		assert!(matches!(
			m.learn(attrs! {}),
			Err(MemoryError::InvalidParameter(_))
		));
		assert!(m.learn(attrs! { "x" => f64::NAN }).is_err());
		assert!(m.is_empty());
	}

	#[test]
	fn test_advance() {
		let mut m = Memory::new();
		assert!((m.advance(1.0).unwrap() - 1.0).abs() < 1e-12);
		assert!((m.advance(12.5).unwrap() - 13.5).abs() < 1e-12);
		assert!(matches!(m.advance(-0.001), Err(MemoryError::InvalidTime(_))));
		assert!((m.time() - 13.5).abs() < 1e-12);
	}

	#[test]
	fn test_forget_is_left_inverse_of_learn() {
		let mut m = Memory::new();
		let _ = m.learn_and_advance(attrs! { "a" => 1 }, 1.0).unwrap();
		let _ = m.learn_and_advance(attrs! { "a" => 1 }, 1.0).unwrap();
		assert_eq!(m.len(), 1);
		assert!(m.forget(&attrs! { "a" => 1 }, 1.0).unwrap());
		assert_eq!(m.chunk(m.store.find(&attrs! { "a" => 1 }).unwrap()).unwrap().reference_count(), 1);
		assert!(m.forget(&attrs! { "a" => 1 }, 0.0).unwrap());
		assert!(m.is_empty());
		assert!(!m.forget(&attrs! { "a" => 1 }, 0.0).unwrap());
	}

	#[test]
	fn test_forget_missing_time() {
		let mut m = Memory::new();
		let _ = m.learn(attrs! { "a" => 1 }).unwrap();
		assert!(!m.forget(&attrs! { "a" => 1 }, 99.0).unwrap());
		assert_eq!(m.len(), 1);
	}

	#[test]
	fn test_reset_preserves_prepopulated() {
		let mut m = Memory::new();
		let _ = m.learn(attrs! { "choice" => "safe", "outcome" => 1 }).unwrap();
		let _ = m.advance(1.0).unwrap();
		let _ = m.learn(attrs! { "choice" => "risky", "outcome" => 0 }).unwrap();
		let _ = m.advance(5.0).unwrap();
		m.reset(true);
		assert_eq!(m.len(), 1);
		assert!((m.time() - 0.0).abs() < 1e-12);
		let survivor = m.chunks().next().unwrap();
		assert_eq!(survivor.get("choice").and_then(|v| v.as_text()), Some("safe"));
		assert_eq!(survivor.reference_count(), 1);
		m.reset(false);
		assert!(m.is_empty());
	}

	#[test]
	fn test_optimized_learning_only_when_empty() {
		let mut m = Memory::new();
		assert!(m.set_optimized_learning(OptimizedLearning::On).is_ok());
		let _ = m.learn(attrs! { "a" => 1 }).unwrap();
		assert!(m.set_optimized_learning(OptimizedLearning::Off).is_err());
		assert!(m.reset_with_learning(false, OptimizedLearning::Off).is_ok());
		assert_eq!(m.optimized_learning(), OptimizedLearning::Off);
	}

	#[test]
	fn test_decay_learning_interaction() {
		let mut m = Memory::new();
		m.set_optimized_learning(OptimizedLearning::On).unwrap();
		assert!(m.set_decay(Some(1.0)).is_err());
		m.set_optimized_learning(OptimizedLearning::Off).unwrap();
		assert!(m.set_decay(Some(2.5)).is_ok());
		assert!(m.set_optimized_learning(OptimizedLearning::On).is_err());
	}

	#[test]
	fn test_fixed_noise_scope() {
		let mut m = seeded();
		let id = m.learn(attrs! { "a" => 1 }).unwrap();
		let _ = m.advance(1.0).unwrap();
		let loose_a = m.sample_noise(id);
		let loose_b = m.sample_noise(id);
		assert_ne!(loose_a, loose_b);
		{
			let mut fixed = m.fixed_noise();
			let first = fixed.sample_noise(id);
			let second = fixed.sample_noise(id);
			assert_eq!(first, second);
			let _ = fixed.advance(1.0).unwrap();
			let after_advance = fixed.sample_noise(id);
			assert_ne!(first, after_advance);
			assert_eq!(after_advance, fixed.sample_noise(id));
		}
		let outside_a = m.sample_noise(id);
		let outside_b = m.sample_noise(id);
		assert_ne!(outside_a, outside_b);
	}

	#[test]
	fn test_zero_noise_is_silent() {
		let mut m = Memory::new();
		m.set_noise(0.0).unwrap();
		let id = m.learn(attrs! { "a" => 1 }).unwrap();
		assert_eq!(m.sample_noise(id), 0.0);
	}

	#[test]
	fn test_print_chunks() {
		let mut m = Memory::new();
		let _ = m.learn_and_advance(attrs! { "color" => "red", "size" => 3 }, 1.0).unwrap();
		let _ = m.learn_and_advance(attrs! { "color" => "red", "size" => 3 }, 1.0).unwrap();
		let table = m.chunk_table();
		assert!(table.contains("0000"));
		assert!(table.contains("chunk name"));
		assert!(table.contains("color: \"red\", size: 3"));
		assert!(table.contains("0, 1"));
		// An empty memory prints nothing.
		m.reset(false);
		assert!(m.chunk_table().is_empty());
	}

	#[test]
	fn test_seeded_runs_are_reproducible() {
		let run = || {
			let mut m = seeded();
			let id = m.learn(attrs! { "a" => 1 }).unwrap();
			let _ = m.advance(1.0).unwrap();
			(0..5).map(|_| m.sample_noise(id)).collect::<Vec<_>>()
		};
		assert_eq!(run(), run());
	}
}
