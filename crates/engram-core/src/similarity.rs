//! Similarity Registry
//!
//! Partial matching needs to know how close two attribute values are.
//! Each attribute may carry a similarity function ξ(x, y) — symmetric,
//! deterministic, total on the attribute's value domain — together with
//! a weight ω scaling its mismatch contribution, and optionally a
//! derivative ∂ξ/∂x used by salience.
//!
//! Similarities live on the natural scale [0, 1] (identical = 1) or the
//! traditional ACT-R scale [−1, 0] (identical = 0); internally everything
//! is normalized to natural form, so the retrieval arithmetic never
//! branches on the scale.
//!
//! Computed similarities are memoized per attribute under an unordered
//! value pair; derivatives under an ordered pair. Reassigning an
//! attribute's function drops that attribute's cache wholesale.

use crate::error::{MemoryError, Result};
use crate::value::Value;
use lru::LruCache;
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

const SIMILARITY_CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(10_000) {
	Some(n) => n,
	None => panic!("cache capacity is non-zero"),
};

const DERIVATIVE_CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(10_000) {
	Some(n) => n,
	None => panic!("cache capacity is non-zero"),
};

/// Two symmetric results further apart than this are treated as a broken
/// similarity contract.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

type ValueFn = Arc<dyn Fn(&Value, &Value) -> Option<f64> + Send + Sync>;

/// A similarity function for one attribute.
#[derive(Clone)]
pub enum Similarity {
	/// The built-in equality similarity: identical values are fully
	/// similar, anything else fully dissimilar.
	Equality,
	/// A user-supplied function. It must be symmetric and return values
	/// on the active scale; `None` means the pair is outside the
	/// function's domain and is reported as a contract violation.
	Custom(ValueFn),
}

impl Similarity {
	/// Wraps an arbitrary function over values.
	pub fn custom(f: impl Fn(&Value, &Value) -> Option<f64> + Send + Sync + 'static) -> Self {
		Self::Custom(Arc::new(f))
	}

	/// Wraps a function over numbers; non-numeric values fall outside
	/// its domain.
	pub fn numeric(f: impl Fn(f64, f64) -> f64 + Send + Sync + 'static) -> Self {
		Self::Custom(Arc::new(move |a: &Value, b: &Value| {
			Some(f(a.as_number()?, b.as_number()?))
		}))
	}
}

impl fmt::Debug for Similarity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Equality => f.write_str("Similarity::Equality"),
			Self::Custom(_) => f.write_str("Similarity::Custom(..)"),
		}
	}
}

/// A similarity derivative ∂ξ/∂x for one attribute, used by salience.
///
/// It is evaluated with the salience target as its first argument and a
/// chunk's value as its second, need not be symmetric, and is undefined
/// at equal arguments (the engine never calls it there).
#[derive(Clone)]
pub struct Derivative(ValueFn);

impl Derivative {
	/// Wraps an arbitrary derivative over values.
	pub fn custom(f: impl Fn(&Value, &Value) -> Option<f64> + Send + Sync + 'static) -> Self {
		Self(Arc::new(f))
	}

	/// Wraps a derivative over numbers; non-numeric values fall outside
	/// its domain.
	pub fn numeric(f: impl Fn(f64, f64) -> f64 + Send + Sync + 'static) -> Self {
		Self(Arc::new(move |a: &Value, b: &Value| {
			Some(f(a.as_number()?, b.as_number()?))
		}))
	}
}

impl fmt::Debug for Derivative {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Derivative(..)")
	}
}

struct Entry {
	function: Similarity,
	weight: f64,
	derivative: Option<Derivative>,
	cache: LruCache<(Value, Value), f64>,
	derivative_cache: LruCache<(Value, Value), f64>,
}

impl Entry {
	fn new(function: Similarity, weight: f64) -> Self {
		Self {
			function,
			weight,
			derivative: None,
			cache: LruCache::new(SIMILARITY_CACHE_SIZE),
			derivative_cache: LruCache::new(DERIVATIVE_CACHE_SIZE),
		}
	}
}

/// Per-memory mapping from attribute name to similarity machinery.
pub(crate) struct SimilarityRegistry {
	entries: HashMap<String, Entry>,
	actr_scale: bool,
}

impl SimilarityRegistry {
	pub(crate) fn new(actr_scale: bool) -> Self {
		Self {
			entries: HashMap::new(),
			actr_scale,
		}
	}

	/// Assigns a similarity function and weight to each named attribute.
	/// Replaces any previous assignment, clearing the attribute's caches
	/// and derivative.
	pub(crate) fn assign(
		&mut self,
		attributes: &[&str],
		function: &Similarity,
		weight: f64,
	) -> Result<()> {
		if !weight.is_finite() || weight <= 0.0 {
			return Err(MemoryError::InvalidParameter(format!(
				"the similarity weight, {weight}, must be a positive real"
			)));
		}
		for name in attributes {
			let _ = self
				.entries
				.insert((*name).to_owned(), Entry::new(function.clone(), weight));
		}
		Ok(())
	}

	/// Removes the similarity assignment (and caches) of each named
	/// attribute, returning it to exact matching.
	pub(crate) fn clear(&mut self, attributes: &[&str]) {
		for name in attributes {
			let _ = self.entries.remove(*name);
		}
	}

	/// Attaches a derivative to an attribute that already has a
	/// similarity function.
	pub(crate) fn set_derivative(&mut self, attribute: &str, derivative: Derivative) -> Result<()> {
		match self.entries.get_mut(attribute) {
			Some(entry) => {
				entry.derivative = Some(derivative);
				entry.derivative_cache.clear();
				Ok(())
			}
			None => Err(MemoryError::InvalidParameter(format!(
				"attribute {attribute:?} has no similarity function to attach a derivative to"
			))),
		}
	}

	/// Switches between the natural and ACT-R similarity scales,
	/// invalidating every cache.
	pub(crate) fn set_scale(&mut self, actr: bool) {
		if actr != self.actr_scale {
			self.actr_scale = actr;
			for entry in self.entries.values_mut() {
				entry.cache.clear();
				entry.derivative_cache.clear();
			}
		}
	}

	pub(crate) fn has(&self, attribute: &str) -> bool {
		self.entries.contains_key(attribute)
	}

	pub(crate) fn weight(&self, attribute: &str) -> f64 {
		self.entries.get(attribute).map_or(1.0, |e| e.weight)
	}

	/// Natural-scale similarity of two values under the attribute's
	/// function, or `None` when the attribute has no function.
	///
	/// Equal values short-circuit to 1 without consulting the function.
	pub(crate) fn similarity(
		&mut self,
		attribute: &str,
		a: &Value,
		b: &Value,
	) -> Result<Option<f64>> {
		if a == b {
			return Ok(self.entries.contains_key(attribute).then_some(1.0));
		}
		let actr = self.actr_scale;
		let Some(entry) = self.entries.get_mut(attribute) else {
			return Ok(None);
		};
		let function = match &entry.function {
			Similarity::Equality => return Ok(Some(0.0)),
			Similarity::Custom(f) => Arc::clone(f),
		};
		let key = unordered(a, b);
		if let Some(&cached) = entry.cache.get(&key) {
			return Ok(Some(cached));
		}
		let forward = function.as_ref()(a, b);
		let backward = function.as_ref()(b, a);
		let (Some(forward), Some(backward)) = (forward, backward) else {
			return Err(MemoryError::SimilarityContract(format!(
				"the similarity for {attribute:?} is not defined at ({a}, {b})"
			)));
		};
		if (forward - backward).abs() > SYMMETRY_TOLERANCE {
			return Err(MemoryError::SimilarityContract(format!(
				"the similarity for {attribute:?} is asymmetric at ({a}, {b}): \
				 {forward} versus {backward}"
			)));
		}
		let (low, high) = if actr { (-1.0, 0.0) } else { (0.0, 1.0) };
		if !forward.is_finite() || forward < low || forward > high {
			return Err(MemoryError::SimilarityContract(format!(
				"the similarity for {attribute:?} returned {forward}, outside [{low}, {high}]"
			)));
		}
		let natural = if actr { forward + 1.0 } else { forward };
		let _ = entry.cache.put(key, natural);
		Ok(Some(natural))
	}

	/// Derivative of the attribute's similarity, evaluated at
	/// `(target, value)`. `Ok(None)` marks the undefined point where the
	/// arguments are equal; a missing derivative is an error.
	pub(crate) fn derivative(
		&mut self,
		attribute: &str,
		target: &Value,
		value: &Value,
	) -> Result<Option<f64>> {
		if target == value {
			return Ok(None);
		}
		let Some(entry) = self.entries.get_mut(attribute) else {
			return Err(MemoryError::UndefinedDerivative(format!(
				"attribute {attribute:?} has no similarity function"
			)));
		};
		let Some(derivative) = &entry.derivative else {
			return Err(MemoryError::UndefinedDerivative(format!(
				"attribute {attribute:?} has no derivative function"
			)));
		};
		let key = (target.clone(), value.clone());
		if let Some(&cached) = entry.derivative_cache.get(&key) {
			return Ok(Some(cached));
		}
		let Some(result) = derivative.0.as_ref()(target, value) else {
			return Err(MemoryError::UndefinedDerivative(format!(
				"the derivative for {attribute:?} is not defined at ({target}, {value})"
			)));
		};
		let _ = entry.derivative_cache.put(key, result);
		Ok(Some(result))
	}
}

fn unordered(a: &Value, b: &Value) -> (Value, Value) {
	if a <= b {
		(a.clone(), b.clone())
	} else {
		(b.clone(), a.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn linear() -> Similarity {
		Similarity::numeric(|x, y| 1.0 - (x - y).abs() / 16.0)
	}

	#[test]
	fn test_equal_values_short_circuit() {
		let mut registry = SimilarityRegistry::new(false);
		registry
			.assign(&["a"], &Similarity::numeric(|_, _| 0.123), 1.0)
			.unwrap();
		let s = registry
			.similarity("a", &Value::from(3), &Value::from(3))
			.unwrap();
		assert_eq!(s, Some(1.0));
	}

	#[test]
	fn test_unregistered_attribute() {
		let mut registry = SimilarityRegistry::new(false);
		let s = registry
			.similarity("b", &Value::from(3), &Value::from(4))
			.unwrap();
		assert_eq!(s, None);
	}

	#[test]
	fn test_symmetric_cache() {
		let mut registry = SimilarityRegistry::new(false);
		registry.assign(&["a"], &linear(), 1.0).unwrap();
		let forward = registry
			.similarity("a", &Value::from(3), &Value::from(4))
			.unwrap()
			.unwrap();
		let backward = registry
			.similarity("a", &Value::from(4), &Value::from(3))
			.unwrap()
			.unwrap();
		assert!((forward - backward).abs() < 1e-15);
		assert!((forward - 0.9375).abs() < 1e-12);
	}

	#[test]
	fn test_reassignment_invalidates() {
		let mut registry = SimilarityRegistry::new(false);
		registry.assign(&["a"], &linear(), 1.0).unwrap();
		let before = registry
			.similarity("a", &Value::from(0), &Value::from(8))
			.unwrap()
			.unwrap();
		assert!((before - 0.5).abs() < 1e-12);
		registry
			.assign(&["a"], &Similarity::numeric(|x, y| 1.0 - (x - y).abs() / 32.0), 1.0)
			.unwrap();
		let after = registry
			.similarity("a", &Value::from(0), &Value::from(8))
			.unwrap()
			.unwrap();
		assert!((after - 0.75).abs() < 1e-12);
	}

	#[test]
	fn test_equality_builtin() {
		let mut registry = SimilarityRegistry::new(false);
		registry.assign(&["a"], &Similarity::Equality, 1.0).unwrap();
		let same = registry
			.similarity("a", &Value::from("x"), &Value::from("x"))
			.unwrap();
		let different = registry
			.similarity("a", &Value::from("x"), &Value::from("y"))
			.unwrap();
		assert_eq!(same, Some(1.0));
		assert_eq!(different, Some(0.0));
	}

	#[test]
	fn test_range_contract() {
		let mut registry = SimilarityRegistry::new(false);
		registry
			.assign(&["a"], &Similarity::numeric(|_, _| 1.5), 1.0)
			.unwrap();
		let result = registry.similarity("a", &Value::from(1), &Value::from(2));
		assert!(matches!(result, Err(MemoryError::SimilarityContract(_))));
	}

	#[test]
	fn test_asymmetry_contract() {
		let mut registry = SimilarityRegistry::new(false);
		registry
			.assign(&["a"], &Similarity::numeric(|x, y| (0.6 * x / (x + y)).min(1.0)), 1.0)
			.unwrap();
		let result = registry.similarity("a", &Value::from(1), &Value::from(2));
		assert!(matches!(result, Err(MemoryError::SimilarityContract(_))));
	}

	#[test]
	fn test_actr_scale_offset() {
		let mut natural = SimilarityRegistry::new(false);
		natural.assign(&["a"], &linear(), 1.0).unwrap();
		let mut actr = SimilarityRegistry::new(true);
		actr.assign(
			&["a"],
			&Similarity::numeric(|x, y| -(x - y).abs() / 16.0),
			1.0,
		)
		.unwrap();
		let n = natural
			.similarity("a", &Value::from(2), &Value::from(6))
			.unwrap()
			.unwrap();
		let a = actr
			.similarity("a", &Value::from(2), &Value::from(6))
			.unwrap()
			.unwrap();
		assert!((n - a).abs() < 1e-12);
	}

	#[test]
	fn test_non_numeric_outside_domain() {
		let mut registry = SimilarityRegistry::new(false);
		registry.assign(&["a"], &linear(), 1.0).unwrap();
		let result = registry.similarity("a", &Value::from("x"), &Value::from("y"));
		assert!(matches!(result, Err(MemoryError::SimilarityContract(_))));
	}

	#[test]
	fn test_derivative_and_undefined_point() {
		let mut registry = SimilarityRegistry::new(false);
		registry.assign(&["a"], &linear(), 1.0).unwrap();
		registry
			.set_derivative("a", Derivative::numeric(|x, y| -(x - y).signum() / 16.0))
			.unwrap();
		let d = registry
			.derivative("a", &Value::from(2), &Value::from(3))
			.unwrap()
			.unwrap();
		assert!((d - 1.0 / 16.0).abs() < 1e-12);
		// Equal arguments are the undefined point, not an error here.
		let undefined = registry
			.derivative("a", &Value::from(2), &Value::from(2))
			.unwrap();
		assert_eq!(undefined, None);
		// No derivative registered is an error.
		registry.assign(&["b"], &linear(), 1.0).unwrap();
		let missing = registry.derivative("b", &Value::from(1), &Value::from(2));
		assert!(matches!(missing, Err(MemoryError::UndefinedDerivative(_))));
	}

	#[test]
	fn test_weight_validation() {
		let mut registry = SimilarityRegistry::new(false);
		assert!(registry.assign(&["a"], &linear(), 0.0).is_err());
		assert!(registry.assign(&["a"], &linear(), -1.0).is_err());
		assert!(registry.assign(&["a"], &linear(), 2.0).is_ok());
		assert!((registry.weight("a") - 2.0).abs() < 1e-15);
		assert!((registry.weight("zzz") - 1.0).abs() < 1e-15);
	}
}
