//! Chunks
//!
//! A chunk is one learned experience: an immutable attribute map plus the
//! history of when it was reinforced. Re-learning an identical attribute
//! map appends a timestamp to the existing chunk instead of creating a
//! new one, so frequency and recency accumulate in one place.
//!
//! Under optimized learning the history is compressed: either to a bare
//! count with the first-reinforcement time, or to the k most recent
//! timestamps with the rest counted.

use crate::error::{MemoryError, Result};
use crate::params::OptimizedLearning;
use crate::value::Attributes;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Stable identity of a chunk within one memory, assigned at first learn.
///
/// Its display form is the chunk's name: a zero-padded ordinal like
/// `0004`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId(pub(crate) u32);

impl fmt::Display for ChunkId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:04}", self.0)
	}
}

/// Reinforcement history introspection: exact timestamps when available,
/// otherwise the reference count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ReferencesUsed {
	/// The exact reinforcement timestamps, non-decreasing.
	Times(Vec<f64>),
	/// Only the number of reinforcements is known.
	Count(u64),
}

/// A chunk's reinforcement history in one of the optimized-learning
/// representations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) enum References {
	/// Every timestamp, in non-decreasing order.
	Full(Vec<f64>),
	/// First-reinforcement time and a count.
	Counted { first: f64, count: u64 },
	/// First time, total count, and the k most recent timestamps.
	Recent {
		first: f64,
		count: u64,
		recent: VecDeque<f64>,
		keep: usize,
	},
}

impl References {
	pub(crate) fn new(mode: OptimizedLearning) -> Self {
		match mode {
			OptimizedLearning::Off => Self::Full(Vec::new()),
			OptimizedLearning::On => Self::Counted { first: 0.0, count: 0 },
			OptimizedLearning::Recent(keep) => Self::Recent {
				first: 0.0,
				count: 0,
				recent: VecDeque::with_capacity(keep),
				keep,
			},
		}
	}

	pub(crate) fn record(&mut self, time: f64) {
		match self {
			Self::Full(times) => times.push(time),
			Self::Counted { first, count } => {
				if *count == 0 {
					*first = time;
				}
				*count += 1;
			}
			Self::Recent {
				first,
				count,
				recent,
				keep,
			} => {
				if *count == 0 {
					*first = time;
				}
				*count += 1;
				recent.push_back(time);
				if recent.len() > *keep {
					let _ = recent.pop_front();
				}
			}
		}
	}

	pub(crate) fn count(&self) -> u64 {
		match self {
			Self::Full(times) => times.len() as u64,
			Self::Counted { count, .. } | Self::Recent { count, .. } => *count,
		}
	}

	/// Removes one reinforcement recorded at `when`. Returns false when
	/// no such reinforcement is known; compressed histories refuse
	/// removals they cannot represent faithfully.
	pub(crate) fn forget(&mut self, when: f64, creation: f64) -> Result<bool> {
		match self {
			Self::Full(times) => match times.iter().position(|&t| t == when) {
				Some(i) => {
					let _ = times.remove(i);
					Ok(true)
				}
				None => Ok(false),
			},
			Self::Counted { first, count } => {
				if when < *first {
					return Ok(false);
				}
				if when == *first && *count > 1 {
					return Err(MemoryError::InvalidTime(format!(
						"cannot forget the creation reference at {creation} of a counted history \
						 that still has later reinforcements"
					)));
				}
				*count -= 1;
				Ok(true)
			}
			Self::Recent { count, recent, .. } => {
				match recent.iter().position(|&t| t == when) {
					Some(i) => {
						let _ = recent.remove(i);
						*count -= 1;
						Ok(true)
					}
					None if when < creation => Ok(false),
					None => Err(MemoryError::InvalidTime(format!(
						"cannot forget a reference at {when}: it is approximated, not retained"
					))),
				}
			}
		}
	}

	pub(crate) fn used(&self) -> ReferencesUsed {
		match self {
			Self::Full(times) => ReferencesUsed::Times(times.clone()),
			Self::Counted { count, .. } => ReferencesUsed::Count(*count),
			Self::Recent { count, .. } => ReferencesUsed::Count(*count),
		}
	}
}

/// A learned experience: attributes, identity, creation time, and
/// reinforcement history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chunk {
	id: ChunkId,
	attributes: Attributes,
	creation: f64,
	pub(crate) references: References,
}

impl Chunk {
	pub(crate) fn new(
		id: ChunkId,
		attributes: Attributes,
		creation: f64,
		mode: OptimizedLearning,
	) -> Self {
		Self {
			id,
			attributes,
			creation,
			references: References::new(mode),
		}
	}

	/// The chunk's stable identity.
	#[must_use]
	pub fn id(&self) -> ChunkId {
		self.id
	}

	/// The chunk's display name, a zero-padded ordinal.
	#[must_use]
	pub fn name(&self) -> String {
		self.id.to_string()
	}

	/// The chunk's attribute map.
	#[must_use]
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	/// Looks up one attribute value.
	#[must_use]
	pub fn get(&self, name: &str) -> Option<&crate::value::Value> {
		self.attributes.get(name)
	}

	/// The time this chunk was first learned.
	#[must_use]
	pub fn creation(&self) -> f64 {
		self.creation
	}

	/// How many times this chunk has been reinforced.
	#[must_use]
	pub fn reference_count(&self) -> u64 {
		self.references.count()
	}

	/// The reinforcement history as far as it is retained.
	#[must_use]
	pub fn references(&self) -> ReferencesUsed {
		self.references.used()
	}
}

impl fmt::Display for Chunk {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"<Chunk {} {{{}}} {}>",
			self.id,
			self.attributes,
			self.references.count()
		)
	}
}
