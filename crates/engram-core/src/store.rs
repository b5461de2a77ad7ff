//! Chunk Store
//!
//! Content-addressed storage: each distinct attribute map is one chunk,
//! found by hashing the map itself. Slots are tombstoned rather than
//! compacted so chunk ids stay stable for the life of the memory, and
//! enumeration follows insertion order.
//!
//! An optional secondary index maps, for each declared attribute, every
//! value to the set of chunks holding it exactly. Retrieval intersects
//! these sets for the probe attributes that must match exactly, instead
//! of scanning the whole store.

use crate::chunk::{Chunk, ChunkId, References};
use crate::params::OptimizedLearning;
use crate::value::{Attributes, Value};
use std::collections::{HashMap, HashSet};
use tracing::trace;

#[derive(Debug, Default)]
pub(crate) struct ChunkStore {
	slots: Vec<Option<Chunk>>,
	by_content: HashMap<Attributes, ChunkId>,
	indexed: Vec<String>,
	index: HashMap<String, HashMap<Value, HashSet<ChunkId>>>,
	live: usize,
}

impl ChunkStore {
	pub(crate) fn len(&self) -> usize {
		self.live
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.live == 0
	}

	pub(crate) fn get(&self, id: ChunkId) -> Option<&Chunk> {
		self.slots.get(id.0 as usize).and_then(Option::as_ref)
	}

	pub(crate) fn get_mut(&mut self, id: ChunkId) -> Option<&mut Chunk> {
		self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
	}

	pub(crate) fn find(&self, attributes: &Attributes) -> Option<ChunkId> {
		self.by_content.get(attributes).copied()
	}

	/// Inserts a new chunk for an attribute map not already present.
	pub(crate) fn insert(
		&mut self,
		attributes: Attributes,
		creation: f64,
		mode: OptimizedLearning,
	) -> ChunkId {
		#[allow(clippy::cast_possible_truncation)]
		let id = ChunkId(self.slots.len() as u32);
		let _ = self.by_content.insert(attributes.clone(), id);
		self.index_chunk(id, &attributes);
		self.slots
			.push(Some(Chunk::new(id, attributes, creation, mode)));
		self.live += 1;
		trace!(chunk = %id, time = creation, "chunk created");
		id
	}

	/// Tombstones a chunk, unhooking it from the content map and index.
	pub(crate) fn remove(&mut self, id: ChunkId) {
		let Some(slot) = self.slots.get_mut(id.0 as usize) else {
			return;
		};
		if let Some(chunk) = slot.take() {
			let _ = self.by_content.remove(chunk.attributes());
			self.unindex_chunk(id, chunk.attributes());
			self.live -= 1;
			trace!(chunk = %id, "chunk removed");
		}
	}

	/// Live chunks in insertion order.
	pub(crate) fn iter(&self) -> impl Iterator<Item = &Chunk> {
		self.slots.iter().filter_map(Option::as_ref)
	}

	/// Live chunk ids in insertion order.
	pub(crate) fn ids(&self) -> impl Iterator<Item = ChunkId> + '_ {
		self.iter().map(Chunk::id)
	}

	/// Declares the indexed attributes and rebuilds the index.
	pub(crate) fn set_index(&mut self, attributes: Vec<String>) {
		self.indexed = attributes;
		self.index.clear();
		let pairs: Vec<(ChunkId, Attributes)> = self
			.iter()
			.map(|c| (c.id(), c.attributes().clone()))
			.collect();
		for (id, attributes) in pairs {
			self.index_chunk(id, &attributes);
		}
	}

	pub(crate) fn indexed_attributes(&self) -> &[String] {
		&self.indexed
	}

	/// Intersects index entries for the given exact-match pairs. `None`
	/// when no pair is indexed (the caller scans instead); otherwise the
	/// matching ids in insertion order.
	pub(crate) fn index_candidates(&self, pairs: &[(&str, &Value)]) -> Option<Vec<ChunkId>> {
		let mut result: Option<HashSet<ChunkId>> = None;
		for (name, value) in pairs {
			if !self.indexed.iter().any(|i| i == name) {
				continue;
			}
			let matching = self
				.index
				.get(*name)
				.and_then(|by_value| by_value.get(*value))
				.cloned()
				.unwrap_or_default();
			result = Some(match result {
				None => matching,
				Some(so_far) => so_far.intersection(&matching).copied().collect(),
			});
			if result.as_ref().is_some_and(HashSet::is_empty) {
				break;
			}
		}
		result.map(|set| {
			let mut ids: Vec<ChunkId> = set.into_iter().collect();
			ids.sort_unstable();
			ids
		})
	}

	/// Clears the store back to time zero. When `preserve_prepopulated`
	/// is set, chunks created at time zero survive with their histories
	/// collapsed to a single reference at zero.
	pub(crate) fn reset(&mut self, preserve_prepopulated: bool, mode: OptimizedLearning) {
		for slot in &mut self.slots {
			match slot {
				Some(chunk) if preserve_prepopulated && chunk.creation() == 0.0 => {
					chunk.references = References::new(mode);
					chunk.references.record(0.0);
				}
				_ => *slot = None,
			}
		}
		self.by_content.clear();
		self.index.clear();
		self.live = 0;
		let pairs: Vec<(ChunkId, Attributes)> = self
			.iter()
			.map(|c| (c.id(), c.attributes().clone()))
			.collect();
		self.live = pairs.len();
		for (id, attributes) in pairs {
			let _ = self.by_content.insert(attributes.clone(), id);
			self.index_chunk(id, &attributes);
		}
	}

	fn index_chunk(&mut self, id: ChunkId, attributes: &Attributes) {
		for name in &self.indexed {
			if let Some(value) = attributes.get(name) {
				let _ = self
					.index
					.entry(name.clone())
					.or_default()
					.entry(value.clone())
					.or_default()
					.insert(id);
			}
		}
	}

	fn unindex_chunk(&mut self, id: ChunkId, attributes: &Attributes) {
		for name in &self.indexed {
			if let Some(value) = attributes.get(name) {
				if let Some(set) = self
					.index
					.get_mut(name)
					.and_then(|by_value| by_value.get_mut(value))
				{
					let _ = set.remove(&id);
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attrs;

	fn store_with(index: &[&str]) -> ChunkStore {
		let mut store = ChunkStore::default();
		store.set_index(index.iter().map(|s| (*s).to_owned()).collect());
		store
	}

	#[test]
	fn test_content_addressing() {
		let mut store = ChunkStore::default();
		let a = store.insert(attrs! { "color" => "red" }, 0.0, OptimizedLearning::Off);
		let b = store.insert(attrs! { "color" => "blue" }, 1.0, OptimizedLearning::Off);
		assert_ne!(a, b);
		assert_eq!(store.find(&attrs! { "color" => "red" }), Some(a));
		assert_eq!(store.find(&attrs! { "color" => "green" }), None);
		assert_eq!(store.len(), 2);
	}

	#[test]
	fn test_insertion_order_survives_removal() {
		let mut store = ChunkStore::default();
		let a = store.insert(attrs! { "n" => 1 }, 0.0, OptimizedLearning::Off);
		let b = store.insert(attrs! { "n" => 2 }, 0.0, OptimizedLearning::Off);
		let c = store.insert(attrs! { "n" => 3 }, 0.0, OptimizedLearning::Off);
		store.remove(b);
		let ids: Vec<ChunkId> = store.ids().collect();
		assert_eq!(ids, vec![a, c]);
		assert_eq!(store.len(), 2);
		assert!(store.get(b).is_none());
		assert_eq!(store.find(&attrs! { "n" => 2 }), None);
	}

	#[test]
	fn test_index_intersection() {
		let mut store = store_with(&["color", "size"]);
		let a = store.insert(attrs! { "color" => "red", "size" => 1 }, 0.0, OptimizedLearning::Off);
		let b = store.insert(attrs! { "color" => "red", "size" => 2 }, 0.0, OptimizedLearning::Off);
		let _ = store.insert(attrs! { "color" => "blue", "size" => 1 }, 0.0, OptimizedLearning::Off);

		let red = Value::from("red");
		let one = Value::from(1);
		let candidates = store.index_candidates(&[("color", &red)]).unwrap();
		assert_eq!(candidates, vec![a, b]);
		let candidates = store.index_candidates(&[("color", &red), ("size", &one)]).unwrap();
		assert_eq!(candidates, vec![a]);
		// Unindexed attributes leave the decision to the caller.
		assert!(store.index_candidates(&[("shape", &red)]).is_none());
	}

	#[test]
	fn test_index_tracks_removal() {
		let mut store = store_with(&["color"]);
		let a = store.insert(attrs! { "color" => "red", "n" => 1 }, 0.0, OptimizedLearning::Off);
		let b = store.insert(attrs! { "color" => "red", "n" => 2 }, 0.0, OptimizedLearning::Off);
		store.remove(a);
		let red = Value::from("red");
		assert_eq!(store.index_candidates(&[("color", &red)]).unwrap(), vec![b]);
	}

	#[test]
	fn test_reset_preserving_prepopulated() {
		let mut store = ChunkStore::default();
		let a = store.insert(attrs! { "n" => 1 }, 0.0, OptimizedLearning::Off);
		store.get_mut(a).unwrap().references.record(0.0);
		store.get_mut(a).unwrap().references.record(3.0);
		let b = store.insert(attrs! { "n" => 2 }, 2.0, OptimizedLearning::Off);
		store.get_mut(b).unwrap().references.record(2.0);

		store.reset(true, OptimizedLearning::Off);
		assert_eq!(store.len(), 1);
		let survivor = store.get(a).unwrap();
		assert_eq!(survivor.reference_count(), 1);
		assert!(store.get(b).is_none());

		store.reset(false, OptimizedLearning::Off);
		assert!(store.is_empty());
	}
}
