//! Activation History
//!
//! An optional trace of what retrieval saw: one record per candidate
//! with every intermediate quantity of its activation. Blends additionally
//! stamp each participating record with its retrieval probability, which
//! is what the salience computation differentiates.
//!
//! The recorder grows with every traced operation; models running in a
//! loop should clear it each iteration.

use crate::chunk::ReferencesUsed;
use crate::value::Attributes;
use serde::{Deserialize, Serialize};

/// One candidate's activation computation, as recorded during a
/// retrieval or blend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryRecord {
	/// The chunk's display name.
	pub name: String,
	/// The chunk's creation time.
	pub creation: f64,
	/// The chunk's attributes.
	pub attributes: Attributes,
	/// The reinforcement history used for the base level.
	pub references: ReferencesUsed,
	/// Whether the chunk stayed eligible through filtering and
	/// threshold culling.
	pub eligible: bool,
	/// Base-level activation, when one was computed.
	pub base_level: Option<f64>,
	/// The noise sample added to the activation.
	pub noise: Option<f64>,
	/// The partial-matching penalty, when partial matching is active.
	pub mismatch: Option<f64>,
	/// The total activation.
	pub activation: Option<f64>,
	/// The retrieval probability within a blend's candidate set.
	pub retrieval_probability: Option<f64>,
}

/// Bounds of the most recent blend within the recorder, used by
/// salience.
#[derive(Clone, Debug)]
pub(crate) struct BlendSpan {
	pub(crate) start: usize,
	pub(crate) len: usize,
	pub(crate) output: String,
}

/// The trace buffer. Disabled by default; enabling starts with a clean
/// buffer.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
	enabled: bool,
	records: Vec<HistoryRecord>,
	last_blend: Option<BlendSpan>,
}

impl Recorder {
	pub(crate) fn set_enabled(&mut self, enabled: bool) {
		if enabled != self.enabled {
			self.enabled = enabled;
			self.clear();
		}
	}

	pub(crate) fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub(crate) fn clear(&mut self) {
		self.records.clear();
		self.last_blend = None;
	}

	pub(crate) fn records(&self) -> &[HistoryRecord] {
		&self.records
	}

	/// Rolls the buffer back to `len` records, dropping any blend span
	/// that no longer fits. Used to unwind a failed operation.
	pub(crate) fn truncate(&mut self, len: usize) {
		self.records.truncate(len);
		if self
			.last_blend
			.as_ref()
			.is_some_and(|span| span.start + span.len > len)
		{
			self.last_blend = None;
		}
	}

	/// Appends a record, returning its index for later probability
	/// stamping. No-op when disabled.
	pub(crate) fn push(&mut self, record: HistoryRecord) -> Option<usize> {
		if !self.enabled {
			return None;
		}
		self.records.push(record);
		Some(self.records.len() - 1)
	}

	pub(crate) fn stamp_probability(&mut self, index: Option<usize>, probability: f64) {
		if let Some(record) = index.and_then(|i| self.records.get_mut(i)) {
			record.retrieval_probability = Some(probability);
		}
	}

	pub(crate) fn mark_ineligible(&mut self, index: Option<usize>) {
		if let Some(record) = index.and_then(|i| self.records.get_mut(i)) {
			record.eligible = false;
		}
	}

	pub(crate) fn begin_blend(&mut self) -> usize {
		self.records.len()
	}

	pub(crate) fn end_blend(&mut self, start: usize, output: &str) {
		if self.enabled {
			self.last_blend = Some(BlendSpan {
				start,
				len: self.records.len() - start,
				output: output.to_owned(),
			});
		}
	}

	pub(crate) fn last_blend(&self) -> Option<&BlendSpan> {
		self.last_blend.as_ref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attrs;

	fn record(name: &str) -> HistoryRecord {
		HistoryRecord {
			name: name.to_owned(),
			creation: 0.0,
			attributes: attrs! { "a" => 1 },
			references: ReferencesUsed::Times(vec![0.0]),
			eligible: true,
			base_level: Some(0.0),
			noise: Some(0.0),
			mismatch: None,
			activation: Some(0.0),
			retrieval_probability: None,
		}
	}

	#[test]
	fn test_disabled_recorder_drops_records() {
		let mut recorder = Recorder::default();
		assert_eq!(recorder.push(record("0000")), None);
		assert!(recorder.records().is_empty());
	}

	#[test]
	fn test_blend_span_tracks_last_blend() {
		let mut recorder = Recorder::default();
		recorder.set_enabled(true);
		let start = recorder.begin_blend();
		let i = recorder.push(record("0000"));
		recorder.stamp_probability(i, 0.75);
		recorder.end_blend(start, "outcome");
		let span = recorder.last_blend().expect("blend recorded");
		assert_eq!((span.start, span.len), (0, 1));
		assert_eq!(span.output, "outcome");
		assert_eq!(recorder.records()[0].retrieval_probability, Some(0.75));
	}

	#[test]
	fn test_clear_on_disable() {
		let mut recorder = Recorder::default();
		recorder.set_enabled(true);
		let _ = recorder.push(record("0000"));
		recorder.set_enabled(false);
		assert!(recorder.records().is_empty());
		assert!(recorder.last_blend().is_none());
	}
}
