//! # Engram Core
//!
//! A declarative-memory engine implementing the retrieval mathematics of
//! the ACT-R cognitive architecture: experiences are stored as chunks,
//! recalled probabilistically by frequency, recency, and feature
//! similarity, and aggregated into blended values that drive decisions.
//!
//! ## Why activation-based memory?
//!
//! A database returns what matches; human memory returns what is
//! *likely*. Likelihood here is an activation score with three parts:
//!
//! 1. **Base level** — recency and frequency of reinforcement
//!    ```text
//!    B = ln[Σ(t − t_j)^(−d)]
//!    ```
//! 2. **Noise** — logistic perturbation with scale σ, making recall
//!    stochastic the way human recall is
//! 3. **Partial matching** — a penalty `μ·Σ ω_k(S_k − 1)` for probe
//!    attributes that only nearly match
//!
//! Retrieval returns the most active matching chunk. Blending goes
//! further: it converts activations to retrieval probabilities with a
//! temperature-scaled softmax, `p_i ∝ exp(A_i/τ)`, and returns the
//! probability-weighted average of an outcome attribute — the engine of
//! instance-based learning models. Salience differentiates that average
//! with respect to a probe attribute, quantifying which features of the
//! situation drive the decision.
//!
//! ## Example
//!
//! ```rust
//! use engram_core::{attrs, Memory, Value};
//!
//! # fn main() -> engram_core::Result<()> {
//! let mut memory = Memory::new();
//! memory.set_noise(0.0)?;
//! memory.set_temperature(Some(1.0))?;
//!
//! // Learn a few experiences, a tick apart.
//! memory.learn_and_advance(attrs! { "color" => "red", "size" => 2 }, 1.0)?;
//! memory.learn_and_advance(attrs! { "color" => "blue", "size" => 30 }, 1.0)?;
//! memory.learn_and_advance(attrs! { "color" => "red", "size" => 1 }, 1.0)?;
//!
//! // Retrieve the most active chunk matching a probe.
//! let chunk = memory.retrieve(&attrs! { "color" => "blue" })?.expect("learned");
//! assert_eq!(chunk.get("size"), Some(&Value::Number(30.0)));
//!
//! // Blend an outcome over the matching chunks.
//! let blended = memory.blend("size", &attrs! { "color" => "red" })?.expect("candidates");
//! assert!(blended > 1.0 && blended < 2.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Design
//!
//! - One [`Memory`] is one agent; instances are independent and can run
//!   on separate threads. Nothing suspends; every operation is
//!   synchronous.
//! - Time is dimensionless and advances only when the model says so.
//! - The random number generator is per-memory and seedable, so runs
//!   are reproducible.
//! - The [`activation`] module exposes the bare math for models that
//!   want to compute components directly.
//!
//! ## References
//!
//! - Anderson, J. R. & Lebiere, C. (1998). *The Atomic Components of
//!   Thought* — ACT-R declarative memory
//! - Lebiere, C. (1999). *Blending: an ACT-R mechanism for aggregate
//!   retrievals* — blended values
//! - Gonzalez, C., Lerch, J. F. & Lebiere, C. (2003). *Instance-based
//!   learning in dynamic decision making* — the IBL loop these
//!   primitives serve

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod activation;
mod chunk;
mod error;
mod history;
mod memory;
mod params;
mod retrieval;
mod salience;
mod similarity;
mod store;
mod value;

pub use chunk::{Chunk, ChunkId, ReferencesUsed};
pub use error::{MemoryError, Result};
pub use history::HistoryRecord;
pub use memory::{FixedNoise, Memory};
pub use params::{
	OptimizedLearning, Parameters, SalienceFallback, ZeroAge, DEFAULT_DECAY, DEFAULT_NOISE,
	DEFAULT_THRESHOLD, MINIMUM_TEMPERATURE,
};
pub use similarity::{Derivative, Similarity};
pub use value::{Attributes, Value};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
