//! Error Types
//!
//! Every failure mode of the engine, as one enum. A failed operation
//! leaves the memory unchanged; absence of a result (nothing matched,
//! everything fell below threshold) is `Ok(None)` rather than an error.

/// Result alias for all fallible engine operations.
pub type Result<T> = std::result::Result<T, MemoryError>;

/// Errors surfaced by a [`Memory`](crate::Memory).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
	/// A parameter was set outside its domain.
	#[error("invalid parameter: {0}")]
	InvalidParameter(String),

	/// Time was advanced backward, or a reference time is inconsistent
	/// with the memory's clock.
	#[error("invalid time: {0}")]
	InvalidTime(String),

	/// A blend or salience targeted an attribute absent from every
	/// candidate chunk.
	#[error("attribute {0:?} is not present on any candidate chunk")]
	UnknownAttribute(String),

	/// A blend output attribute held a non-numeric value on a candidate.
	#[error("cannot blend attribute {attribute:?}: chunk {chunk} holds a non-numeric value")]
	NonNumericBlend {
		/// The output attribute being blended.
		attribute: String,
		/// Name of the offending chunk.
		chunk: String,
	},

	/// A salience computation needed a similarity derivative that is not
	/// registered, or probed it at equal values with no fallback policy.
	#[error("derivative for attribute {0:?} is undefined here")]
	UndefinedDerivative(String),

	/// A user-supplied similarity function broke its contract: a value
	/// out of range, an asymmetric result, or no result at all.
	#[error("similarity contract violation: {0}")]
	SimilarityContract(String),

	/// Salience was requested without an activation-history trace of a
	/// preceding blend.
	#[error("salience requires the activation-history recorder to have captured a blend")]
	TraceRequired,
}
