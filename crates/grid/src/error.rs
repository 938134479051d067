//! Error types for grid configuration.

use thiserror::Error;
use trellis_primitives::{Axis, LengthError};

/// Rejected grid input.
///
/// Raised when a definition, cell or group key is built or mutated; the
/// engine never coerces bad input into something it can lay out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
	/// The sizing mode carries an unusable number.
	#[error(transparent)]
	Length(#[from] LengthError),

	/// Minimum extents must be finite and non-negative.
	#[error("minimum must be finite and non-negative, got {0}")]
	NegativeMin(f64),

	/// Maximum extents must be non-negative (infinity allowed).
	#[error("maximum must be non-negative, got {0}")]
	InvalidMax(f64),

	/// The minimum exceeds the maximum.
	#[error("minimum {min} exceeds maximum {max}")]
	InvertedBounds {
		/// Requested minimum.
		min: f64,
		/// Requested maximum.
		max: f64,
	},

	/// A shared-size group name is not a valid identifier.
	#[error("invalid shared size group name {0:?}")]
	InvalidGroupKey(String),

	/// A definition index is past the end of the collection.
	#[error("{} index {index} out of range (len {len})", .axis.definition_kind())]
	IndexOutOfRange {
		/// Axis of the definition collection.
		axis: Axis,
		/// Offending index.
		index: usize,
		/// Collection length at the time of the call.
		len: usize,
	},

	/// A cell index is past the end of the collection.
	#[error("cell index {index} out of range (len {len})")]
	CellIndexOutOfRange {
		/// Offending index.
		index: usize,
		/// Collection length at the time of the call.
		len: usize,
	},

	/// Cells must span at least one row and one column.
	#[error("cell spans must be at least 1")]
	ZeroSpan,
}

/// Result type for grid configuration operations.
pub type Result<T> = std::result::Result<T, ConfigurationError>;
