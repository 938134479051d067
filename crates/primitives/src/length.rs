//! Sizing modes for one column or row.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a [`GridLength`] carries an unusable number.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LengthError {
	/// Pixel lengths must be zero or positive.
	#[error("pixel length must not be negative, got {0}")]
	NegativePixel(f64),

	/// Star factors must be strictly positive.
	#[error("star factor must be positive, got {0}")]
	NonPositiveStar(f64),

	/// NaN and infinities are never valid lengths.
	#[error("length must be finite, got {0}")]
	NonFinite(f64),
}

/// How one dimension wants to be sized.
///
/// The variants are public so callers can match on them, but values built
/// directly are only accepted by the grid after [`GridLength::validate`]
/// succeeds; prefer the checked constructors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridLength {
	/// Fixed size in layout units.
	Pixel(f64),
	/// Sized to the content placed in the dimension.
	Auto,
	/// Proportional share of the space left over once every other
	/// dimension on the axis is resolved.
	Star(f64),
}

impl GridLength {
	/// Content-sized length.
	pub const AUTO: GridLength = GridLength::Auto;

	/// One share of the leftover space.
	pub const ONE_STAR: GridLength = GridLength::Star(1.0);

	/// Checked fixed length.
	pub fn pixel(value: f64) -> Result<Self, LengthError> {
		GridLength::Pixel(value).validate()
	}

	/// Checked proportional length.
	pub fn star(factor: f64) -> Result<Self, LengthError> {
		GridLength::Star(factor).validate()
	}

	/// Returns `self` if its number is usable.
	pub fn validate(self) -> Result<Self, LengthError> {
		match self {
			GridLength::Pixel(v) if !v.is_finite() => Err(LengthError::NonFinite(v)),
			GridLength::Pixel(v) if v < 0.0 => Err(LengthError::NegativePixel(v)),
			GridLength::Star(f) if !f.is_finite() => Err(LengthError::NonFinite(f)),
			GridLength::Star(f) if f <= 0.0 => Err(LengthError::NonPositiveStar(f)),
			other => Ok(other),
		}
	}
}

impl std::fmt::Display for GridLength {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			GridLength::Pixel(v) => write!(f, "{v}"),
			GridLength::Auto => f.write_str("auto"),
			GridLength::Star(factor) if *factor == 1.0 => f.write_str("*"),
			GridLength::Star(factor) => write!(f, "{factor}*"),
		}
	}
}
