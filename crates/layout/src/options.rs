//! Layout pass configuration.

use serde::Deserialize;
use thiserror::Error;

/// Tuning for the negotiation loop.
///
/// Every field has a default, so an empty document is valid:
///
/// ```toml
/// max_rounds = 4
/// epsilon = 1e-6
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutOptions {
	/// Contribution sweeps allowed per layout pass before giving up.
	pub max_rounds: u8,
	/// Group sizes closer than this count as unchanged between rounds.
	pub epsilon: f64,
}

impl LayoutOptions {
	/// Smallest usable cap: one round to contribute, one to confirm.
	pub const MIN_ROUNDS: u8 = 2;

	/// Parses and validates options from a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, OptionsError> {
		let options: Self = toml::from_str(source).map_err(|e| OptionsError::Parse(e.to_string()))?;
		options.validate()
	}

	/// Checks the numeric ranges.
	pub fn validate(self) -> Result<Self, OptionsError> {
		if self.max_rounds < Self::MIN_ROUNDS {
			return Err(OptionsError::TooFewRounds(self.max_rounds));
		}
		if !self.epsilon.is_finite() || self.epsilon < 0.0 {
			return Err(OptionsError::InvalidEpsilon(self.epsilon));
		}
		Ok(self)
	}
}

impl Default for LayoutOptions {
	fn default() -> Self {
		Self {
			max_rounds: 3,
			epsilon: 1e-9,
		}
	}
}

/// Rejected layout options.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
	#[error("failed to parse layout options: {0}")]
	Parse(String),
	#[error("max_rounds must be at least {min}, got {0}", min = LayoutOptions::MIN_ROUNDS)]
	TooFewRounds(u8),
	#[error("epsilon must be finite and non-negative, got {0}")]
	InvalidEpsilon(f64),
}
