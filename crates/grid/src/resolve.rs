//! Length resolution and star distribution.
//!
//! Both functions are pure: they see numbers and a measurement callback,
//! never a grid.

use trellis_primitives::GridLength;

use crate::definition::clamp_to_bounds;

/// Outcome of resolving one length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
	/// Final size for the local pass.
	Fixed(f64),
	/// Star length: sized later from leftover space, never below `lower`.
	Deferred {
		/// Proportional factor.
		factor: f64,
		/// Content requirement clamped to the bounds.
		lower: f64,
	},
}

impl Resolution {
	/// The size this resolution guarantees before star distribution.
	pub fn floor(self) -> f64 {
		match self {
			Resolution::Fixed(size) => size,
			Resolution::Deferred { lower, .. } => lower,
		}
	}
}

/// Resolves `length` against `available` and a content measurement.
///
/// `Pixel` never measures. `Auto` measures under `available` (which may be
/// infinite). `Star` measures unconstrained to find its lower bound.
pub fn resolve_length(
	length: GridLength,
	min: f64,
	max: f64,
	available: f64,
	mut measure: impl FnMut(f64) -> f64,
) -> Resolution {
	match length {
		GridLength::Pixel(value) => Resolution::Fixed(clamp_to_bounds(value, min, max)),
		GridLength::Auto => Resolution::Fixed(clamp_to_bounds(measure(available), min, max)),
		GridLength::Star(factor) => Resolution::Deferred {
			factor,
			lower: clamp_to_bounds(measure(f64::INFINITY), min, max),
		},
	}
}

/// One star definition taking part in leftover distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarTrack {
	pub factor: f64,
	/// Content/min requirement; never undercut.
	pub lower: f64,
	pub upper: f64,
}

/// Splits `leftover` across `tracks` in proportion to their factors.
///
/// Tracks whose share falls outside `[lower, upper]` are frozen at the
/// violated bound and the rest is split again among the others, until no
/// track is clamped or every track is frozen. An infinite `leftover` means
/// there is nothing to distribute: every track sits at its lower bound.
pub fn distribute_stars(tracks: &[StarTrack], leftover: f64) -> Vec<f64> {
	if !leftover.is_finite() {
		return tracks.iter().map(|t| t.lower).collect();
	}

	let mut sizes = vec![0.0; tracks.len()];
	let mut frozen = vec![false; tracks.len()];
	let mut remaining = leftover.max(0.0);

	loop {
		let total_factor: f64 = tracks
			.iter()
			.zip(&frozen)
			.filter(|&(_, &f)| !f)
			.map(|(t, _)| t.factor)
			.sum();
		if total_factor <= 0.0 {
			break;
		}

		let mut violation = 0.0;
		for (i, track) in tracks.iter().enumerate() {
			if frozen[i] {
				continue;
			}
			let share = remaining * track.factor / total_factor;
			let clamped = clamp_to_bounds(share, track.lower, track.upper);
			sizes[i] = clamped;
			violation += clamped - share;
		}

		if violation == 0.0 {
			break;
		}

		// Freeze the side that overshot; the other side gets a fresh split.
		for (i, track) in tracks.iter().enumerate() {
			if frozen[i] {
				continue;
			}
			let share = remaining * track.factor / total_factor;
			let freeze = if violation > 0.0 {
				sizes[i] > share
			} else {
				sizes[i] < share
			};
			if freeze {
				frozen[i] = true;
			}
		}
		remaining = leftover.max(0.0)
			- sizes
				.iter()
				.zip(&frozen)
				.filter(|&(_, &f)| f)
				.map(|(s, _)| s)
				.sum::<f64>();
	}

	sizes
}
