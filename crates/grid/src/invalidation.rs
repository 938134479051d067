//! Dirty tracking and measurement memoization for one grid.

use smallvec::SmallVec;
use trellis_primitives::Size;

/// Inputs a cached measurement was computed from.
///
/// Besides the constraint, a grid's desired size depends on the converged
/// sizes it received for its grouped definitions, so those are part of the
/// key: a scope converging differently never hits a stale entry.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MeasureKey {
	pub available: Size,
	pub received: SmallVec<[Option<f64>; 4]>,
}

/// Tracks whether a grid needs layout and memoizes its last measurement.
#[derive(Debug)]
pub(crate) struct Invalidation {
	dirty: bool,
	/// Incremented on every invalidating mutation.
	revision: u64,
	memo: Option<(MeasureKey, Size)>,
}

impl Invalidation {
	/// A fresh grid has never been arranged.
	pub fn new() -> Self {
		Self {
			dirty: true,
			revision: 0,
			memo: None,
		}
	}

	/// Drops the memoized measurement and marks the grid dirty.
	pub fn invalidate(&mut self) {
		self.dirty = true;
		self.revision = self.revision.wrapping_add(1);
		self.memo = None;
	}

	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	pub fn revision(&self) -> u64 {
		self.revision
	}

	pub fn cached(&self, key: &MeasureKey) -> Option<Size> {
		match &self.memo {
			Some((cached, desired)) if cached == key => Some(*desired),
			_ => None,
		}
	}

	pub fn store(&mut self, key: MeasureKey, desired: Size) {
		self.memo = Some((key, desired));
	}

	/// Clears the dirty flag; only a completed arrange may call this.
	pub fn mark_arranged(&mut self) {
		self.dirty = false;
	}
}

impl Default for Invalidation {
	fn default() -> Self {
		Self::new()
	}
}
