//! Column and row definitions.

use std::sync::atomic::{AtomicU64, Ordering};

use trellis_primitives::GridLength;

use crate::error::{ConfigurationError, Result};
use crate::group::GroupKey;
use crate::invalidation::Invalidation;

static NEXT_DEFINITION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one definition object.
///
/// Every constructed (or cloned) definition gets a fresh id. A shared-size
/// scope tracks contributors by this id, so a definition replaced in place
/// is a new contributor rather than a continuation of the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionId(u64);

impl DefinitionId {
	fn next() -> Self {
		Self(NEXT_DEFINITION_ID.fetch_add(1, Ordering::Relaxed))
	}

	/// Raw id value, for diagnostics.
	pub const fn get(self) -> u64 {
		self.0
	}
}

/// One column or row of a grid.
///
/// Built through checked constructors, so a definition always holds a valid
/// length and consistent bounds. `actual` is written by the solver only.
#[derive(Debug)]
pub struct DimensionDefinition {
	id: DefinitionId,
	length: GridLength,
	min: f64,
	max: f64,
	group: Option<GroupKey>,
	actual: f64,
}

impl DimensionDefinition {
	/// Creates an ungrouped, unbounded definition.
	pub fn new(length: GridLength) -> Result<Self> {
		Ok(Self {
			id: DefinitionId::next(),
			length: length.validate()?,
			min: 0.0,
			max: f64::INFINITY,
			group: None,
			actual: 0.0,
		})
	}

	/// Fixed-size definition.
	pub fn pixel(value: f64) -> Result<Self> {
		Self::new(GridLength::Pixel(value))
	}

	/// Content-sized definition.
	pub fn auto() -> Self {
		Self::unchecked(GridLength::Auto)
	}

	/// Proportional definition.
	pub fn star(factor: f64) -> Result<Self> {
		Self::new(GridLength::Star(factor))
	}

	fn unchecked(length: GridLength) -> Self {
		Self {
			id: DefinitionId::next(),
			length,
			min: 0.0,
			max: f64::INFINITY,
			group: None,
			actual: 0.0,
		}
	}

	/// Sets the lower clamp.
	pub fn with_min(mut self, min: f64) -> Result<Self> {
		check_bounds(min, self.max)?;
		self.min = min;
		Ok(self)
	}

	/// Sets the upper clamp.
	pub fn with_max(mut self, max: f64) -> Result<Self> {
		check_bounds(self.min, max)?;
		self.max = max;
		Ok(self)
	}

	/// Sets both clamps.
	pub fn with_bounds(mut self, min: f64, max: f64) -> Result<Self> {
		check_bounds(min, max)?;
		self.min = min;
		self.max = max;
		Ok(self)
	}

	/// Joins the shared-size group `group`.
	pub fn with_group(mut self, group: GroupKey) -> Self {
		self.group = Some(group);
		self
	}

	/// Joins the shared-size group named `name`.
	pub fn grouped(self, name: &str) -> Result<Self> {
		Ok(self.with_group(GroupKey::new(name)?))
	}

	pub fn id(&self) -> DefinitionId {
		self.id
	}

	pub fn length(&self) -> GridLength {
		self.length
	}

	pub fn min(&self) -> f64 {
		self.min
	}

	pub fn max(&self) -> f64 {
		self.max
	}

	pub fn group(&self) -> Option<&GroupKey> {
		self.group.as_ref()
	}

	/// Size resolved by the last measure or arrange.
	pub fn actual(&self) -> f64 {
		self.actual
	}

	/// Gives the definition a new identity once it leaves its grid.
	///
	/// The old id stays behind in that grid's contribution record, so the
	/// grid's next sweep withdraws only the old membership.
	pub(crate) fn detached(mut self) -> Self {
		self.id = DefinitionId::next();
		self
	}

	pub(crate) fn set_actual(&mut self, actual: f64) {
		self.actual = actual;
	}
}

impl Clone for DimensionDefinition {
	/// Clones the configuration under a fresh identity.
	fn clone(&self) -> Self {
		Self {
			id: DefinitionId::next(),
			length: self.length,
			min: self.min,
			max: self.max,
			group: self.group.clone(),
			actual: 0.0,
		}
	}
}

impl Default for DimensionDefinition {
	/// One share of the leftover space.
	fn default() -> Self {
		Self::unchecked(GridLength::ONE_STAR)
	}
}

/// Clamps `value` into `[min, max]`, letting `min` win when they conflict.
pub fn clamp_to_bounds(value: f64, min: f64, max: f64) -> f64 {
	value.min(max).max(min)
}

fn check_bounds(min: f64, max: f64) -> Result<()> {
	if !min.is_finite() || min < 0.0 {
		return Err(ConfigurationError::NegativeMin(min));
	}
	if max.is_nan() || max < 0.0 {
		return Err(ConfigurationError::InvalidMax(max));
	}
	if min > max {
		return Err(ConfigurationError::InvertedBounds { min, max });
	}
	Ok(())
}

/// Mutable access to a definition owned by a grid.
///
/// Every effective change invalidates the owning grid's cached measurement;
/// group changes are picked up as withdraw/contribute on the next
/// contribution sweep.
pub struct DefinitionMut<'a> {
	pub(crate) definition: &'a mut DimensionDefinition,
	pub(crate) tracker: &'a mut Invalidation,
}

impl DefinitionMut<'_> {
	/// Read access to the definition.
	pub fn get(&self) -> &DimensionDefinition {
		self.definition
	}

	/// Replaces the sizing mode.
	pub fn set_length(&mut self, length: GridLength) -> Result<()> {
		let length = length.validate()?;
		if self.definition.length != length {
			self.definition.length = length;
			self.tracker.invalidate();
		}
		Ok(())
	}

	/// Replaces both clamps.
	pub fn set_bounds(&mut self, min: f64, max: f64) -> Result<()> {
		check_bounds(min, max)?;
		if self.definition.min != min || self.definition.max != max {
			self.definition.min = min;
			self.definition.max = max;
			self.tracker.invalidate();
		}
		Ok(())
	}

	/// Replaces the lower clamp.
	pub fn set_min(&mut self, min: f64) -> Result<()> {
		let max = self.definition.max;
		self.set_bounds(min, max)
	}

	/// Replaces the upper clamp.
	pub fn set_max(&mut self, max: f64) -> Result<()> {
		let min = self.definition.min;
		self.set_bounds(min, max)
	}

	/// Joins, leaves or switches a shared-size group.
	pub fn set_group(&mut self, group: Option<GroupKey>) {
		if self.definition.group != group {
			self.definition.group = group;
			self.tracker.invalidate();
		}
	}
}

#[cfg(test)]
mod tests {
	use trellis_primitives::{GridLength, LengthError};

	use super::{DimensionDefinition, clamp_to_bounds};
	use crate::error::ConfigurationError;

	#[test]
	fn defaults_to_one_star() {
		let def = DimensionDefinition::default();
		assert_eq!(def.length(), GridLength::ONE_STAR);
		assert_eq!(def.min(), 0.0);
		assert_eq!(def.max(), f64::INFINITY);
		assert!(def.group().is_none());
	}

	#[test]
	fn rejects_invalid_lengths() {
		assert_eq!(
			DimensionDefinition::star(0.0).unwrap_err(),
			ConfigurationError::Length(LengthError::NonPositiveStar(0.0))
		);
		assert_eq!(
			DimensionDefinition::pixel(-3.0).unwrap_err(),
			ConfigurationError::Length(LengthError::NegativePixel(-3.0))
		);
	}

	#[test]
	fn rejects_inverted_bounds() {
		let err = DimensionDefinition::auto().with_bounds(10.0, 5.0).unwrap_err();
		assert_eq!(err, ConfigurationError::InvertedBounds { min: 10.0, max: 5.0 });
		let err = DimensionDefinition::auto().with_max(5.0).unwrap().with_min(6.0).unwrap_err();
		assert_eq!(err, ConfigurationError::InvertedBounds { min: 6.0, max: 5.0 });
	}

	#[test]
	fn rejects_negative_min() {
		assert_eq!(
			DimensionDefinition::auto().with_min(-1.0).unwrap_err(),
			ConfigurationError::NegativeMin(-1.0)
		);
	}

	#[test]
	fn clone_gets_fresh_identity() {
		let def = DimensionDefinition::pixel(10.0).unwrap().grouped("A").unwrap();
		let copy = def.clone();
		assert_ne!(def.id(), copy.id());
		assert_eq!(def.group(), copy.group());
		assert_eq!(def.length(), copy.length());
	}

	#[test]
	fn min_dominates_max_in_clamp() {
		assert_eq!(clamp_to_bounds(50.0, 0.0, 20.0), 20.0);
		assert_eq!(clamp_to_bounds(5.0, 10.0, 20.0), 10.0);
		assert_eq!(clamp_to_bounds(50.0, 30.0, 20.0), 30.0);
	}
}
