use trellis_primitives::{Axis, Rect, Size};

use super::GridBox;
use crate::cell::Cell;
use crate::definition::DimensionDefinition;
use crate::group::GroupKey;
use crate::scope::{ResolvedGroups, SharedSizeScope};

fn px_in(value: f64, group: &str) -> DimensionDefinition {
	DimensionDefinition::pixel(value).unwrap().grouped(group).unwrap()
}

fn empty(_: usize, _: Size) -> Size {
	Size::ZERO
}

const AVAILABLE: Size = Size::new(300.0, 120.0);

/// Must give every grouped definition the converged group size after one contribution and one reconciliation sweep.
///
/// * Enforced in: `GridBox::contribute`, `SharedSizeScope::freeze`, `GridBox::measure`
/// * Failure symptom: columns that share a group key render at different widths.
#[cfg_attr(test, test)]
pub(crate) fn test_grouped_definitions_adopt_converged_size() {
	let mut scope = SharedSizeScope::new();
	let mut grids = [
		GridBox::with_definitions(vec![px_in(12.0, "Label")], Vec::new()),
		GridBox::with_definitions(vec![px_in(64.0, "Label")], Vec::new()),
		GridBox::with_definitions(vec![DimensionDefinition::auto().grouped("Label").unwrap()], Vec::new()),
	];
	for grid in &mut grids {
		grid.contribute(AVAILABLE, &mut empty, &mut scope);
	}
	let resolved = scope.freeze();
	for grid in &mut grids {
		grid.measure(AVAILABLE, &mut empty, &resolved);
	}

	for grid in &grids {
		assert_eq!(grid.columns()[0].actual(), 64.0);
	}
}

/// Must read group sizes only from a frozen snapshot during reconciliation.
///
/// * Enforced in: `GridBox::measure` (takes `&dyn GroupSizes`), `SharedSizeScope::freeze`
/// * Failure symptom: the first grid reconciled sees a half-populated scope and settles on a stale size.
#[cfg_attr(test, test)]
pub(crate) fn test_reconciliation_ignores_later_contributions() {
	let mut scope = SharedSizeScope::new();
	let mut early = GridBox::with_definitions(vec![px_in(10.0, "A")], Vec::new());
	early.contribute(AVAILABLE, &mut empty, &mut scope);
	let snapshot = scope.freeze();

	let mut late = GridBox::with_definitions(vec![px_in(90.0, "A")], Vec::new());
	late.contribute(AVAILABLE, &mut empty, &mut scope);

	early.measure(AVAILABLE, &mut empty, &snapshot);
	assert_eq!(early.columns()[0].actual(), 10.0);
	assert_eq!(scope.freeze().get("A"), Some(90.0));
}

/// Must never size a definition below its minimum, even when that overflows the box.
///
/// * Enforced in: `clamp_to_bounds`, `distribute_stars`
/// * Failure symptom: content with a minimum width is clipped when space runs short.
#[cfg_attr(test, test)]
pub(crate) fn test_minimum_is_never_violated() {
	let wide = DimensionDefinition::star(1.0).unwrap().with_min(250.0).unwrap();
	let narrow = DimensionDefinition::star(1.0).unwrap().with_min(100.0).unwrap();
	let mut grid = GridBox::with_definitions(vec![wide, narrow], Vec::new());
	grid.measure(AVAILABLE, &mut empty, &ResolvedGroups::empty());
	grid.arrange(Rect::from_size(AVAILABLE));

	assert_eq!(grid.columns()[0].actual(), 250.0);
	assert_eq!(grid.columns()[1].actual(), 100.0);
}

/// Must make the column sizes along a row add up to the box's content width.
///
/// * Enforced in: `GridBox::arrange`
/// * Failure symptom: cells overlap or leave unexplained gaps.
#[cfg_attr(test, test)]
pub(crate) fn test_column_sizes_sum_to_content_width() {
	let columns = vec![
		DimensionDefinition::pixel(40.0).unwrap(),
		DimensionDefinition::auto(),
		DimensionDefinition::star(2.0).unwrap(),
		DimensionDefinition::star(1.0).unwrap(),
	];
	let mut grid = GridBox::with_definitions(columns, Vec::new());
	grid.push_cell(Cell::at(0, 1));
	grid.measure(AVAILABLE, &mut |_: usize, _: Size| Size::new(35.0, 10.0), &ResolvedGroups::empty());
	grid.arrange(Rect::from_size(AVAILABLE));

	let total: f64 = grid.columns().iter().map(|d| d.actual()).sum();
	assert_eq!(total, grid.content_size().width);
	assert_eq!(total, AVAILABLE.width);
	let offsets = grid.offsets(Axis::Horizontal);
	assert_eq!(offsets, vec![0.0, 40.0, 75.0, 225.0]);
}

/// Must reject star factors that are zero or negative when a definition is built.
///
/// * Enforced in: `GridLength::validate`, `DimensionDefinition::new`
/// * Failure symptom: division by a zero factor sum during star distribution.
#[cfg_attr(test, test)]
pub(crate) fn test_non_positive_star_is_rejected() {
	assert!(DimensionDefinition::star(0.0).is_err());
	assert!(DimensionDefinition::star(-1.0).is_err());
}

/// Must withdraw a definition's contribution once it leaves its group or the grid.
///
/// * Enforced in: `GridBox::contribute`, `GridBox::withdraw_all`
/// * Failure symptom: a removed column keeps inflating the shared size of its old group.
#[cfg_attr(test, test)]
pub(crate) fn test_removed_definition_is_withdrawn() {
	let mut scope = SharedSizeScope::new();
	let mut grid = GridBox::with_definitions(vec![px_in(80.0, "A"), px_in(20.0, "A")], Vec::new());
	grid.contribute(AVAILABLE, &mut empty, &mut scope);
	grid.remove_definition(Axis::Horizontal, 0).unwrap();
	grid.contribute(AVAILABLE, &mut empty, &mut scope);

	let key = GroupKey::new("A").unwrap();
	assert_eq!(scope.contributor_count(&key), 1);
	assert_eq!(scope.resolve(&key), Some(20.0));
}

/// Must clear the dirty flag only when an arrange completes.
///
/// * Enforced in: `Invalidation::mark_arranged`, `GridBox::arrange`
/// * Failure symptom: a grid measured but never arranged is skipped by the next layout pass.
#[cfg_attr(test, test)]
pub(crate) fn test_dirty_until_arranged() {
	let mut grid = GridBox::new();
	grid.measure(AVAILABLE, &mut empty, &ResolvedGroups::empty());
	assert!(grid.is_dirty());
	grid.arrange(Rect::from_size(AVAILABLE));
	assert!(!grid.is_dirty());
	grid.clear_definitions(Axis::Vertical);
	assert!(grid.is_dirty());
}

/// Must withdraw only the membership a grid recorded itself, never one another grid now holds.
///
/// * Enforced in: `GridBox::remove_definition`, `GridBox::replace_definition`, `GridBox::clear_definitions` (returned definitions are re-identified)
/// * Failure symptom: a definition moved to a grid that contributes first loses its size when the grid it left sweeps.
#[cfg_attr(test, test)]
pub(crate) fn test_moved_definition_survives_sweep_of_former_grid() {
	let mut scope = SharedSizeScope::new();
	let mut target = GridBox::with_definitions(vec![px_in(10.0, "A")], Vec::new());
	let mut source = GridBox::with_definitions(vec![px_in(70.0, "A")], Vec::new());
	source.contribute(AVAILABLE, &mut empty, &mut scope);

	let moved = source.remove_definition(Axis::Horizontal, 0).unwrap();
	target.push_definition(Axis::Horizontal, moved);
	target.contribute(AVAILABLE, &mut empty, &mut scope);
	source.contribute(AVAILABLE, &mut empty, &mut scope);

	assert_eq!(scope.resolve(&GroupKey::new("A").unwrap()), Some(70.0));
}
