//! One grid: ordered column and row definitions plus child cells.
//!
//! A layout pass drives a grid through three phases:
//!
//! 1. [`GridBox::contribute`] resolves every definition locally and reports
//!    grouped definitions' ideal sizes to a mutable [`SharedSizeScope`].
//! 2. [`GridBox::measure`] reads converged group sizes from an immutable
//!    [`GroupSizes`] view, reconciles, distributes star space and returns
//!    the desired size.
//! 3. [`GridBox::arrange`] redistributes star space against the final
//!    rectangle and assigns definition sizes and cell rectangles.
//!
//! The borrow types encode the ordering: contribution needs `&mut` access to
//! the scope, reconciliation only ever sees a shared view.

mod solve;

#[cfg(test)]
mod invariants;

use rustc_hash::FxHashMap as HashMap;
use trellis_primitives::{Axis, Rect, Size};

use self::solve::{AxisSolution, Measured};
use crate::cell::Cell;
use crate::definition::{DefinitionId, DefinitionMut, DimensionDefinition};
use crate::error::{ConfigurationError, Result};
use crate::group::GroupKey;
use crate::invalidation::Invalidation;
use crate::scope::{GroupSizes, SharedSizeScope};

/// Measures the child placed in one cell.
pub trait CellMeasure {
	/// Natural size of the child in cell `index` under `constraint`.
	fn measure_cell(&mut self, index: usize, constraint: Size) -> Size;
}

impl<F> CellMeasure for F
where
	F: FnMut(usize, Size) -> Size,
{
	fn measure_cell(&mut self, index: usize, constraint: Size) -> Size {
		self(index, constraint)
	}
}

/// A grid box and its per-axis solver state.
#[derive(Debug, Default)]
pub struct GridBox {
	columns: Vec<DimensionDefinition>,
	rows: Vec<DimensionDefinition>,
	cells: Vec<Cell>,
	tracker: Invalidation,
	/// Definitions last reported to a scope and the key they used.
	contributed: HashMap<DefinitionId, GroupKey>,
	measured: Option<Measured>,
	content: Size,
}

impl GridBox {
	/// Creates an empty grid (one implicit star column and row).
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a grid with the given definitions.
	pub fn with_definitions(
		columns: Vec<DimensionDefinition>,
		rows: Vec<DimensionDefinition>,
	) -> Self {
		Self {
			columns,
			rows,
			..Self::default()
		}
	}

	/// Definitions along `axis`, in layout order.
	pub fn definitions(&self, axis: Axis) -> &[DimensionDefinition] {
		match axis {
			Axis::Horizontal => &self.columns,
			Axis::Vertical => &self.rows,
		}
	}

	pub fn columns(&self) -> &[DimensionDefinition] {
		&self.columns
	}

	pub fn rows(&self) -> &[DimensionDefinition] {
		&self.rows
	}

	pub fn definition(&self, axis: Axis, index: usize) -> Option<&DimensionDefinition> {
		self.definitions(axis).get(index)
	}

	/// Mutable access to one definition; changes invalidate the grid.
	pub fn definition_mut(&mut self, axis: Axis, index: usize) -> Option<DefinitionMut<'_>> {
		let definitions = match axis {
			Axis::Horizontal => &mut self.columns,
			Axis::Vertical => &mut self.rows,
		};
		Some(DefinitionMut {
			definition: definitions.get_mut(index)?,
			tracker: &mut self.tracker,
		})
	}

	/// Appends a definition.
	pub fn push_definition(&mut self, axis: Axis, definition: DimensionDefinition) {
		self.definitions_mut(axis).push(definition);
		self.tracker.invalidate();
	}

	/// Inserts a definition at `index` (which may equal the length).
	pub fn insert_definition(
		&mut self,
		axis: Axis,
		index: usize,
		definition: DimensionDefinition,
	) -> Result<()> {
		let definitions = self.definitions_mut(axis);
		let len = definitions.len();
		if index > len {
			return Err(ConfigurationError::IndexOutOfRange { axis, index, len });
		}
		definitions.insert(index, definition);
		self.tracker.invalidate();
		Ok(())
	}

	/// Removes and returns the definition at `index`.
	///
	/// Its contribution is withdrawn on the next contribution sweep. The
	/// returned definition carries a new [`DefinitionId`].
	pub fn remove_definition(&mut self, axis: Axis, index: usize) -> Result<DimensionDefinition> {
		let definitions = self.definitions_mut(axis);
		let len = definitions.len();
		if index >= len {
			return Err(ConfigurationError::IndexOutOfRange { axis, index, len });
		}
		let removed = definitions.remove(index);
		self.tracker.invalidate();
		Ok(removed.detached())
	}

	/// Replaces the definition at `index`, returning the old one.
	///
	/// Equivalent to a remove followed by an insert at the same index, so the
	/// old definition comes back under a new [`DefinitionId`].
	pub fn replace_definition(
		&mut self,
		axis: Axis,
		index: usize,
		definition: DimensionDefinition,
	) -> Result<DimensionDefinition> {
		let definitions = self.definitions_mut(axis);
		let len = definitions.len();
		let slot = definitions
			.get_mut(index)
			.ok_or(ConfigurationError::IndexOutOfRange { axis, index, len })?;
		let old = std::mem::replace(slot, definition);
		self.tracker.invalidate();
		Ok(old.detached())
	}

	/// Removes every definition along `axis`.
	pub fn clear_definitions(&mut self, axis: Axis) -> Vec<DimensionDefinition> {
		let removed = std::mem::take(self.definitions_mut(axis));
		self.tracker.invalidate();
		removed.into_iter().map(DimensionDefinition::detached).collect()
	}

	fn definitions_mut(&mut self, axis: Axis) -> &mut Vec<DimensionDefinition> {
		match axis {
			Axis::Horizontal => &mut self.columns,
			Axis::Vertical => &mut self.rows,
		}
	}

	pub fn cells(&self) -> &[Cell] {
		&self.cells
	}

	pub fn cell(&self, index: usize) -> Option<&Cell> {
		self.cells.get(index)
	}

	/// Appends a cell and returns its index.
	pub fn push_cell(&mut self, cell: Cell) -> usize {
		self.cells.push(cell);
		self.tracker.invalidate();
		self.cells.len() - 1
	}

	/// Inserts a cell at `index` (which may equal the length).
	pub fn insert_cell(&mut self, index: usize, cell: Cell) -> Result<()> {
		let len = self.cells.len();
		if index > len {
			return Err(ConfigurationError::CellIndexOutOfRange { index, len });
		}
		self.cells.insert(index, cell);
		self.tracker.invalidate();
		Ok(())
	}

	/// Removes and returns the cell at `index`.
	pub fn remove_cell(&mut self, index: usize) -> Result<Cell> {
		let len = self.cells.len();
		if index >= len {
			return Err(ConfigurationError::CellIndexOutOfRange { index, len });
		}
		let removed = self.cells.remove(index);
		self.tracker.invalidate();
		Ok(removed)
	}

	/// Replaces the cell at `index`, returning the old one.
	pub fn replace_cell(&mut self, index: usize, cell: Cell) -> Result<Cell> {
		let len = self.cells.len();
		let slot = self
			.cells
			.get_mut(index)
			.ok_or(ConfigurationError::CellIndexOutOfRange { index, len })?;
		let old = std::mem::replace(slot, cell);
		self.tracker.invalidate();
		Ok(old)
	}

	/// Records that the child in cell `index` changed its natural size.
	pub fn invalidate_cell(&mut self, index: usize) -> Result<()> {
		let len = self.cells.len();
		let cell = self
			.cells
			.get_mut(index)
			.ok_or(ConfigurationError::CellIndexOutOfRange { index, len })?;
		cell.clear_natural();
		self.tracker.invalidate();
		Ok(())
	}

	/// Drops every cached measurement.
	pub fn invalidate(&mut self) {
		for cell in &mut self.cells {
			cell.clear_natural();
		}
		self.tracker.invalidate();
	}

	/// True until an arrange completes after the last invalidation.
	pub fn is_dirty(&self) -> bool {
		self.tracker.is_dirty()
	}

	/// Counter bumped by every invalidating change.
	pub fn revision(&self) -> u64 {
		self.tracker.revision()
	}

	/// Groups this grid currently reports to its scope.
	pub fn contributions(&self) -> impl Iterator<Item = (DefinitionId, &GroupKey)> {
		self.contributed.iter().map(|(id, key)| (*id, key))
	}

	/// Contribution sweep: resolves locally and reports grouped definitions.
	///
	/// Contributions of definitions that were removed, replaced or left their
	/// group since the last sweep are withdrawn first.
	pub fn contribute(
		&mut self,
		available: Size,
		measurer: &mut dyn CellMeasure,
		scope: &mut SharedSizeScope,
	) {
		let plans = self.local_pass(available, measurer);

		let mut current: HashMap<DefinitionId, GroupKey> = HashMap::default();
		for (axis, plan) in Axis::ALL.into_iter().zip(&plans) {
			for (definition, track) in self.definitions(axis).iter().zip(&plan.tracks) {
				if let Some(group) = definition.group() {
					current.insert(definition.id(), group.clone());
					scope.contribute(definition.id(), group, track.base);
				}
			}
		}

		for (id, group) in &self.contributed {
			if !current.contains_key(id) {
				tracing::trace!(contributor = id.get(), %group, "Definition left its group");
				scope.withdraw(*id);
			}
		}
		self.contributed = current;
	}

	/// Withdraws everything this grid reported, e.g. before it is detached.
	pub fn withdraw_all(&mut self, scope: &mut SharedSizeScope) {
		for id in self.contributed.keys() {
			scope.withdraw(*id);
		}
		self.contributed.clear();
	}

	/// Forgets contributions made to a scope that no longer exists.
	pub fn forget_contributions(&mut self) {
		self.contributed.clear();
	}

	/// Reconciliation sweep: returns the desired size under `available`.
	///
	/// Grouped definitions adopt the converged size from `groups`, clamped to
	/// their own bounds; a group missing from `groups` falls back to the
	/// definition's own ideal. Results are memoized per constraint and set of
	/// received group sizes until the next invalidation.
	pub fn measure(
		&mut self,
		available: Size,
		measurer: &mut dyn CellMeasure,
		groups: &dyn GroupSizes,
	) -> Size {
		let key = self.measure_key(available, groups);
		if let Some(desired) = self.tracker.cached(&key) {
			return desired;
		}

		let plans = self.local_pass(available, measurer);
		let [columns, rows] = plans.map(|plan| plan.reconcile(groups));
		let measured = Measured { columns, rows };
		let desired = measured.desired();

		let mut content = Size::ZERO;
		for axis in Axis::ALL {
			let sizes = measured.axis(axis).distribute(available.get(axis));
			self.write_actuals(axis, &sizes);
			content = content.with(axis, sizes.iter().sum());
		}
		self.content = content;
		self.measured = Some(measured);
		self.tracker.store(key, desired);
		desired
	}

	/// Assigns final definition sizes and cell rectangles inside `final_rect`.
	///
	/// Reuses the last measurement; a grid that was never measured is laid
	/// out as if every cell were empty.
	pub fn arrange(&mut self, final_rect: Rect) {
		let measured = match self.measured.take() {
			Some(measured) => measured,
			None => Measured {
				columns: AxisSolution::unmeasured(&self.columns),
				rows: AxisSolution::unmeasured(&self.rows),
			},
		};

		let widths = measured.columns.distribute(final_rect.width);
		let heights = measured.rows.distribute(final_rect.height);
		self.write_actuals(Axis::Horizontal, &widths);
		self.write_actuals(Axis::Vertical, &heights);
		self.content = Size::new(widths.iter().sum(), heights.iter().sum());

		let x_offsets = offsets(&widths);
		let y_offsets = offsets(&heights);
		for cell in &mut self.cells {
			let cols = cell.range(Axis::Horizontal, widths.len());
			let rows = cell.range(Axis::Vertical, heights.len());
			let rect = Rect::new(
				final_rect.x + x_offsets[cols.start],
				final_rect.y + y_offsets[rows.start],
				widths[cols].iter().sum(),
				heights[rows].iter().sum(),
			);
			cell.set_rect(rect);
		}

		self.measured = Some(measured);
		self.tracker.mark_arranged();
	}

	/// Sum of the resolved definition sizes on each axis.
	pub fn content_size(&self) -> Size {
		self.content
	}

	/// Start offset of every definition along `axis`, relative to the grid.
	pub fn offsets(&self, axis: Axis) -> Vec<f64> {
		let sizes: Vec<f64> = self.definitions(axis).iter().map(|d| d.actual()).collect();
		let mut offsets = offsets(&sizes);
		offsets.pop();
		offsets
	}

	fn write_actuals(&mut self, axis: Axis, sizes: &[f64]) {
		for (definition, size) in self.definitions_mut(axis).iter_mut().zip(sizes) {
			definition.set_actual(*size);
		}
	}
}

/// Cumulative start offsets, with the total as the final entry.
fn offsets(sizes: &[f64]) -> Vec<f64> {
	let mut offsets = Vec::with_capacity(sizes.len() + 1);
	let mut acc = 0.0;
	offsets.push(acc);
	for size in sizes {
		acc += size;
		offsets.push(acc);
	}
	offsets
}
