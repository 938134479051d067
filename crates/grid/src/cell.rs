//! Child placement within a grid.

use trellis_primitives::{Axis, Rect, Size};

use crate::error::{ConfigurationError, Result};

/// Placement of one child box plus its cached measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
	row: usize,
	col: usize,
	row_span: usize,
	col_span: usize,
	/// Natural size keyed by the constraint it was measured under.
	natural: Option<(Size, Size)>,
	rect: Rect,
}

impl Cell {
	/// Single-definition cell at `row`, `col`.
	pub fn at(row: usize, col: usize) -> Self {
		Self {
			row,
			col,
			row_span: 1,
			col_span: 1,
			natural: None,
			rect: Rect::default(),
		}
	}

	/// Sets the spans; both must be at least 1.
	pub fn with_span(mut self, row_span: usize, col_span: usize) -> Result<Self> {
		if row_span == 0 || col_span == 0 {
			return Err(ConfigurationError::ZeroSpan);
		}
		self.row_span = row_span;
		self.col_span = col_span;
		Ok(self)
	}

	pub fn row(&self) -> usize {
		self.row
	}

	pub fn col(&self) -> usize {
		self.col
	}

	pub fn row_span(&self) -> usize {
		self.row_span
	}

	pub fn col_span(&self) -> usize {
		self.col_span
	}

	/// First definition index along `axis`.
	pub fn start(&self, axis: Axis) -> usize {
		match axis {
			Axis::Horizontal => self.col,
			Axis::Vertical => self.row,
		}
	}

	/// Number of definitions spanned along `axis`.
	pub fn span(&self, axis: Axis) -> usize {
		match axis {
			Axis::Horizontal => self.col_span,
			Axis::Vertical => self.row_span,
		}
	}

	/// Definition index range covered along `axis`, clamped to `count`
	/// definitions. Out-of-range starts land in the last definition.
	pub fn range(&self, axis: Axis, count: usize) -> std::ops::Range<usize> {
		if count == 0 {
			return 0..0;
		}
		let start = self.start(axis).min(count - 1);
		let end = start.saturating_add(self.span(axis)).min(count);
		start..end
	}

	/// Last measured natural size, if any.
	pub fn natural_size(&self) -> Option<Size> {
		self.natural.map(|(_, size)| size)
	}

	/// Constraint of the last measurement, if any.
	pub fn measured_constraint(&self) -> Option<Size> {
		self.natural.map(|(constraint, _)| constraint)
	}

	/// Rectangle assigned by the last arrange.
	pub fn rect(&self) -> Rect {
		self.rect
	}

	pub(crate) fn cached_natural(&self, constraint: Size) -> Option<Size> {
		match self.natural {
			Some((cached, size)) if cached == constraint => Some(size),
			_ => None,
		}
	}

	pub(crate) fn store_natural(&mut self, constraint: Size, size: Size) {
		self.natural = Some((constraint, size));
	}

	pub(crate) fn clear_natural(&mut self) {
		self.natural = None;
	}

	pub(crate) fn set_rect(&mut self, rect: Rect) {
		self.rect = rect;
	}
}
