//! Abstract geometry types for layout.
//!
//! All extents are `f64` device-independent units. An extent of
//! [`f64::INFINITY`] on a [`Size`] used as a constraint means "unconstrained
//! along this axis"; arranged rectangles are always finite.

use serde::{Deserialize, Serialize};

use crate::Axis;


/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl Size {
	/// Zero extent on both axes.
	pub const ZERO: Size = Size::new(0.0, 0.0);

	/// Unconstrained on both axes.
	pub const INFINITY: Size = Size::new(f64::INFINITY, f64::INFINITY);

	/// Creates a new size.
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Returns the extent along `axis`.
	pub const fn get(&self, axis: Axis) -> f64 {
		match axis {
			Axis::Horizontal => self.width,
			Axis::Vertical => self.height,
		}
	}

	/// Returns a copy with the extent along `axis` replaced.
	pub const fn with(self, axis: Axis, value: f64) -> Self {
		match axis {
			Axis::Horizontal => Self::new(value, self.height),
			Axis::Vertical => Self::new(self.width, value),
		}
	}

	/// Returns true if the extent along `axis` is unconstrained.
	pub fn is_unbounded(&self, axis: Axis) -> bool {
		self.get(axis).is_infinite()
	}

	/// Replaces unconstrained extents with the matching extent of `fallback`.
	pub fn or_finite(self, fallback: Size) -> Self {
		Self::new(
			if self.width.is_finite() { self.width } else { fallback.width },
			if self.height.is_finite() { self.height } else { fallback.height },
		)
	}
}

/// A position (x, y coordinate).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	/// The origin.
	pub const ORIGIN: Point = Point::new(0.0, 0.0);

	/// Creates a new point.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Returns the coordinate along `axis`.
	pub const fn get(&self, axis: Axis) -> f64 {
		match axis {
			Axis::Horizontal => self.x,
			Axis::Vertical => self.y,
		}
	}
}

/// A rectangle with position and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	/// Creates a new rectangle.
	pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}

	/// Creates a rectangle of `size` anchored at the origin.
	pub const fn from_size(size: Size) -> Self {
		Self::new(0.0, 0.0, size.width, size.height)
	}

	/// Returns the top-left corner.
	pub const fn origin(&self) -> Point {
		Point::new(self.x, self.y)
	}

	/// Returns the dimensions.
	pub const fn size(&self) -> Size {
		Size::new(self.width, self.height)
	}

	/// Returns the right edge x coordinate (exclusive).
	pub fn right(&self) -> f64 {
		self.x + self.width
	}

	/// Returns the bottom edge y coordinate (exclusive).
	pub fn bottom(&self) -> f64 {
		self.y + self.height
	}

	/// Returns true if the rectangle has zero area.
	pub fn is_empty(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}

	/// Returns the rectangle moved by `origin`.
	pub fn translate(self, origin: Point) -> Self {
		Self::new(self.x + origin.x, self.y + origin.y, self.width, self.height)
	}

	/// Returns true if `point` lies inside (inclusive origin, exclusive max).
	pub fn contains(&self, point: Point) -> bool {
		point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
	}
}
