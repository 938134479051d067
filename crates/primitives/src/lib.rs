//! Value types shared by the trellis layout crates: geometry, axes and grid lengths.

/// Axis selection for per-axis layout computations.
pub mod axis;
/// Floating point sizes, points and rectangles.
pub mod geometry;
/// Sizing modes for one column or row.
pub mod length;

pub use axis::Axis;
pub use geometry::{Point, Rect, Size};
pub use length::{GridLength, LengthError};
