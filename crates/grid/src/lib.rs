//! Grid layout with shared-size groups.
//!
//! A [`GridBox`] sizes its columns and rows from fixed pixel lengths, child
//! content (`Auto`) and proportional shares of leftover space (`Star`).
//! Definitions tagged with a [`GroupKey`] negotiate one common size with
//! every other definition under the same key in their [`SharedSizeScope`].

mod cell;
mod definition;
mod error;
mod grid_box;
mod group;
mod invalidation;
pub mod resolve;
mod scope;

pub use cell::Cell;
pub use definition::{DefinitionId, DefinitionMut, DimensionDefinition, clamp_to_bounds};
pub use error::{ConfigurationError, Result};
pub use grid_box::{CellMeasure, GridBox};
pub use group::GroupKey;
pub use scope::{GroupSizes, ResolvedGroups, SharedSizeScope};
pub use trellis_primitives::{Axis, GridLength, LengthError, Point, Rect, Size};
