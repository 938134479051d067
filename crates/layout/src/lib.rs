//! Layout tree driving grids through shared-size negotiation.
//!
//! A [`LayoutTree`] holds grids and opaque [`Content`] leaves. Each call to
//! [`LayoutTree::layout`] runs rounds of two sweeps: every grid contributes
//! its grouped definitions to the nearest scope, then every grid reconciles
//! against frozen group sizes. Rounds repeat until the group sizes settle
//! or [`LayoutOptions::max_rounds`] is reached, and the result is arranged.

mod content;
mod error;
mod options;
mod tree;

pub use content::Content;
pub use error::{LayoutError, Result};
pub use options::{LayoutOptions, OptionsError};
pub use tree::{LayoutOutcome, LayoutTree, NodeId};
pub use trellis_grid::{Cell, DimensionDefinition, GridBox, GridLength, GroupKey, ResolvedGroups};
pub use trellis_primitives::{Axis, Point, Rect, Size};
