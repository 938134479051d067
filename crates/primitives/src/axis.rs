//! Layout axes.

/// Axis along which a dimension is measured.
///
/// Columns are sized along [`Axis::Horizontal`] (widths), rows along
/// [`Axis::Vertical`] (heights).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
	Horizontal,
	Vertical,
}

impl Axis {
	/// Both axes, columns first.
	pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

	/// Human readable name of the definitions sized along this axis.
	pub const fn definition_kind(self) -> &'static str {
		match self {
			Axis::Horizontal => "column",
			Axis::Vertical => "row",
		}
	}
}

impl std::fmt::Display for Axis {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Axis::Horizontal => "horizontal",
			Axis::Vertical => "vertical",
		})
	}
}
