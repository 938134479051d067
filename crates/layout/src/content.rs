//! Opaque leaf content.

use trellis_primitives::Size;

/// Anything that can report how large it wants to be.
///
/// The tree never looks inside content; it only asks for a natural size
/// under the space a grid cell offers, which may be unbounded on either
/// axis.
pub trait Content {
	fn natural_size(&self, constraint: Size) -> Size;
}

/// Fixed natural size, independent of the constraint.
impl Content for Size {
	fn natural_size(&self, _constraint: Size) -> Size {
		*self
	}
}

impl<F> Content for F
where
	F: Fn(Size) -> Size,
{
	fn natural_size(&self, constraint: Size) -> Size {
		self(constraint)
	}
}
