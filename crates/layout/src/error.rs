//! Layout tree errors.

use thiserror::Error;
use trellis_grid::ConfigurationError;

use crate::tree::NodeId;

/// Failure of a tree mutation or layout pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
	/// A grid rejected its input.
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(#[from] ConfigurationError),
	/// The id was never allocated or its node has been removed.
	#[error("unknown node {0}")]
	UnknownNode(NodeId),
	/// The operation needs a grid node.
	#[error("node {0} is not a grid")]
	NotAGrid(NodeId),
	/// The operation needs a content leaf.
	#[error("node {0} is not a content leaf")]
	NotContent(NodeId),
	/// The child already has a parent.
	#[error("node {0} is already attached")]
	AlreadyAttached(NodeId),
	/// Attaching would make a node its own ancestor.
	#[error("attaching node {0} would create a cycle")]
	CycleDetected(NodeId),
	/// Group sizes were still changing after the last allowed round.
	#[error("shared sizes did not converge within {rounds} rounds")]
	IterationLimitExceeded {
		/// Rounds that ran.
		rounds: u8,
	},
}

pub type Result<T> = std::result::Result<T, LayoutError>;
