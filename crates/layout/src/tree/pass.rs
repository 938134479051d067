//! The negotiation loop: contribution, reconciliation, arrange.

use std::mem;

use rustc_hash::FxHashMap as HashMap;
use trellis_grid::{GridBox, ResolvedGroups};
use trellis_primitives::{Rect, Size};

use super::{LayoutTree, NodeId, NodeKind};
use crate::error::{LayoutError, Result};

/// Result of one [`LayoutTree::layout`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOutcome {
	/// Desired size of the root.
	pub desired: Size,
	/// Contribution sweeps that ran.
	pub rounds: u8,
	/// False when group sizes were still moving after the last round. The
	/// tree is arranged either way.
	pub converged: bool,
}

impl LayoutOutcome {
	/// Turns a non-converged outcome into [`LayoutError::IterationLimitExceeded`].
	pub fn into_result(self) -> Result<Self> {
		if self.converged {
			Ok(self)
		} else {
			Err(LayoutError::IterationLimitExceeded { rounds: self.rounds })
		}
	}
}

impl LayoutTree {
	/// Lays out the tree rooted at `root` within `available`.
	///
	/// Each round first runs a full contribution sweep, then freezes every
	/// scope. If no scope changed since the sizes the last reconciliation
	/// used, the layout has converged; otherwise a reconciliation sweep
	/// measures the tree against the new sizes and another round follows.
	/// The root is arranged at the origin, taking the available extent or,
	/// on an unbounded axis, its desired extent.
	pub fn layout(&mut self, root: NodeId, available: Size) -> Result<LayoutOutcome> {
		self.node(root)?;
		let _span = tracing::debug_span!("layout_pass", %root).entered();

		let mut desired = None;
		let mut converged = false;
		let mut rounds = 0;
		for round in 1..=self.options.max_rounds {
			rounds = round;
			self.contribute_node(root, available);
			let changed = self.refresh_snapshots();
			tracing::debug!(round, changed, scopes = self.resolved.len(), "Negotiation round");

			if changed || desired.is_none() {
				desired = Some(self.measure_node(root, available));
			}
			if !changed {
				converged = true;
				break;
			}
		}

		let desired = match desired {
			Some(desired) => desired,
			None => self.measure_node(root, available),
		};
		if !converged {
			tracing::warn!(rounds, "Shared sizes did not converge; arranging last result");
		}

		self.arrange_node(root, Rect::from_size(available.or_finite(desired)));
		Ok(LayoutOutcome {
			desired,
			rounds,
			converged,
		})
	}

	/// Contribution sweep over the subtree of `id`.
	fn contribute_node(&mut self, id: NodeId, available: Size) {
		let Ok(scope_id) = self.scope_of(id) else {
			return;
		};
		let Some((mut grid, children, previous)) = self.take_grid(id) else {
			return;
		};

		if let Some(old) = previous.filter(|old| *old != scope_id) {
			match self.scopes.get_mut(&old) {
				Some(scope) => grid.withdraw_all(scope),
				None => grid.forget_contributions(),
			}
		}

		let mut scope = self.scopes.remove(&scope_id).unwrap_or_default();
		grid.contribute(
			available,
			&mut |index: usize, constraint: Size| self.measure_child(&children, index, constraint),
			&mut scope,
		);
		self.scopes.insert(scope_id, scope);

		let constraints: Vec<Size> = grid
			.cells()
			.iter()
			.map(|cell| cell.measured_constraint().unwrap_or(available))
			.collect();
		self.put_grid(id, grid, Some(scope_id));

		for (child, constraint) in children.into_iter().zip(constraints) {
			self.contribute_node(child, constraint);
		}
	}

	/// Reconciliation measure of `id` against the current snapshots.
	fn measure_node(&mut self, id: NodeId, available: Size) -> Size {
		let Ok(node) = self.node_mut(id) else {
			return Size::ZERO;
		};
		if let NodeKind::Content(content) = &node.kind {
			let desired = content.natural_size(available);
			node.desired = Some(desired);
			return desired;
		}

		let Ok(scope_id) = self.scope_of(id) else {
			return Size::ZERO;
		};
		let Some((mut grid, children, previous)) = self.take_grid(id) else {
			return Size::ZERO;
		};
		let groups = self.resolved.get(&scope_id).cloned().unwrap_or_default();
		let desired = grid.measure(
			available,
			&mut |index: usize, constraint: Size| self.measure_child(&children, index, constraint),
			&groups,
		);
		self.put_grid(id, grid, previous);
		if let Ok(node) = self.node_mut(id) {
			node.desired = Some(desired);
		}
		desired
	}

	fn measure_child(&mut self, children: &[NodeId], index: usize, constraint: Size) -> Size {
		match children.get(index) {
			Some(&child) => self.measure_node(child, constraint),
			None => Size::ZERO,
		}
	}

	fn arrange_node(&mut self, id: NodeId, rect: Rect) {
		let Ok(node) = self.node_mut(id) else {
			return;
		};
		node.rect = Some(rect);
		let Some((mut grid, children, previous)) = self.take_grid(id) else {
			return;
		};
		grid.arrange(rect);
		let rects: Vec<Rect> = grid.cells().iter().map(|cell| cell.rect()).collect();
		self.put_grid(id, grid, previous);

		for (child, rect) in children.into_iter().zip(rects) {
			self.arrange_node(child, rect);
		}
	}

	/// Freezes every scope; returns true if any differs from the sizes the
	/// last reconciliation used.
	fn refresh_snapshots(&mut self) -> bool {
		self.scopes.retain(|_, scope| !scope.is_empty());
		let next: HashMap<NodeId, ResolvedGroups> = self
			.scopes
			.iter()
			.map(|(id, scope)| (*id, scope.freeze()))
			.collect();

		let epsilon = self.options.epsilon;
		let changed = next.len() != self.resolved.len()
			|| next.iter().any(|(id, groups)| match self.resolved.get(id) {
				Some(previous) => !previous.approx_eq(groups, epsilon),
				None => true,
			});
		if changed {
			self.resolved = next;
			self.invalidate_containers();
		}
		changed
	}

	/// Moves a grid out of its node so the tree stays borrowable while the
	/// grid calls back into it.
	fn take_grid(&mut self, id: NodeId) -> Option<(GridBox, Vec<NodeId>, Option<NodeId>)> {
		let node = self.node_mut(id).ok()?;
		match &mut node.kind {
			NodeKind::Grid(grid) => Some((mem::take(grid), node.children.clone(), node.contributed_to)),
			NodeKind::Content(_) => None,
		}
	}

	fn put_grid(&mut self, id: NodeId, grid: GridBox, contributed_to: Option<NodeId>) {
		if let Ok(node) = self.node_mut(id) {
			if let NodeKind::Grid(slot) = &mut node.kind {
				*slot = grid;
			}
			node.contributed_to = contributed_to;
		}
	}
}
