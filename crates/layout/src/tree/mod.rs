//! Generational arena of layout nodes.
//!
//! Nodes are grids or content leaves. A grid's children line up with its
//! cells: child `i` is placed by cell `i`. Any node may be marked as a scope
//! boundary, owning the [`SharedSizeScope`] of every grid beneath it (itself
//! included) that has no nearer boundary. A grid with no boundary above it
//! negotiates only with itself.

mod pass;

#[cfg(test)]
mod invariants;

use std::fmt;

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use trellis_grid::{Cell, GridBox, ResolvedGroups, SharedSizeScope};
use trellis_primitives::{Rect, Size};

pub use self::pass::LayoutOutcome;
use crate::content::Content;
use crate::error::{LayoutError, Result};
use crate::options::LayoutOptions;

/// A generational node identifier.
///
/// Removing a node bumps its slot's generation, so ids held past removal
/// are rejected instead of reaching whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
	idx: u32,
	generation: u32,
}

impl NodeId {
	/// Slot index of this node.
	pub fn index(&self) -> usize {
		self.idx as usize
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}v{}", self.idx, self.generation)
	}
}

pub(crate) enum NodeKind {
	Grid(GridBox),
	Content(Box<dyn Content>),
}

impl fmt::Debug for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NodeKind::Grid(grid) => f.debug_tuple("Grid").field(grid).finish(),
			NodeKind::Content(_) => f.write_str("Content"),
		}
	}
}

#[derive(Debug)]
pub(crate) struct Node {
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	kind: NodeKind,
	scope_boundary: bool,
	/// Scope this grid's contributions currently live in.
	contributed_to: Option<NodeId>,
	desired: Option<Size>,
	rect: Option<Rect>,
}

impl Node {
	fn new(kind: NodeKind) -> Self {
		Self {
			parent: None,
			children: Vec::new(),
			kind,
			scope_boundary: false,
			contributed_to: None,
			desired: None,
			rect: None,
		}
	}
}

#[derive(Debug)]
struct Slot {
	generation: u32,
	node: Option<Node>,
}

/// Tree of grids and content leaves plus the scopes they negotiate in.
#[derive(Debug, Default)]
pub struct LayoutTree {
	slots: Vec<Slot>,
	free: Vec<u32>,
	scopes: HashMap<NodeId, SharedSizeScope>,
	/// Group sizes the last reconciliation sweep used, per scope.
	resolved: HashMap<NodeId, ResolvedGroups>,
	options: LayoutOptions,
}

impl LayoutTree {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a tree with custom pass options.
	///
	/// `max_rounds` is raised to [`LayoutOptions::MIN_ROUNDS`] if lower.
	pub fn with_options(options: LayoutOptions) -> Self {
		Self {
			options: LayoutOptions {
				max_rounds: options.max_rounds.max(LayoutOptions::MIN_ROUNDS),
				..options
			},
			..Self::default()
		}
	}

	pub fn options(&self) -> &LayoutOptions {
		&self.options
	}

	/// Adds a detached grid node.
	pub fn add_grid(&mut self, grid: GridBox) -> NodeId {
		self.allocate(Node::new(NodeKind::Grid(grid)))
	}

	/// Adds a detached content leaf.
	pub fn add_content(&mut self, content: impl Content + 'static) -> NodeId {
		self.allocate(Node::new(NodeKind::Content(Box::new(content))))
	}

	fn allocate(&mut self, node: Node) -> NodeId {
		if let Some(idx) = self.free.pop() {
			let slot = &mut self.slots[idx as usize];
			slot.node = Some(node);
			return NodeId {
				idx,
				generation: slot.generation,
			};
		}
		let idx = self.slots.len() as u32;
		self.slots.push(Slot {
			generation: 0,
			node: Some(node),
		});
		NodeId { idx, generation: 0 }
	}

	/// Returns true if `id` refers to a live node.
	pub fn contains(&self, id: NodeId) -> bool {
		self.node(id).is_ok()
	}

	pub(crate) fn node(&self, id: NodeId) -> Result<&Node> {
		self.slots
			.get(id.index())
			.filter(|slot| slot.generation == id.generation)
			.and_then(|slot| slot.node.as_ref())
			.ok_or(LayoutError::UnknownNode(id))
	}

	pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
		self.slots
			.get_mut(id.index())
			.filter(|slot| slot.generation == id.generation)
			.and_then(|slot| slot.node.as_mut())
			.ok_or(LayoutError::UnknownNode(id))
	}

	pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
		Ok(self.node(id)?.parent)
	}

	pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
		Ok(&self.node(id)?.children)
	}

	/// Appends `child` to `parent`, placed by `cell`.
	pub fn append_child(&mut self, parent: NodeId, child: NodeId, cell: Cell) -> Result<()> {
		let index = self.children(parent)?.len();
		self.insert_child(parent, index, child, cell)
	}

	/// Inserts `child` at `index` among `parent`'s children, placed by `cell`.
	pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId, cell: Cell) -> Result<()> {
		if self.node(child)?.parent.is_some() {
			return Err(LayoutError::AlreadyAttached(child));
		}
		if self.is_ancestor_or_self(child, parent)? {
			return Err(LayoutError::CycleDetected(child));
		}

		let node = self.node_mut(parent)?;
		let NodeKind::Grid(grid) = &mut node.kind else {
			return Err(LayoutError::NotAGrid(parent));
		};
		grid.insert_cell(index, cell)?;
		node.children.insert(index, child);

		self.node_mut(child)?.parent = Some(parent);
		self.invalidate_ancestors(parent);
		tracing::trace!(%parent, %child, index, "Attached node");
		Ok(())
	}

	/// Detaches the child at `index` and returns it.
	///
	/// The detached subtree keeps its nodes but withdraws every shared-size
	/// contribution it made.
	pub fn remove_child(&mut self, parent: NodeId, index: usize) -> Result<NodeId> {
		let node = self.node_mut(parent)?;
		let NodeKind::Grid(grid) = &mut node.kind else {
			return Err(LayoutError::NotAGrid(parent));
		};
		grid.remove_cell(index)?;
		let child = node.children.remove(index);

		self.node_mut(child)?.parent = None;
		self.withdraw_subtree(child);
		self.invalidate_ancestors(parent);
		tracing::trace!(%parent, %child, index, "Detached node");
		Ok(child)
	}

	/// Destroys `id` and its whole subtree, detaching it first.
	///
	/// Scopes owned by destroyed nodes are dropped with them.
	pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
		if let Some(parent) = self.node(id)?.parent {
			let index = self.children(parent)?.iter().position(|c| *c == id);
			if let Some(index) = index {
				self.remove_child(parent, index)?;
			}
		} else {
			self.withdraw_subtree(id);
		}

		for doomed in self.subtree(id) {
			self.scopes.remove(&doomed);
			self.resolved.remove(&doomed);
			if let Some(slot) = self.slots.get_mut(doomed.index()) {
				slot.node = None;
				slot.generation = slot.generation.wrapping_add(1);
				self.free.push(doomed.idx);
			}
		}
		Ok(())
	}

	/// Marks or unmarks `id` as owning a shared-size scope.
	///
	/// Clearing the flag tears the scope down; the grids that used it
	/// contribute to their new nearest scope on the next layout.
	pub fn set_scope_boundary(&mut self, id: NodeId, boundary: bool) -> Result<()> {
		let node = self.node_mut(id)?;
		if node.scope_boundary == boundary {
			return Ok(());
		}
		node.scope_boundary = boundary;

		if !boundary {
			for member in self.subtree(id) {
				if let Ok(node) = self.node_mut(member) {
					if node.contributed_to == Some(id) {
						node.contributed_to = None;
						if let NodeKind::Grid(grid) = &mut node.kind {
							grid.forget_contributions();
						}
					}
				}
			}
			self.scopes.remove(&id);
			self.resolved.remove(&id);
		}

		if let NodeKind::Grid(grid) = &mut self.node_mut(id)?.kind {
			grid.invalidate();
		}
		self.invalidate_ancestors(id);
		tracing::debug!(node = %id, boundary, "Scope boundary changed");
		Ok(())
	}

	pub fn is_scope_boundary(&self, id: NodeId) -> Result<bool> {
		Ok(self.node(id)?.scope_boundary)
	}

	/// Node whose scope the grid at `id` negotiates in.
	pub fn scope_of(&self, id: NodeId) -> Result<NodeId> {
		let mut current = id;
		loop {
			let node = self.node(current)?;
			if node.scope_boundary {
				return Ok(current);
			}
			match node.parent {
				Some(parent) => current = parent,
				None => return Ok(id),
			}
		}
	}

	/// Group sizes the last layout settled on in the scope owned by `id`.
	pub fn scope_sizes(&self, id: NodeId) -> Option<&ResolvedGroups> {
		self.resolved.get(&id)
	}

	pub fn grid(&self, id: NodeId) -> Result<&GridBox> {
		match &self.node(id)?.kind {
			NodeKind::Grid(grid) => Ok(grid),
			NodeKind::Content(_) => Err(LayoutError::NotAGrid(id)),
		}
	}

	/// Mutable access to a grid; the grid's ancestors are invalidated.
	pub fn grid_mut(&mut self, id: NodeId) -> Result<&mut GridBox> {
		self.grid(id)?;
		self.invalidate_ancestors(id);
		match &mut self.node_mut(id)?.kind {
			NodeKind::Grid(grid) => Ok(grid),
			NodeKind::Content(_) => Err(LayoutError::NotAGrid(id)),
		}
	}

	/// Replaces the content of a leaf.
	pub fn set_content(&mut self, id: NodeId, content: impl Content + 'static) -> Result<()> {
		let node = self.node_mut(id)?;
		match &mut node.kind {
			NodeKind::Content(current) => *current = Box::new(content),
			NodeKind::Grid(_) => return Err(LayoutError::NotContent(id)),
		}
		node.desired = None;
		self.invalidate_ancestors(id);
		Ok(())
	}

	/// Rectangle assigned by the last layout, in root coordinates.
	pub fn rect(&self, id: NodeId) -> Option<Rect> {
		self.node(id).ok()?.rect
	}

	/// Desired size reported by the last measurement.
	pub fn desired(&self, id: NodeId) -> Option<Size> {
		self.node(id).ok()?.desired
	}

	fn is_ancestor_or_self(&self, candidate: NodeId, id: NodeId) -> Result<bool> {
		let mut current = Some(id);
		while let Some(node) = current {
			if node == candidate {
				return Ok(true);
			}
			current = self.node(node)?.parent;
		}
		Ok(false)
	}

	/// `id` and all its descendants, parents before children.
	fn subtree(&self, id: NodeId) -> Vec<NodeId> {
		let mut out = Vec::new();
		let mut stack = vec![id];
		while let Some(current) = stack.pop() {
			if let Ok(node) = self.node(current) {
				out.push(current);
				stack.extend(node.children.iter().rev().copied());
			}
		}
		out
	}

	/// Withdraws every contribution made by grids in the subtree of `id`.
	fn withdraw_subtree(&mut self, id: NodeId) {
		for member in self.subtree(id) {
			let Self { slots, scopes, .. } = &mut *self;
			let Some(node) = slots.get_mut(member.index()).and_then(|s| s.node.as_mut()) else {
				continue;
			};
			let Some(scope_id) = node.contributed_to.take() else {
				continue;
			};
			if let NodeKind::Grid(grid) = &mut node.kind {
				match scopes.get_mut(&scope_id) {
					Some(scope) => grid.withdraw_all(scope),
					None => grid.forget_contributions(),
				}
			}
		}
	}

	/// Drops cached measurements along the path from `id` to its root.
	fn invalidate_ancestors(&mut self, id: NodeId) {
		let mut child = id;
		while let Some(parent) = self.node(child).ok().and_then(|n| n.parent) {
			let Ok(node) = self.node_mut(parent) else {
				break;
			};
			let index = node.children.iter().position(|c| *c == child);
			if let (NodeKind::Grid(grid), Some(index)) = (&mut node.kind, index) {
				let _ = grid.invalidate_cell(index);
			}
			child = parent;
		}
	}

	/// Drops cached measurements of every grid that contains another grid.
	///
	/// A nested grid's desired size depends on its received group sizes,
	/// which the containing grid's memo does not see.
	fn invalidate_containers(&mut self) {
		let grids: Vec<NodeId> = self
			.live()
			.filter(|(_, node)| matches!(node.kind, NodeKind::Grid(_)))
			.map(|(id, _)| id)
			.collect();
		let mut done: HashSet<NodeId> = HashSet::default();
		for id in grids {
			let mut current = self.node(id).ok().and_then(|n| n.parent);
			while let Some(parent) = current {
				if !done.insert(parent) {
					break;
				}
				let Ok(node) = self.node_mut(parent) else {
					break;
				};
				if let NodeKind::Grid(grid) = &mut node.kind {
					grid.invalidate();
				}
				current = node.parent;
			}
		}
	}

	fn live(&self) -> impl Iterator<Item = (NodeId, &Node)> {
		self.slots.iter().enumerate().filter_map(|(idx, slot)| {
			let node = slot.node.as_ref()?;
			let id = NodeId {
				idx: idx as u32,
				generation: slot.generation,
			};
			Some((id, node))
		})
	}
}
