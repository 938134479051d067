use trellis_grid::{Cell, DimensionDefinition, GridBox};
use trellis_primitives::Size;

use super::{LayoutTree, NodeId};
use crate::error::LayoutError;

const AVAILABLE: Size = Size::new(240.0, 80.0);

fn grouped_auto() -> GridBox {
	GridBox::with_definitions(vec![DimensionDefinition::auto().grouped("Key").unwrap()], Vec::new())
}

fn width(tree: &LayoutTree, id: NodeId) -> f64 {
	tree.grid(id).unwrap().columns()[0].actual()
}

/// Must finish the contribution sweep for every grid in a scope before any grid in it reconciles.
///
/// * Enforced in: `LayoutTree::layout` (separate `contribute_node` and `measure_node` traversals)
/// * Failure symptom: grids visited early settle on a group size that later siblings would have raised.
#[cfg_attr(test, test)]
pub(crate) fn test_contribution_precedes_reconciliation() {
	let mut tree = LayoutTree::new();
	let root = tree.add_grid(GridBox::new());
	tree.set_scope_boundary(root, true).unwrap();
	let early = tree.add_grid(grouped_auto());
	let late = tree.add_grid(grouped_auto());
	let leaf = tree.add_content(Size::new(44.0, 4.0));
	tree.append_child(late, leaf, Cell::at(0, 0)).unwrap();
	tree.append_child(root, early, Cell::at(0, 0)).unwrap();
	tree.append_child(root, late, Cell::at(0, 0)).unwrap();

	tree.layout(root, AVAILABLE).unwrap();

	assert_eq!(width(&tree, early), 44.0);
	assert_eq!(width(&tree, late), 44.0);
}

/// Must register a grid only with its nearest scope boundary.
///
/// * Enforced in: `LayoutTree::scope_of`
/// * Failure symptom: groups inside a nested boundary leak into the outer scope and resize unrelated grids.
#[cfg_attr(test, test)]
pub(crate) fn test_nearest_scope_wins() {
	let mut tree = LayoutTree::new();
	let root = tree.add_grid(GridBox::new());
	let inner = tree.add_grid(GridBox::new());
	let nested = tree.add_grid(grouped_auto());
	let sibling = tree.add_grid(grouped_auto());
	let leaf = tree.add_content(Size::new(70.0, 4.0));
	tree.append_child(nested, leaf, Cell::at(0, 0)).unwrap();
	tree.append_child(inner, nested, Cell::at(0, 0)).unwrap();
	tree.append_child(root, inner, Cell::at(0, 0)).unwrap();
	tree.append_child(root, sibling, Cell::at(0, 0)).unwrap();
	tree.set_scope_boundary(root, true).unwrap();
	tree.set_scope_boundary(inner, true).unwrap();

	tree.layout(root, AVAILABLE).unwrap();

	assert_eq!(tree.scope_of(nested).unwrap(), inner);
	assert_eq!(width(&tree, nested), 70.0);
	assert_eq!(width(&tree, sibling), 0.0);
}

/// Must withdraw the contributions of a subtree when it is detached or destroyed.
///
/// * Enforced in: `LayoutTree::remove_child`, `LayoutTree::remove_node`
/// * Failure symptom: a removed grid keeps holding its group at a stale, larger size.
#[cfg_attr(test, test)]
pub(crate) fn test_removed_subtree_is_withdrawn() {
	let mut tree = LayoutTree::new();
	let root = tree.add_grid(GridBox::new());
	tree.set_scope_boundary(root, true).unwrap();
	let holder = tree.add_grid(grouped_auto());
	let peer = tree.add_grid(grouped_auto());
	let leaf = tree.add_content(Size::new(55.0, 4.0));
	tree.append_child(holder, leaf, Cell::at(0, 0)).unwrap();
	tree.append_child(root, holder, Cell::at(0, 0)).unwrap();
	tree.append_child(root, peer, Cell::at(0, 0)).unwrap();
	tree.layout(root, AVAILABLE).unwrap();
	assert_eq!(width(&tree, peer), 55.0);

	tree.remove_node(holder).unwrap();
	tree.layout(root, AVAILABLE).unwrap();

	assert_eq!(width(&tree, peer), 0.0);
}

/// Must report a non-converging negotiation instead of looping or panicking.
///
/// * Enforced in: `LayoutTree::layout`, `LayoutOutcome::into_result`
/// * Failure symptom: layout hangs, or callers cannot tell a best-effort layout from a settled one.
#[cfg_attr(test, test)]
pub(crate) fn test_round_cap_is_reported() {
	let mut tree = LayoutTree::new();
	let root = tree.add_grid(grouped_auto());
	let inner = tree.add_grid(GridBox::with_definitions(
		vec![
			DimensionDefinition::auto().grouped("Key").unwrap(),
			DimensionDefinition::pixel(1.0).unwrap(),
		],
		Vec::new(),
	));
	tree.append_child(root, inner, Cell::at(0, 0)).unwrap();
	tree.set_scope_boundary(root, true).unwrap();

	let outcome = tree.layout(root, AVAILABLE).unwrap();

	assert!(!outcome.converged);
	assert_eq!(outcome.into_result(), Err(LayoutError::IterationLimitExceeded { rounds: 3 }));
	assert!(tree.rect(inner).is_some());
}

/// Must reject node ids that outlived their node, even after the slot is reused.
///
/// * Enforced in: `LayoutTree::node`, `LayoutTree::node_mut`
/// * Failure symptom: a stale handle mutates an unrelated node that now occupies the slot.
#[cfg_attr(test, test)]
pub(crate) fn test_stale_ids_are_rejected() {
	let mut tree = LayoutTree::new();
	let old = tree.add_grid(GridBox::new());
	tree.remove_node(old).unwrap();
	let new = tree.add_grid(GridBox::new());

	assert_eq!(new.index(), old.index());
	assert_eq!(tree.grid_mut(old).map(|_| ()), Err(LayoutError::UnknownNode(old)));
	assert!(tree.grid(new).is_ok());
}
