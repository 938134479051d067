//! Shared-size scope registry.
//!
//! A scope maps each group key to the ideal sizes reported by the
//! definitions currently in that group. Grids write to it during the
//! contribution sweep and read a frozen [`ResolvedGroups`] snapshot during
//! reconciliation, so no grid can observe a half-populated registry.

use rustc_hash::FxHashMap as HashMap;

use crate::definition::DefinitionId;
use crate::group::GroupKey;

/// Read access to converged group sizes.
pub trait GroupSizes {
	/// Converged size of `group`, or `None` when nothing contributes to it.
	fn group_size(&self, group: &GroupKey) -> Option<f64>;
}

#[derive(Debug, Default)]
struct GroupState {
	ideals: HashMap<DefinitionId, f64>,
}

impl GroupState {
	fn resolve(&self) -> Option<f64> {
		self.ideals.values().copied().reduce(f64::max)
	}
}

/// Registry of shared-size groups owned by one scope boundary.
#[derive(Debug, Default)]
pub struct SharedSizeScope {
	groups: HashMap<GroupKey, GroupState>,
	members: HashMap<DefinitionId, GroupKey>,
}

impl SharedSizeScope {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers or updates the ideal size of `contributor` under `group`.
	///
	/// A contributor belongs to at most one group; reporting under a new key
	/// moves it.
	pub fn contribute(&mut self, contributor: DefinitionId, group: &GroupKey, ideal: f64) {
		match self.members.get(&contributor) {
			Some(current) if current == group => {}
			Some(_) => {
				self.withdraw(contributor);
				self.members.insert(contributor, group.clone());
			}
			None => {
				self.members.insert(contributor, group.clone());
			}
		}
		tracing::trace!(contributor = contributor.get(), %group, ideal, "Shared size contribution");
		self.groups
			.entry(group.clone())
			.or_default()
			.ideals
			.insert(contributor, ideal);
	}

	/// Removes `contributor` from whatever group it reported to.
	///
	/// Returns `false` if it was not registered.
	pub fn withdraw(&mut self, contributor: DefinitionId) -> bool {
		let Some(group) = self.members.remove(&contributor) else {
			return false;
		};
		tracing::trace!(contributor = contributor.get(), %group, "Shared size withdrawal");
		if let Some(state) = self.groups.get_mut(&group) {
			state.ideals.remove(&contributor);
			if state.ideals.is_empty() {
				self.groups.remove(&group);
			}
		}
		true
	}

	/// Largest ideal size among the current contributors to `group`.
	pub fn resolve(&self, group: &GroupKey) -> Option<f64> {
		self.groups.get(group).and_then(GroupState::resolve)
	}

	/// Number of definitions currently contributing to `group`.
	pub fn contributor_count(&self, group: &GroupKey) -> usize {
		self.groups.get(group).map_or(0, |state| state.ideals.len())
	}

	/// Group a contributor is registered under.
	pub fn group_of(&self, contributor: DefinitionId) -> Option<&GroupKey> {
		self.members.get(&contributor)
	}

	/// Number of groups with at least one contributor.
	pub fn group_count(&self) -> usize {
		self.groups.len()
	}

	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}

	/// Snapshot of every group's converged size.
	pub fn freeze(&self) -> ResolvedGroups {
		ResolvedGroups(
			self.groups
				.iter()
				.filter_map(|(key, state)| Some((key.clone(), state.resolve()?)))
				.collect(),
		)
	}
}

/// Frozen converged sizes of a scope, read during reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedGroups(HashMap<GroupKey, f64>);

impl ResolvedGroups {
	/// Snapshot with no groups; grouped definitions fall back to their own ideal.
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn get(&self, group: &str) -> Option<f64> {
		self.0.get(group).copied()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, f64)> {
		self.0.iter().map(|(k, v)| (k, *v))
	}

	/// True if both snapshots hold the same groups with sizes within `epsilon`.
	pub fn approx_eq(&self, other: &ResolvedGroups, epsilon: f64) -> bool {
		self.0.len() == other.0.len()
			&& self
				.0
				.iter()
				.all(|(key, size)| other.0.get(key).is_some_and(|o| (o - size).abs() <= epsilon))
	}
}

impl GroupSizes for ResolvedGroups {
	fn group_size(&self, group: &GroupKey) -> Option<f64> {
		self.0.get(group).copied()
	}
}
