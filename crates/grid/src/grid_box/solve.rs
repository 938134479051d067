//! Per-axis solving: local pass, reconciliation and star distribution.

use trellis_primitives::{Axis, GridLength, Size};

use super::{CellMeasure, GridBox};
use crate::cell::Cell;
use crate::definition::{DimensionDefinition, clamp_to_bounds};
use crate::group::GroupKey;
use crate::invalidation::MeasureKey;
use crate::resolve::{StarTrack, distribute_stars, resolve_length};
use crate::scope::GroupSizes;

/// How a track takes part in the local pass.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TrackKind {
	Pixel(f64),
	/// Content sized; grouped stars are sized this way too.
	Auto,
	/// Ungrouped star with its factor.
	Star(f64),
}

#[derive(Debug, Clone)]
pub(super) struct Track {
	kind: TrackKind,
	min: f64,
	max: f64,
	group: Option<GroupKey>,
	/// Local size: final for pixel/auto, lower bound for stars.
	pub(super) base: f64,
}

impl Track {
	fn from_definition(definition: &DimensionDefinition) -> Self {
		let group = definition.group().cloned();
		let kind = match (definition.length(), &group) {
			(GridLength::Pixel(value), _) => TrackKind::Pixel(value),
			(GridLength::Star(factor), None) => TrackKind::Star(factor),
			(GridLength::Star(_), Some(_)) | (GridLength::Auto, _) => TrackKind::Auto,
		};
		Self {
			kind,
			min: definition.min(),
			max: definition.max(),
			group,
			base: 0.0,
		}
	}

	/// Stand-in for an axis without definitions.
	fn implicit() -> Self {
		Self {
			kind: TrackKind::Star(1.0),
			min: 0.0,
			max: f64::INFINITY,
			group: None,
			base: 0.0,
		}
	}

	fn length(&self) -> GridLength {
		match self.kind {
			TrackKind::Pixel(value) => GridLength::Pixel(value),
			TrackKind::Auto => GridLength::Auto,
			TrackKind::Star(factor) => GridLength::Star(factor),
		}
	}
}

/// Tracks of one axis after the local pass.
#[derive(Debug, Clone)]
pub(super) struct AxisPlan {
	pub(super) tracks: Vec<Track>,
}

impl AxisPlan {
	fn new(definitions: &[DimensionDefinition]) -> Self {
		let tracks = if definitions.is_empty() {
			vec![Track::implicit()]
		} else {
			definitions.iter().map(Track::from_definition).collect()
		};
		Self { tracks }
	}

	/// Extent a cell spanning `range` is measured under.
	fn constraint(&self, range: std::ops::Range<usize>, available: f64) -> f64 {
		let spanned = &self.tracks[range];
		if spanned.iter().all(|t| matches!(t.kind, TrackKind::Pixel(_))) {
			return spanned
				.iter()
				.map(|t| match t.kind {
					TrackKind::Pixel(value) => clamp_to_bounds(value, t.min, t.max),
					_ => 0.0,
				})
				.sum();
		}
		if spanned.iter().any(|t| matches!(t.kind, TrackKind::Star(_))) {
			return f64::INFINITY;
		}
		available
	}

	/// Resolves every track from the cells' natural sizes along `axis`.
	fn resolve(&mut self, axis: Axis, available: f64, cells: &[Cell], naturals: &[Size]) {
		let count = self.tracks.len();
		let mut content = vec![0.0_f64; count];
		for (cell, natural) in cells.iter().zip(naturals) {
			let range = cell.range(axis, count);
			if range.len() == 1 {
				content[range.start] = content[range.start].max(natural.get(axis));
			}
		}

		for (track, content) in self.tracks.iter_mut().zip(content) {
			let resolution = resolve_length(track.length(), track.min, track.max, available, |_| content);
			track.base = resolution.floor();
		}

		let mut spanning: Vec<(usize, f64, std::ops::Range<usize>)> = cells
			.iter()
			.zip(naturals)
			.map(|(cell, natural)| (cell.range(axis, count), natural.get(axis)))
			.filter(|(range, _)| range.len() > 1)
			.map(|(range, extent)| (range.len(), extent, range))
			.collect();
		spanning.sort_by_key(|(span, ..)| *span);

		for (_, extent, range) in spanning {
			self.grow_span(range, extent);
		}
	}

	/// Spreads the shortfall of one spanning cell over its growable tracks.
	fn grow_span(&mut self, range: std::ops::Range<usize>, extent: f64) {
		let spanned = &mut self.tracks[range];
		let current: f64 = spanned.iter().map(|t| t.base).sum();
		let mut deficit = extent - current;
		if deficit <= 0.0 {
			return;
		}

		let autos = spanned.iter().any(|t| t.kind == TrackKind::Auto);
		let mut growable: Vec<&mut Track> = spanned
			.iter_mut()
			.filter(|t| match t.kind {
				TrackKind::Auto => true,
				TrackKind::Star(_) => !autos,
				TrackKind::Pixel(_) => false,
			})
			.filter(|t| t.base < t.max)
			.collect();

		// Each round either absorbs the deficit or caps at least one track.
		while deficit > 0.0 && !growable.is_empty() {
			let share = deficit / growable.len() as f64;
			for track in &mut growable {
				let grown = (track.base + share).min(track.max);
				deficit -= grown - track.base;
				track.base = grown;
			}
			let before = growable.len();
			growable.retain(|t| t.base < t.max);
			if growable.len() == before {
				break;
			}
		}
	}

	/// Applies converged group sizes to grouped tracks.
	pub(super) fn reconcile(self, groups: &dyn GroupSizes) -> AxisSolution {
		let tracks = self
			.tracks
			.into_iter()
			.map(|track| {
				let received = track.group.as_ref().and_then(|key| groups.group_size(key));
				match (track.kind, received) {
					(_, Some(size)) => Solved::Fixed(clamp_to_bounds(size, track.min, track.max)),
					(TrackKind::Star(factor), None) => Solved::Star(StarTrack {
						factor,
						lower: track.base,
						upper: track.max,
					}),
					(_, None) => Solved::Fixed(track.base),
				}
			})
			.collect();
		AxisSolution { tracks }
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Solved {
	Fixed(f64),
	Star(StarTrack),
}

/// Reconciled tracks of one axis, ready for star distribution.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct AxisSolution {
	tracks: Vec<Solved>,
}

impl AxisSolution {
	/// Layout used when arranging a grid that was never measured.
	pub(super) fn unmeasured(definitions: &[DimensionDefinition]) -> Self {
		let mut plan = AxisPlan::new(definitions);
		for track in &mut plan.tracks {
			track.base = resolve_length(track.length(), track.min, track.max, 0.0, |_| 0.0).floor();
		}
		plan.reconcile(&NoGroups)
	}

	/// Size this axis asks for: fixed sizes plus star lower bounds.
	pub(super) fn desired(&self) -> f64 {
		self.tracks
			.iter()
			.map(|t| match t {
				Solved::Fixed(size) => *size,
				Solved::Star(star) => star.lower,
			})
			.sum()
	}

	/// Final sizes of every track for an axis extent of `extent`.
	pub(super) fn distribute(&self, extent: f64) -> Vec<f64> {
		let fixed: f64 = self
			.tracks
			.iter()
			.filter_map(|t| match t {
				Solved::Fixed(size) => Some(*size),
				Solved::Star(_) => None,
			})
			.sum();
		let stars: Vec<StarTrack> = self
			.tracks
			.iter()
			.filter_map(|t| match t {
				Solved::Star(star) => Some(*star),
				Solved::Fixed(_) => None,
			})
			.collect();
		let leftover = (extent - fixed).max(0.0);
		let mut shares = distribute_stars(&stars, leftover).into_iter();

		self.tracks
			.iter()
			.map(|t| match t {
				Solved::Fixed(size) => *size,
				Solved::Star(star) => shares.next().unwrap_or(star.lower),
			})
			.collect()
	}
}

struct NoGroups;

impl GroupSizes for NoGroups {
	fn group_size(&self, _group: &GroupKey) -> Option<f64> {
		None
	}
}

/// Both axes of the last reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Measured {
	pub(super) columns: AxisSolution,
	pub(super) rows: AxisSolution,
}

impl Measured {
	pub(super) fn axis(&self, axis: Axis) -> &AxisSolution {
		match axis {
			Axis::Horizontal => &self.columns,
			Axis::Vertical => &self.rows,
		}
	}

	pub(super) fn desired(&self) -> Size {
		Size::new(self.columns.desired(), self.rows.desired())
	}
}

impl GridBox {
	/// Resolves both axes without any group information.
	///
	/// Cells are measured under the constraints their spanned tracks allow;
	/// a cell measured before under the same constraint reuses its cached
	/// natural size.
	pub(super) fn local_pass(&mut self, available: Size, measurer: &mut dyn CellMeasure) -> [AxisPlan; 2] {
		let mut plans = [AxisPlan::new(&self.columns), AxisPlan::new(&self.rows)];

		let mut naturals = Vec::with_capacity(self.cells.len());
		for (index, cell) in self.cells.iter_mut().enumerate() {
			let [columns, rows] = &plans;
			let constraint = Size::new(
				columns.constraint(cell.range(Axis::Horizontal, columns.tracks.len()), available.width),
				rows.constraint(cell.range(Axis::Vertical, rows.tracks.len()), available.height),
			);
			let natural = match cell.cached_natural(constraint) {
				Some(natural) => natural,
				None => {
					let natural = measurer.measure_cell(index, constraint);
					cell.store_natural(constraint, natural);
					natural
				}
			};
			naturals.push(natural);
		}

		for (axis, plan) in Axis::ALL.into_iter().zip(&mut plans) {
			plan.resolve(axis, available.get(axis), &self.cells, &naturals);
		}
		plans
	}

	pub(super) fn measure_key(&self, available: Size, groups: &dyn GroupSizes) -> MeasureKey {
		let received = self
			.columns
			.iter()
			.chain(&self.rows)
			.filter_map(DimensionDefinition::group)
			.map(|key| groups.group_size(key))
			.collect();
		MeasureKey { available, received }
	}
}
