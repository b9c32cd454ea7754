//! A\* routing minimises accumulated step cost rather than step count. Stepping onto a cell costs
//! its precomputed [CostField] weight plus the grid's dynamic crossing penalty for cells already
//! carrying wires, so routes drift away from congested gates, avoid stacking onto busy cells and
//! prefer the cheap periphery. The heuristic is the Manhattan distance to the end gate, which
//! never overestimates because every cell weight is at least one.
//!
//! Where Lee optimises length and A\* optimises the cost function, the two may legitimately
//! return different wires for the same pair: an A\* wire is never costlier than a Lee wire under
//! the cost model, and a Lee wire is never longer than an A\* wire.
//!

use std::collections::{HashMap, HashSet};

use crate::prelude::*;
use crate::routing::pathfinders::is_legal_step;

/// A frontier entry: a reached cell, its scores and the path taken to it
struct AStarQueueItem {
	/// The cell this entry scores
	point: WirePoint,
	/// Combined score: cost so far plus the heuristic
	score: u64,
	/// Manhattan distance to the end gate, used as the first tiebreaker between equal scores
	heuristic: u64,
	/// Rank of the step that reached this cell under the fixed axis order, the final tiebreaker
	axis_rank: u8,
	/// Accumulated step cost from the start gate
	cost_so_far: u64,
	/// The cells traversed to reach this entry, excluding the entry itself
	path: Vec<WirePoint>,
}

/// Rank of the unit step from `from` to `to` under the fixed `+x`, `-x`, `+y`, `-y`, `+z`, `-z`
/// axis order that neighbours are generated in
fn axis_rank(from: &WirePoint, to: &WirePoint) -> u8 {
	if to.get_x() > from.get_x() {
		0
	} else if to.get_x() < from.get_x() {
		1
	} else if to.get_y() > from.get_y() {
		2
	} else if to.get_y() < from.get_y() {
		3
	} else if to.get_z() > from.get_z() {
		4
	} else {
		5
	}
}

/// Cost-aware search for a wire from `start` to `end`
pub fn route(start: &Gate, end: &Gate, grid: &Grid) -> Result<Wire, RoutingError> {
	let origin = start.position();
	let target = end.position();
	let cost_field = grid.get_cost_field();
	let start_heuristic = origin.manhattan_distance(&target) as u64;

	// best combined score recorded per cell; a new route to a known cell is only explored
	// when it improves on this
	let mut best_scores: HashMap<WirePoint, u64> = HashMap::new();
	best_scores.insert(origin, start_heuristic);
	// cells whose cheapest route is settled
	let mut closed: HashSet<WirePoint> = HashSet::new();

	let mut queue = vec![AStarQueueItem {
		point: origin,
		score: start_heuristic,
		heuristic: start_heuristic,
		axis_rank: 0,
		cost_so_far: 0,
		path: Vec::new(),
	}];
	while !queue.is_empty() {
		// process the entry with the best score, preferring the one nearest the target on ties
		// and then the one reached by the earliest axis in the fixed order
		queue.sort_by(|a, b| {
			a.score
				.cmp(&b.score)
				.then(a.heuristic.cmp(&b.heuristic))
				.then(a.axis_rank.cmp(&b.axis_rank))
		});
		let current = queue.swap_remove(0);
		if current.point == target {
			let mut points = current.path;
			points.push(target);
			return Ok(Wire::new(points));
		}
		if !closed.insert(current.point) {
			// a cheaper route to this cell was already expanded
			continue;
		}
		for candidate in current.point.get_neighbours(grid.get_dimensions()) {
			if closed.contains(&candidate)
				|| !is_legal_step(&current.point, &candidate, &target, grid)
			{
				continue;
			}
			let step_cost =
				u64::from(cost_field.get_cell_value(&candidate)) + u64::from(grid.point_cost(&candidate));
			let cost_so_far = current.cost_so_far + step_cost;
			let heuristic = candidate.manhattan_distance(&target) as u64;
			let score = cost_so_far + heuristic;
			let improves = best_scores
				.get(&candidate)
				.is_none_or(|&known| score < known);
			if improves {
				best_scores.insert(candidate, score);
				let mut path = current.path.clone();
				path.push(current.point);
				queue.push(AStarQueueItem {
					point: candidate,
					score,
					heuristic,
					axis_rank: axis_rank(&current.point, &candidate),
					cost_so_far,
					path,
				});
			}
		}
	}
	Err(RoutingError::NoRoute {
		from: start.get_id(),
		to: end.get_id(),
	})
}
