//! Depth-first routing explores the grid one step at a time, always trying the moves that reduce
//! the Manhattan distance to the end gate before any others. On a dead end it backtracks to the
//! previous point and tries the next candidate there. A point may not be visited twice on the
//! current path, which keeps every proposed wire simple; the search fails only once every
//! reachable simple path has been exhausted.
//!

use std::collections::HashSet;

use crate::prelude::*;
use crate::routing::pathfinders::is_legal_step;

/// One level of the exploration stack: a point on the current path and the candidate steps still
/// untried from it
struct Frame {
	/// The point this frame explores from
	point: WirePoint,
	/// Neighbour candidates ordered target-reducing moves first
	candidates: Vec<WirePoint>,
	/// Index of the next candidate to try
	next: usize,
}

/// Neighbours of `point` ordered by their Manhattan distance to `target`: distance-reducing moves
/// first, ties kept in the fixed axis order of [WirePoint::get_neighbours]
fn ordered_candidates(point: &WirePoint, target: &WirePoint, grid: &Grid) -> Vec<WirePoint> {
	let mut candidates = point.get_neighbours(grid.get_dimensions());
	candidates.sort_by_key(|candidate| candidate.manhattan_distance(target));
	candidates
}

/// Depth-first search for a wire from `start` to `end`
pub fn route(start: &Gate, end: &Gate, grid: &Grid) -> Result<Wire, RoutingError> {
	let origin = start.position();
	let target = end.position();
	let mut path = vec![origin];
	let mut on_path: HashSet<WirePoint> = HashSet::from([origin]);
	let mut stack = vec![Frame {
		point: origin,
		candidates: ordered_candidates(&origin, &target, grid),
		next: 0,
	}];
	while let Some(frame_index) = stack.len().checked_sub(1) {
		let step = {
			let frame = &mut stack[frame_index];
			if frame.next < frame.candidates.len() {
				frame.next += 1;
				Some((frame.point, frame.candidates[frame.next - 1]))
			} else {
				None
			}
		};
		let Some((current, candidate)) = step else {
			// dead end, backtrack to the previous point
			stack.pop();
			if let Some(abandoned) = path.pop() {
				on_path.remove(&abandoned);
			}
			continue;
		};
		if on_path.contains(&candidate) || !is_legal_step(&current, &candidate, &target, grid) {
			continue;
		}
		if candidate == target {
			path.push(candidate);
			return Ok(Wire::new(path));
		}
		path.push(candidate);
		on_path.insert(candidate);
		stack.push(Frame {
			point: candidate,
			candidates: ordered_candidates(&candidate, &target, grid),
			next: 0,
		});
	}
	Err(RoutingError::NoRoute {
		from: start.get_id(),
		to: end.get_id(),
	})
}
