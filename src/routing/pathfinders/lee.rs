//! Lee routing expands a breadth-first wavefront from the start gate until it pops the end gate
//! off the frontier. Every cell remembers the predecessor that first reached it, so once the end
//! gate surfaces the wire is reconstructed by walking the predecessor chain backwards. The result
//! is the shortest legal route in steps, blind to the cost field; crossings cost it nothing,
//! which is the key behavioural difference to the cost-aware A\*.
//!

use std::collections::{HashMap, VecDeque};

use crate::prelude::*;
use crate::routing::pathfinders::is_legal_step;

/// Breadth-first wavefront search for a wire from `start` to `end`
pub fn route(start: &Gate, end: &Gate, grid: &Grid) -> Result<Wire, RoutingError> {
	let origin = start.position();
	let target = end.position();
	let mut queue = VecDeque::from([origin]);
	let mut visited = HashMap::new();
	visited.insert(origin, origin);
	while let Some(current) = queue.pop_front() {
		if current == target {
			return Ok(reconstruct(&visited, origin, target));
		}
		for candidate in current.get_neighbours(grid.get_dimensions()) {
			if visited.contains_key(&candidate)
				|| !is_legal_step(&current, &candidate, &target, grid)
			{
				continue;
			}
			visited.insert(candidate, current);
			queue.push_back(candidate);
		}
	}
	Err(RoutingError::NoRoute {
		from: start.get_id(),
		to: end.get_id(),
	})
}

/// Walk the predecessor chain from `target` back to `origin` and reverse it into a wire
fn reconstruct(visited: &HashMap<WirePoint, WirePoint>, origin: WirePoint, target: WirePoint) -> Wire {
	let mut points = vec![target];
	let mut current = target;
	while current != origin {
		// every visited cell has a predecessor, the chain always terminates at the origin
		current = visited[&current];
		points.push(current);
	}
	points.reverse();
	Wire::new(points)
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn shortest_route_on_an_empty_grid() {
		let gates = vec![Gate::new(1, 0, 0), Gate::new(2, 2, 0)];
		let grid = Grid::from_layout(gates, &[Connection::new(1, 2)]).unwrap();
		let start = *grid.get_gate(1).unwrap();
		let end = *grid.get_gate(2).unwrap();
		let result = Pathfinder::Lee.route(&start, &end, &grid).unwrap();
		let actual = Wire::new(vec![
			WirePoint::new(0, 0, 0),
			WirePoint::new(1, 0, 0),
			WirePoint::new(2, 0, 0),
		]);
		assert_eq!(actual, result);
	}
	#[test]
	fn wavefront_flows_around_a_gate() {
		let gates = vec![Gate::new(1, 0, 1), Gate::new(2, 2, 1), Gate::new(3, 1, 1)];
		let grid = Grid::from_layout(gates, &[Connection::new(1, 2)]).unwrap();
		let start = *grid.get_gate(1).unwrap();
		let end = *grid.get_gate(2).unwrap();
		let result = Pathfinder::Lee.route(&start, &end, &grid).unwrap();
		// the blocking gate forces a detour of four steps
		assert_eq!(4, result.segment_count());
		assert!(result.is_connected());
		assert!(result.connects(&start, &end));
		assert!(!result
			.get_interior()
			.iter()
			.any(|point| *point == WirePoint::new(1, 1, 0)));
	}
	#[test]
	fn sealed_start_gate_reports_no_route() {
		// corner gate boxed in by two neighbouring gates, its only free exit being straight up
		let gates = vec![
			Gate::new(1, 0, 0),
			Gate::new(2, 1, 0),
			Gate::new(3, 0, 1),
			Gate::new(4, 2, 2),
		];
		let mut grid = Grid::from_layout(gates, &[Connection::new(1, 4)]).unwrap();
		// a wire ending at the corner gate claims the upward segment, sealing it completely
		grid.try_add_wire(Wire::new(vec![
			WirePoint::new(1, 0, 0),
			WirePoint::new(1, 0, 1),
			WirePoint::new(0, 0, 1),
			WirePoint::new(0, 0, 0),
		]))
		.unwrap();
		let start = *grid.get_gate(1).unwrap();
		let end = *grid.get_gate(4).unwrap();
		let result = Pathfinder::Lee.route(&start, &end, &grid);
		assert!(matches!(result, Err(RoutingError::NoRoute { .. })));
	}
}
