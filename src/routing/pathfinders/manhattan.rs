//! The Manhattan baseline lays a wire along the full x-stretch and then the full y-stretch
//! between two gates, entirely on the base layer. It performs no obstacle checking whatsoever:
//! the wire it proposes may be rejected by the grid when another wire already claims one of its
//! segments. Useful for trivial layouts and as a sanity baseline for the real searches.
//!

use crate::prelude::*;

/// Produce the L-shaped baseline wire from `start` to `end` at `z = 0`
pub fn route(start: &Gate, end: &Gate, _grid: &Grid) -> Result<Wire, RoutingError> {
	let (x_end, y_end) = (end.get_x(), end.get_y());
	let mut points = vec![start.position()];
	let mut x = start.get_x();
	while x != x_end {
		if x < x_end {
			x += 1;
		} else {
			x -= 1;
		}
		points.push(WirePoint::new(x, start.get_y(), 0));
	}
	let mut y = start.get_y();
	while y != y_end {
		if y < y_end {
			y += 1;
		} else {
			y -= 1;
		}
		points.push(WirePoint::new(x_end, y, 0));
	}
	Ok(Wire::new(points))
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn straight_stretch_along_x() {
		let gates = vec![Gate::new(1, 0, 0), Gate::new(2, 2, 0)];
		let grid = Grid::from_layout(gates, &[Connection::new(1, 2)]).unwrap();
		let start = *grid.get_gate(1).unwrap();
		let end = *grid.get_gate(2).unwrap();
		let result = Pathfinder::Manhattan.route(&start, &end, &grid).unwrap();
		let actual = Wire::new(vec![
			WirePoint::new(0, 0, 0),
			WirePoint::new(1, 0, 0),
			WirePoint::new(2, 0, 0),
		]);
		assert_eq!(actual, result);
	}
	#[test]
	fn bends_after_the_x_stretch() {
		let gates = vec![Gate::new(1, 3, 2), Gate::new(2, 1, 0)];
		let grid = Grid::from_layout(gates, &[Connection::new(1, 2)]).unwrap();
		let start = *grid.get_gate(1).unwrap();
		let end = *grid.get_gate(2).unwrap();
		let result = Pathfinder::Manhattan.route(&start, &end, &grid).unwrap();
		let actual = Wire::new(vec![
			WirePoint::new(3, 2, 0),
			WirePoint::new(2, 2, 0),
			WirePoint::new(1, 2, 0),
			WirePoint::new(1, 1, 0),
			WirePoint::new(1, 0, 0),
		]);
		assert_eq!(actual, result);
	}
	#[test]
	fn baseline_length_matches_planar_distance() {
		let gates = vec![Gate::new(1, 0, 3), Gate::new(2, 4, 1)];
		let grid = Grid::from_layout(gates, &[Connection::new(1, 2)]).unwrap();
		let start = *grid.get_gate(1).unwrap();
		let end = *grid.get_gate(2).unwrap();
		let result = Pathfinder::Manhattan.route(&start, &end, &grid).unwrap();
		assert_eq!(6, result.segment_count());
		assert!(result.is_connected());
	}
}
