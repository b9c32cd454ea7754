//! Core geometric structures shared by the grid, the fields and the pathfinders
//!

use std::collections::HashMap;

/// Fixed number of layers stacked on top of the base layer, the `z` extent of every grid
pub const GRID_LAYERS: usize = 8;

/// A position within the 3D routing volume
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub struct WirePoint {
	/// Position along the horizontal axis of the base layer
	x: usize,
	/// Position along the vertical axis of the base layer
	y: usize,
	/// Layer the point sits on, `0` being the base layer that carries the gates
	z: usize,
}

impl WirePoint {
	/// Create a new instance of [WirePoint]
	pub fn new(x: usize, y: usize, z: usize) -> Self {
		WirePoint { x, y, z }
	}
	/// Get the `x` coordinate
	pub fn get_x(&self) -> usize {
		self.x
	}
	/// Get the `y` coordinate
	pub fn get_y(&self) -> usize {
		self.y
	}
	/// Get the `z` coordinate
	pub fn get_z(&self) -> usize {
		self.z
	}
	/// Get the point as an `(x, y, z)` tuple
	pub fn get_coords(&self) -> (usize, usize, usize) {
		(self.x, self.y, self.z)
	}
	/// Find the axis-aligned unit-offset neighbours of this point that sit within `dimensions`.
	/// Neighbours are produced in a fixed order (`+x`, `-x`, `+y`, `-y`, `+z`, `-z` with
	/// out-of-bounds offsets skipped) so that searches iterating over them are deterministic
	pub fn get_neighbours(&self, dimensions: &GridDimensions) -> Vec<WirePoint> {
		let mut neighbours = Vec::with_capacity(6);
		if self.x < dimensions.get_length() - 1 {
			neighbours.push(WirePoint::new(self.x + 1, self.y, self.z));
		}
		if self.x > 0 {
			neighbours.push(WirePoint::new(self.x - 1, self.y, self.z));
		}
		if self.y < dimensions.get_depth() - 1 {
			neighbours.push(WirePoint::new(self.x, self.y + 1, self.z));
		}
		if self.y > 0 {
			neighbours.push(WirePoint::new(self.x, self.y - 1, self.z));
		}
		if self.z < dimensions.get_layers() - 1 {
			neighbours.push(WirePoint::new(self.x, self.y, self.z + 1));
		}
		if self.z > 0 {
			neighbours.push(WirePoint::new(self.x, self.y, self.z - 1));
		}
		neighbours
	}
	/// Manhattan distance to `other` summed over all three axes. Gates sit on the base layer so
	/// the `z` term is frequently zero but the general formula is kept for points mid-route
	pub fn manhattan_distance(&self, other: &WirePoint) -> usize {
		self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
	}
	/// Whether `other` is exactly one unit step along exactly one axis from this point
	pub fn is_adjacent(&self, other: &WirePoint) -> bool {
		self.manhattan_distance(other) == 1
	}
}

/// A unit edge between two adjacent grid cells. The endpoints are stored in sorted order so that
/// a segment compares and hashes the same regardless of the direction it was traversed in
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Segment {
	/// Lesser endpoint under the lexicographic point ordering
	a: WirePoint,
	/// Greater endpoint under the lexicographic point ordering
	b: WirePoint,
}

impl Segment {
	/// Create a new instance of [Segment] from two endpoints, normalising their order
	pub fn new(first: WirePoint, second: WirePoint) -> Self {
		if first <= second {
			Segment {
				a: first,
				b: second,
			}
		} else {
			Segment {
				a: second,
				b: first,
			}
		}
	}
	/// Get the normalised `(lesser, greater)` endpoints
	pub fn get_endpoints(&self) -> (WirePoint, WirePoint) {
		(self.a, self.b)
	}
	/// Whether the endpoints are a single unit step apart on one axis, i.e. a routable edge
	pub fn is_unit_step(&self) -> bool {
		self.a.is_adjacent(&self.b)
	}
}

/// A fixed terminal on the base layer of the grid. Gates are created from the input layout, never
/// move and are identified by the 1-based index of their row in the gate file
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Gate {
	/// 1-based identifier taken from the input row order
	id: usize,
	/// Position along the horizontal axis of the base layer
	x: usize,
	/// Position along the vertical axis of the base layer
	y: usize,
}

impl Gate {
	/// Create a new instance of [Gate]
	pub fn new(id: usize, x: usize, y: usize) -> Self {
		Gate { id, x, y }
	}
	/// Get the 1-based gate id
	pub fn get_id(&self) -> usize {
		self.id
	}
	/// Get the `x` coordinate
	pub fn get_x(&self) -> usize {
		self.x
	}
	/// Get the `y` coordinate
	pub fn get_y(&self) -> usize {
		self.y
	}
	/// The cell this gate occupies, always on the base layer
	pub fn position(&self) -> WirePoint {
		WirePoint::new(self.x, self.y, 0)
	}
}

/// A required connection between two gates, referenced by their 1-based ids
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Connection(usize, usize);

impl Connection {
	/// Create a new instance of [Connection]
	pub fn new(a: usize, b: usize) -> Self {
		Connection(a, b)
	}
	/// Get the id of the first gate of the pair
	pub fn get_a(&self) -> usize {
		self.0
	}
	/// Get the id of the second gate of the pair
	pub fn get_b(&self) -> usize {
		self.1
	}
}

/// The extent of the routing volume. The base layer footprint is taken from the gate layout while
/// the number of stacked layers is fixed at [GRID_LAYERS]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct GridDimensions {
	/// Extent along `x`
	length: usize,
	/// Extent along `y`
	depth: usize,
	/// Extent along `z`
	layers: usize,
}

impl GridDimensions {
	/// Create a new instance of [GridDimensions] with the fixed layer count
	pub fn new(length: usize, depth: usize) -> Self {
		GridDimensions {
			length,
			depth,
			layers: GRID_LAYERS,
		}
	}
	/// Derive dimensions from a gate layout. Both footprint axes span one more than the largest
	/// coordinate found across all gates
	pub fn from_gates(gates: &[Gate]) -> Self {
		let max_coord = gates
			.iter()
			.map(|g| g.get_x().max(g.get_y()))
			.max()
			.unwrap_or(0);
		GridDimensions::new(max_coord + 1, max_coord + 1)
	}
	/// Get the extent along `x`
	pub fn get_length(&self) -> usize {
		self.length
	}
	/// Get the extent along `y`
	pub fn get_depth(&self) -> usize {
		self.depth
	}
	/// Get the extent along `z`
	pub fn get_layers(&self) -> usize {
		self.layers
	}
	/// Total number of cells in the volume
	pub fn cell_count(&self) -> usize {
		self.length * self.depth * self.layers
	}
	/// Whether `point` lies within the volume
	pub fn contains(&self, point: &WirePoint) -> bool {
		point.get_x() < self.length && point.get_y() < self.depth && point.get_z() < self.layers
	}
	/// Flat index of a cell for storage in a [crate::prelude::Field] backing vector.
	///
	/// NB: This will produce an out-of-range index if the point is out of bounds
	pub fn cell_index(&self, point: &WirePoint) -> usize {
		(point.get_z() * self.depth + point.get_y()) * self.length + point.get_x()
	}
	/// Distance from `point` to the nearest face of the volume, `0` for cells on the boundary
	pub fn distance_to_edge(&self, point: &WirePoint) -> usize {
		let (x, y, z) = point.get_coords();
		x.min(self.length - 1 - x)
			.min(y.min(self.depth - 1 - y))
			.min(z.min(self.layers - 1 - z))
	}
	/// Number of in-bounds axis-aligned neighbours of `point`, i.e. how boxed in the cell is
	pub fn free_sides(&self, point: &WirePoint) -> usize {
		point.get_neighbours(self).len()
	}
}

/// Count how many times each gate id appears across the pairs of a netlist
pub fn gate_frequencies(netlist: &[Connection]) -> HashMap<usize, usize> {
	let mut counts = HashMap::new();
	for connection in netlist.iter() {
		*counts.entry(connection.get_a()).or_insert(0) += 1;
		*counts.entry(connection.get_b()).or_insert(0) += 1;
	}
	counts
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn neighbours_of_interior_point() {
		let dimensions = GridDimensions::new(5, 5);
		let point = WirePoint::new(2, 2, 3);
		let result = point.get_neighbours(&dimensions);
		let actual = vec![
			WirePoint::new(3, 2, 3),
			WirePoint::new(1, 2, 3),
			WirePoint::new(2, 3, 3),
			WirePoint::new(2, 1, 3),
			WirePoint::new(2, 2, 4),
			WirePoint::new(2, 2, 2),
		];
		assert_eq!(actual, result);
	}
	#[test]
	fn neighbours_of_corner_point() {
		let dimensions = GridDimensions::new(3, 3);
		let point = WirePoint::new(0, 0, 0);
		let result = point.get_neighbours(&dimensions);
		let actual = vec![
			WirePoint::new(1, 0, 0),
			WirePoint::new(0, 1, 0),
			WirePoint::new(0, 0, 1),
		];
		assert_eq!(actual, result);
	}
	#[test]
	fn manhattan_distance_includes_layers() {
		let from = WirePoint::new(1, 2, 0);
		let to = WirePoint::new(4, 0, 3);
		let result = from.manhattan_distance(&to);
		let actual = 8;
		assert_eq!(actual, result);
	}
	#[test]
	fn segment_is_order_independent() {
		let p = WirePoint::new(1, 1, 0);
		let q = WirePoint::new(1, 2, 0);
		let result = Segment::new(p, q);
		let actual = Segment::new(q, p);
		assert_eq!(actual, result);
	}
	#[test]
	fn segment_unit_step() {
		let segment = Segment::new(WirePoint::new(0, 0, 0), WirePoint::new(0, 0, 1));
		assert!(segment.is_unit_step());
		let diagonal = Segment::new(WirePoint::new(0, 0, 0), WirePoint::new(1, 1, 0));
		assert!(!diagonal.is_unit_step());
	}
	#[test]
	fn dimensions_from_gate_layout() {
		let gates = vec![Gate::new(1, 0, 4), Gate::new(2, 2, 1)];
		let result = GridDimensions::from_gates(&gates);
		let actual = GridDimensions::new(5, 5);
		assert_eq!(actual, result);
	}
	#[test]
	fn distance_to_edge_of_interior_cell() {
		let dimensions = GridDimensions::new(7, 7);
		let result = dimensions.distance_to_edge(&WirePoint::new(3, 3, 2));
		let actual = 2;
		assert_eq!(actual, result);
	}
	#[test]
	fn free_sides_of_corner_gate() {
		let dimensions = GridDimensions::new(4, 4);
		let result = dimensions.free_sides(&WirePoint::new(0, 0, 0));
		let actual = 3;
		assert_eq!(actual, result);
	}
	#[test]
	fn frequencies_count_both_sides_of_a_pair() {
		let netlist = vec![
			Connection::new(1, 2),
			Connection::new(1, 3),
			Connection::new(2, 1),
		];
		let result = gate_frequencies(&netlist);
		assert_eq!(Some(&3), result.get(&1));
		assert_eq!(Some(&2), result.get(&2));
		assert_eq!(Some(&1), result.get(&3));
	}
}
