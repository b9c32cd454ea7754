//! The Grid owns the authoritative routing state: the registered gates, the occupancy counters,
//! the set of segments claimed by placed wires, the wires themselves in placement order and the
//! cost field. Committing and removing wires are the only mutating operations and both keep every
//! structural invariant intact: a rejected commit leaves the grid untouched and a removal reverses
//! a commit exactly.
//!

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::prelude::*;

/// Violations raised when registering gates or committing/removing wires
#[derive(Debug, thiserror::Error)]
pub enum GridError {
	/// A point fell outside the routing volume
	#[error("point {0:?} lies outside the grid")]
	OutOfBounds(WirePoint),
	/// Two gates were registered on the same cell
	#[error("gate {id} duplicates the coordinates ({x}, {y}) of gate {earlier}")]
	DuplicateGate {
		/// Id of the gate being registered
		id: usize,
		/// Id of the gate already occupying the cell
		earlier: usize,
		/// Shared `x` coordinate
		x: usize,
		/// Shared `y` coordinate
		y: usize,
	},
	/// A wire's point sequence was not a chain of unit axis-aligned steps
	#[error("wire is not a connected sequence of unit axis-aligned steps")]
	BrokenWire,
	/// A wire endpoint did not sit on a registered gate
	#[error("wire endpoint {0:?} is not a registered gate")]
	EndpointNotGate(WirePoint),
	/// A wire interior point passed through a gate cell
	#[error("wire interior passes through gate cell {0:?}")]
	GateCollision(WirePoint),
	/// A wire claimed a segment already owned by a placed wire
	#[error("segment {0:?} is already claimed by a placed wire")]
	SegmentInUse(Segment),
	/// A removal named a wire that is not on the grid
	#[error("wire is not placed on the grid")]
	UnknownWire,
}

/// The shared mutable routing state wires are laid onto
#[derive(Debug, Clone)]
pub struct Grid {
	/// Extent of the routing volume
	dimensions: GridDimensions,
	/// Registered gates in id order
	gates: Vec<Gate>,
	/// Cells occupied by gates, for constant-time legality checks
	gate_cells: HashSet<WirePoint>,
	/// Per-cell counts of wire interior passes
	occupancy: OccupancyField,
	/// Every segment claimed by a placed wire
	segments: HashSet<Segment>,
	/// Placed wires in placement order
	wires: Vec<Wire>,
	/// Routing weights consumed by the cost-aware pathfinders
	cost_field: CostField,
	/// Running total of segments across all placed wires
	total_segments: usize,
	/// Number of wires successfully committed over the lifetime of the current ordering attempt
	successful_wires: usize,
	/// Number of wire placements that failed over the lifetime of the current ordering attempt
	failed_wires: usize,
}

impl Grid {
	/// Create a new instance of [Grid] with no gates, no wires and a default cost field
	pub fn new(dimensions: GridDimensions) -> Self {
		Grid {
			dimensions,
			gates: Vec::new(),
			gate_cells: HashSet::new(),
			occupancy: OccupancyField::new(dimensions),
			segments: HashSet::new(),
			wires: Vec::new(),
			cost_field: CostField::new(dimensions),
			total_segments: 0,
			successful_wires: 0,
			failed_wires: 0,
		}
	}
	/// Create a [Grid] sized for a gate layout, register every gate and build the cost field for
	/// the netlist
	pub fn from_layout(gates: Vec<Gate>, netlist: &[Connection]) -> Result<Self, GridError> {
		let dimensions = GridDimensions::from_gates(&gates);
		let mut grid = Grid::new(dimensions);
		for gate in gates {
			grid.place_gate(gate)?;
		}
		grid.apply_costs_around_gates(netlist);
		Ok(grid)
	}
	/// Register a gate on the base layer. Fails when the gate is out of bounds or its cell is
	/// already taken by another gate
	pub fn place_gate(&mut self, gate: Gate) -> Result<(), GridError> {
		let position = gate.position();
		if !self.dimensions.contains(&position) {
			return Err(GridError::OutOfBounds(position));
		}
		if self.gate_cells.contains(&position) {
			let earlier = self
				.gates
				.iter()
				.find(|g| g.position() == position)
				.map(|g| g.get_id())
				.unwrap_or(0);
			return Err(GridError::DuplicateGate {
				id: gate.get_id(),
				earlier,
				x: gate.get_x(),
				y: gate.get_y(),
			});
		}
		self.gate_cells.insert(position);
		self.gates.push(gate);
		Ok(())
	}
	/// Rebuild the cost field from the registered gates and a netlist
	pub fn apply_costs_around_gates(&mut self, netlist: &[Connection]) {
		self.cost_field = CostField::from_layout(self.dimensions, &self.gates, netlist);
	}
	/// Get the extent of the routing volume
	pub fn get_dimensions(&self) -> &GridDimensions {
		&self.dimensions
	}
	/// Get the registered gates in id order
	pub fn get_gates(&self) -> &[Gate] {
		&self.gates
	}
	/// Look up a gate by its 1-based id
	pub fn get_gate(&self, id: usize) -> Option<&Gate> {
		self.gates.iter().find(|gate| gate.get_id() == id)
	}
	/// Whether `point` is occupied by a gate
	pub fn is_gate_cell(&self, point: &WirePoint) -> bool {
		self.gate_cells.contains(point)
	}
	/// Whether `segment` is already claimed by a placed wire
	pub fn is_segment_used(&self, segment: &Segment) -> bool {
		self.segments.contains(segment)
	}
	/// Get the segments claimed by all placed wires
	pub fn get_segments(&self) -> &HashSet<Segment> {
		&self.segments
	}
	/// Get the placed wires in placement order
	pub fn get_wires(&self) -> &[Wire] {
		&self.wires
	}
	/// Get the occupancy counters
	pub fn get_occupancy(&self) -> &OccupancyField {
		&self.occupancy
	}
	/// Get the cost field
	pub fn get_cost_field(&self) -> &CostField {
		&self.cost_field
	}
	/// Running total of segments across all placed wires
	pub fn get_total_segments(&self) -> usize {
		self.total_segments
	}
	/// Number of wires committed since the last reset
	pub fn get_successful_wires(&self) -> usize {
		self.successful_wires
	}
	/// Number of failed wire placements since the last reset
	pub fn get_failed_wires(&self) -> usize {
		self.failed_wires
	}
	/// Record that a pathfinder failed to produce a wire for the current grid state
	pub fn record_failed_wire(&mut self) {
		self.failed_wires += 1;
	}
	/// Manhattan distance between two gates using the full three-axis formula
	pub fn distance_between_gates(&self, first: &Gate, second: &Gate) -> usize {
		first.position().manhattan_distance(&second.position())
	}
	/// Validate and commit a wire atomically. Validation requires a connected polyline whose
	/// endpoints sit on registered gates, whose interior stays in bounds and off gate cells and
	/// whose segments are claimed by no other wire (nor repeated within the wire itself). On any
	/// violation the grid is left untouched
	pub fn try_add_wire(&mut self, wire: Wire) -> Result<(), GridError> {
		if wire.get_points().len() < 2 || !wire.is_connected() {
			return Err(GridError::BrokenWire);
		}
		for endpoint in [wire.get_start(), wire.get_end()].into_iter().flatten() {
			if !self.gate_cells.contains(endpoint) {
				return Err(GridError::EndpointNotGate(*endpoint));
			}
		}
		for point in wire.get_interior().iter() {
			if !self.dimensions.contains(point) {
				return Err(GridError::OutOfBounds(*point));
			}
			if self.gate_cells.contains(point) {
				return Err(GridError::GateCollision(*point));
			}
		}
		let segments = wire.get_segments();
		let mut claimed = HashSet::with_capacity(segments.len());
		for segment in segments.iter() {
			if self.segments.contains(segment) || !claimed.insert(*segment) {
				return Err(GridError::SegmentInUse(*segment));
			}
		}
		// validation passed, commit
		for point in wire.get_interior().iter() {
			self.occupancy.increment(point);
		}
		self.segments.extend(segments.iter().copied());
		self.total_segments += wire.segment_count();
		self.successful_wires += 1;
		self.wires.push(wire);
		Ok(())
	}
	/// Reverse a commit exactly: release the wire's segments, decrement the occupancy of its
	/// interior and drop it from the wire list. When duplicates exist the most recently placed
	/// matching wire is removed
	pub fn remove_wire(&mut self, wire: &Wire) -> Result<(), GridError> {
		let Some(index) = self.wires.iter().rposition(|placed| placed == wire) else {
			return Err(GridError::UnknownWire);
		};
		for point in wire.get_interior().iter() {
			self.occupancy.decrement(point);
		}
		for segment in wire.get_segments().iter() {
			self.segments.remove(segment);
		}
		self.total_segments = self.total_segments.saturating_sub(wire.segment_count());
		self.wires.remove(index);
		Ok(())
	}
	/// Drop every wire and counter and rebuild the cost field, returning the grid to a clean
	/// state ready for the next ordering attempt
	pub fn clear_wires(&mut self, netlist: &[Connection]) {
		self.wires.clear();
		self.segments.clear();
		self.occupancy.reset();
		self.total_segments = 0;
		self.successful_wires = 0;
		self.failed_wires = 0;
		self.apply_costs_around_gates(netlist);
	}
	/// Number of extra passes across shared cells. Gate cells never enter the occupancy counters
	/// so fan-out at a gate is not mistaken for crossings
	pub fn total_intersections(&self) -> u64 {
		self.occupancy.count_excess_passes()
	}
	/// The global cost of the current routing: `300` per intersection plus one per wire segment
	pub fn total_cost(&self) -> u64 {
		300 * self.total_intersections() + self.total_segments as u64
	}
	/// The dynamic cost of stepping onto `point`: `1` for free cells, `300` per resident wire
	/// plus one for cells already carrying more than one wire
	pub fn point_cost(&self, point: &WirePoint) -> u32 {
		let occupancy = self.occupancy.get_cell_value(point);
		if occupancy > 1 {
			300 * occupancy + 1
		} else {
			1
		}
	}
	/// Hash of the geometric routing state: occupancy, claimed segments, placed wires and the
	/// segment total. The success/failure counters are bookkeeping and deliberately excluded, so
	/// a grid returns to its initial fingerprint once every wire is removed
	pub fn fingerprint(&self) -> u64 {
		let mut hasher = DefaultHasher::new();
		self.occupancy.get_cells().hash(&mut hasher);
		let mut segments: Vec<&Segment> = self.segments.iter().collect();
		segments.sort();
		segments.hash(&mut hasher);
		for wire in self.wires.iter() {
			wire.get_points().hash(&mut hasher);
		}
		self.total_segments.hash(&mut hasher);
		hasher.finish()
	}
}
