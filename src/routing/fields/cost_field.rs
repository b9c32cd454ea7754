//! The CostField assigns every cell of the volume a positive weight consumed by the cost-aware
//! pathfinders. A value of `1` is the default and marks free space; larger values mark cells the
//! router should only use when cheaper space has run out.
//!
//! Two effects shape the field. First, gates that appear often in the netlist (or that are boxed
//! in against the grid boundary) have tiered stencils painted around them: concentric shells of
//! decreasing weight that push wires out of the neighbourhood a busy gate will need for its own
//! fan-out. A gate can satisfy several tier rules at once and every applicable tier paints in
//! severity order over the same cells, so the last applicable tier's weights are the ones that
//! survive. Second, every cell gains twice its distance to the nearest face of the volume so the
//! interior of the grid is pricier than the border and the unused upper layers, encouraging
//! detours along the periphery.
//!
//! A field built for a `5x5` base layer with a single busy gate in the middle looks like this on
//! the base layer (before the edge bias):
//!
//! ```text
//!  _____________________________
//! |     |     |     |     |     |
//! |  1  |  1  |  5  |  1  |  1  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  1  |  25 |  50 |  25 |  1  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  5  |  50 |  G  |  50 |  5  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  1  |  25 |  50 |  25 |  1  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  1  |  1  |  5  |  1  |  1  |
//! |_____|_____|_____|_____|_____|
//! ```
//!

use crate::prelude::*;

/// A stencil entry: an `(x, y, z)` offset relative to a gate and the weight written there
type StencilCell = (isize, isize, isize, u32);

/// Painted around gates whose fan-out will dominate their neighbourhood: direct neighbours, a
/// second shell of diagonals and two-step offsets, and a faint third shell
const HIGH_TIER_STENCIL: [StencilCell; 43] = [
	(0, 0, 1, 150),
	(0, -1, 0, 150),
	(0, 1, 0, 150),
	(-1, 0, 0, 150),
	(1, 0, 0, 150),
	(0, 0, 2, 50),
	(0, -2, 0, 50),
	(0, 2, 0, 50),
	(-2, 0, 0, 50),
	(2, 0, 0, 50),
	(-1, -1, 0, 50),
	(-1, 1, 0, 50),
	(1, 1, 0, 50),
	(1, -1, 0, 50),
	(1, 0, 1, 50),
	(-1, 0, 1, 50),
	(0, -1, 1, 50),
	(0, 1, 1, 50),
	(3, 0, 0, 5),
	(-3, 0, 0, 5),
	(0, 3, 0, 5),
	(0, -3, 0, 5),
	(0, 0, 3, 5),
	(2, 1, 0, 5),
	(2, -1, 0, 5),
	(2, 0, 1, 5),
	(-2, 1, 0, 5),
	(-2, -1, 0, 5),
	(-2, 0, 1, 5),
	(1, 2, 0, 5),
	(1, -2, 0, 5),
	(0, 2, 1, 5),
	(-1, 2, 0, 5),
	(-1, -2, 0, 5),
	(0, -2, 1, 5),
	(1, 0, 2, 5),
	(-1, 0, 2, 5),
	(0, 1, 2, 5),
	(0, -1, 2, 5),
	(1, 1, 1, 5),
	(1, -1, 1, 5),
	(-1, 1, 1, 5),
	(-1, -1, 1, 5),
];

/// Same footprint as the high tier at reduced weights
const MEDIUM_TIER_STENCIL: [StencilCell; 43] = [
	(0, 0, 1, 50),
	(0, -1, 0, 50),
	(0, 1, 0, 50),
	(-1, 0, 0, 50),
	(1, 0, 0, 50),
	(0, 0, 2, 25),
	(0, -2, 0, 25),
	(0, 2, 0, 25),
	(-2, 0, 0, 25),
	(2, 0, 0, 25),
	(-1, -1, 0, 25),
	(-1, 1, 0, 25),
	(1, 1, 0, 25),
	(1, -1, 0, 25),
	(1, 0, 1, 25),
	(-1, 0, 1, 25),
	(0, -1, 1, 25),
	(0, 1, 1, 25),
	(3, 0, 0, 5),
	(-3, 0, 0, 5),
	(0, 3, 0, 5),
	(0, -3, 0, 5),
	(0, 0, 3, 5),
	(2, 1, 0, 5),
	(2, -1, 0, 5),
	(2, 0, 1, 5),
	(-2, 1, 0, 5),
	(-2, -1, 0, 5),
	(-2, 0, 1, 5),
	(1, 2, 0, 5),
	(1, -2, 0, 5),
	(0, 2, 1, 5),
	(-1, 2, 0, 5),
	(-1, -2, 0, 5),
	(0, -2, 1, 5),
	(1, 0, 2, 5),
	(-1, 0, 2, 5),
	(0, 1, 2, 5),
	(0, -1, 2, 5),
	(1, 1, 1, 5),
	(1, -1, 1, 5),
	(-1, 1, 1, 5),
	(-1, -1, 1, 5),
];

/// Two shells only. The two vertical-diagonal cells carry `25` rather than `20`, inherited
/// from the tuning runs that produced these tables
const LOW_TIER_STENCIL: [StencilCell; 18] = [
	(0, 0, 1, 40),
	(0, -1, 0, 40),
	(0, 1, 0, 40),
	(-1, 0, 0, 40),
	(1, 0, 0, 40),
	(0, 0, 2, 20),
	(0, -2, 0, 20),
	(0, 2, 0, 20),
	(-2, 0, 0, 20),
	(2, 0, 0, 20),
	(-1, -1, 0, 20),
	(-1, 1, 0, 20),
	(1, 1, 0, 20),
	(1, -1, 0, 20),
	(1, 0, 1, 20),
	(-1, 0, 1, 20),
	(0, -1, 1, 25),
	(0, 1, 1, 25),
];

/// Direct neighbours only, for gates that are merely paired twice
const MINIMAL_TIER_STENCIL: [StencilCell; 5] = [
	(0, 0, 1, 30),
	(0, -1, 0, 30),
	(0, 1, 0, 30),
	(-1, 0, 0, 30),
	(1, 0, 0, 30),
];

/// Severity of the congestion expected around a gate, selected from how often the gate appears in
/// the netlist and how boxed in it is
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum StencilTier {
	/// Very busy or busy and boxed in
	High,
	/// Busy
	Medium,
	/// Moderately busy
	Low,
	/// Paired more than once
	Minimal,
}

impl StencilTier {
	/// The tiers painted for a gate appearing `frequency` times in the netlist with `free_sides`
	/// in-bounds neighbours, in paint order. The high rule is checked on its own and the
	/// medium/low/minimal rules form a separate chain, so a gate can qualify for both the high
	/// and the medium stencil. Every high-qualifying gate also qualifies for medium (each high
	/// disjunct implies a medium one) and the two footprints are identical, which means the
	/// medium weights are the ones that survive on such gates. Gates paired at most once get no
	/// stencil
	fn applicable(frequency: usize, free_sides: usize) -> Vec<StencilTier> {
		let mut tiers = Vec::new();
		if frequency >= 5
			|| (frequency >= 4 && free_sides <= 4)
			|| (frequency >= 3 && free_sides <= 3)
		{
			tiers.push(StencilTier::High);
		}
		if frequency >= 4
			|| (frequency >= 3 && free_sides <= 4)
			|| (frequency >= 2 && free_sides <= 3)
		{
			tiers.push(StencilTier::Medium);
		} else if frequency >= 3 || (frequency >= 2 && free_sides <= 3) {
			tiers.push(StencilTier::Low);
		} else if frequency >= 2 {
			tiers.push(StencilTier::Minimal);
		}
		tiers
	}
	/// The offset/weight table painted for this tier
	fn stencil(&self) -> &'static [StencilCell] {
		match self {
			StencilTier::High => &HIGH_TIER_STENCIL,
			StencilTier::Medium => &MEDIUM_TIER_STENCIL,
			StencilTier::Low => &LOW_TIER_STENCIL,
			StencilTier::Minimal => &MINIMAL_TIER_STENCIL,
		}
	}
}

/// Per-cell routing weights over the volume
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CostField {
	/// Extent of the volume the weights cover
	dimensions: GridDimensions,
	/// Flat weight storage, one per cell
	cells: Vec<u32>,
}

impl Field<u32> for CostField {
	/// Get a reference to the backing cell vector
	fn get_cells(&self) -> &[u32] {
		&self.cells
	}
	/// Retrieve a cell weight
	///
	/// NB: This will panic if the point is out of bounds
	fn get_cell_value(&self, cell: &WirePoint) -> u32 {
		self.cells[self.dimensions.cell_index(cell)]
	}
	/// Set a cell to a weight
	///
	/// NB: This will panic if the point is out of bounds
	fn set_cell_value(&mut self, value: u32, cell: &WirePoint) {
		let index = self.dimensions.cell_index(cell);
		self.cells[index] = value;
	}
}

impl CostField {
	/// Create a new instance of [CostField] with every cell at the default weight of `1`
	pub fn new(dimensions: GridDimensions) -> Self {
		CostField {
			dimensions,
			cells: vec![1; dimensions.cell_count()],
		}
	}
	/// Build the field for a gate layout and netlist: paint the applicable tier stencils of each
	/// gate in ascending id order (later gates and later tiers overwrite earlier weights on
	/// coincident cells) and then apply the edge bias. Construction is deterministic for a given
	/// layout and netlist
	pub fn from_layout(dimensions: GridDimensions, gates: &[Gate], netlist: &[Connection]) -> Self {
		let mut field = CostField::new(dimensions);
		field.apply_gate_stencils(gates, netlist);
		field.apply_edge_bias();
		field
	}
	/// Paint the tier stencils around every gate that qualifies for any. Offsets falling outside
	/// the volume are skipped
	fn apply_gate_stencils(&mut self, gates: &[Gate], netlist: &[Connection]) {
		let frequencies = gate_frequencies(netlist);
		for gate in gates.iter() {
			let frequency = frequencies.get(&gate.get_id()).copied().unwrap_or(0);
			let free_sides = self.dimensions.free_sides(&gate.position());
			let (gate_x, gate_y) = (gate.get_x() as isize, gate.get_y() as isize);
			for tier in StencilTier::applicable(frequency, free_sides) {
				for &(dx, dy, dz, weight) in tier.stencil().iter() {
					let (nx, ny, nz) = (gate_x + dx, gate_y + dy, dz);
					if nx < 0 || ny < 0 {
						continue;
					}
					let cell = WirePoint::new(nx as usize, ny as usize, nz as usize);
					if self.dimensions.contains(&cell) {
						self.set_cell_value(weight, &cell);
					}
				}
			}
		}
	}
	/// Add `2 * distance-to-edge` to every cell so interior cells cost more than border cells
	fn apply_edge_bias(&mut self) {
		for x in 0..self.dimensions.get_length() {
			for y in 0..self.dimensions.get_depth() {
				for z in 0..self.dimensions.get_layers() {
					let cell = WirePoint::new(x, y, z);
					let bias = 2 * self.dimensions.distance_to_edge(&cell) as u32;
					let value = self.get_cell_value(&cell) + bias;
					self.set_cell_value(value, &cell);
				}
			}
		}
	}
}
