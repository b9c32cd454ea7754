//! The OccupancyField counts how many placed wires pass through each cell of the volume.
//!
//! Only the interior points of wires are counted: gates are excluded so that many wires fanning
//! out of the same busy gate are not mistaken for crossings. A cell with a count above one is
//! carrying more wires than it comfortably can and every pass beyond the first is scored as an
//! intersection by the grid's cost function.
//!

use crate::prelude::*;

/// Per-cell counters of wire interior passes
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct OccupancyField {
	/// Extent of the volume the counters cover
	dimensions: GridDimensions,
	/// Flat counter storage, one per cell
	cells: Vec<u32>,
}

impl Field<u32> for OccupancyField {
	/// Get a reference to the backing cell vector
	fn get_cells(&self) -> &[u32] {
		&self.cells
	}
	/// Retrieve a cell count
	///
	/// NB: This will panic if the point is out of bounds
	fn get_cell_value(&self, cell: &WirePoint) -> u32 {
		self.cells[self.dimensions.cell_index(cell)]
	}
	/// Set a cell count
	///
	/// NB: This will panic if the point is out of bounds
	fn set_cell_value(&mut self, value: u32, cell: &WirePoint) {
		let index = self.dimensions.cell_index(cell);
		self.cells[index] = value;
	}
}

impl OccupancyField {
	/// Create a new instance of [OccupancyField] with every counter at zero
	pub fn new(dimensions: GridDimensions) -> Self {
		OccupancyField {
			dimensions,
			cells: vec![0; dimensions.cell_count()],
		}
	}
	/// Record one more wire passing through `cell`
	pub fn increment(&mut self, cell: &WirePoint) {
		let index = self.dimensions.cell_index(cell);
		self.cells[index] += 1;
	}
	/// Record one fewer wire passing through `cell`. Counters never drop below zero
	pub fn decrement(&mut self, cell: &WirePoint) {
		let index = self.dimensions.cell_index(cell);
		self.cells[index] = self.cells[index].saturating_sub(1);
	}
	/// Sum of `count - 1` over every cell carrying more than one wire, i.e. the number of
	/// extra passes across shared cells
	pub fn count_excess_passes(&self) -> u64 {
		self.cells
			.iter()
			.map(|&count| u64::from(count.saturating_sub(1)))
			.sum()
	}
	/// Reset every counter to zero
	pub fn reset(&mut self) {
		self.cells.fill(0);
	}
}
