//! The kinds of per-cell data layers draped over the routing volume
//!

pub mod cost_field;
pub mod occupancy_field;

use crate::prelude::*;

/// Defines required access to the per-cell layers of the grid. Implementors back their cells with
/// a flat vector indexed through [GridDimensions::cell_index]
pub trait Field<T: Copy> {
	/// Get a reference to the backing cell vector
	fn get_cells(&self) -> &[T];
	/// Retrieve a cell value
	///
	/// NB: This will panic if the point is out of bounds
	fn get_cell_value(&self, cell: &WirePoint) -> T;
	/// Set a cell to a value
	///
	/// NB: This will panic if the point is out of bounds
	fn set_cell_value(&mut self, value: T, cell: &WirePoint);
}
