//! `use gridwire::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::routing::{
	controller::*,
	fields::{cost_field::*, occupancy_field::*, *},
	grid::*,
	ordering::{q_learning::*, *},
	pathfinders::*,
	primitives::*,
	wire::*,
	*,
};
#[cfg(any(feature = "csv", feature = "ron"))]
#[doc(hidden)]
pub use crate::routing::io::*;
