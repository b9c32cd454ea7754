//! Four interchangeable per-pair routers sit behind the [Pathfinder] selector. Each consumes a
//! start gate, an end gate and a read-only view of the grid and either produces a [Wire] or
//! reports a [RoutingError]. The pathfinders never mutate the grid: committing the proposed wire
//! is the controller's job.
//!
//! All four share the same legality rules for a candidate step: the target cell must be in
//! bounds, must not be a gate (unless it is the wire's own end gate) and the segment from the
//! current cell to the candidate must not already be claimed by a placed wire. Crossing through a
//! cell another wire occupies is legal, which is exactly what the cost-aware A\* penalises.
//!
//! Every search runs the same shape: initialise at the start gate, expand candidates until either
//! the end gate is reached (producing the wire) or the search space is exhausted (raising a
//! routing failure).
//!

pub mod a_star;
pub mod depth_first;
pub mod lee;
pub mod manhattan;

use crate::prelude::*;

/// Failures raised while searching for a route or while driving an ordering of routes
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
	/// The search space was exhausted without reaching the end gate
	#[error("no route found from gate {from} to gate {to}")]
	NoRoute {
		/// Id of the start gate
		from: usize,
		/// Id of the end gate
		to: usize,
	},
	/// The endpoints were not two distinct registered gates
	#[error("gates {from} and {to} are not two distinct registered gates")]
	InvalidEndpoints {
		/// Id of the start gate
		from: usize,
		/// Id of the end gate
		to: usize,
	},
	/// A netlist pair referenced a gate id with no registered gate
	#[error("no gate registered with id {0}")]
	UnknownGate(usize),
	/// An ordering attempt was abandoned after a pair exhausted its retry budget
	#[error("ordering abandoned: pair ({a}, {b}) exhausted its retry budget of {budget}")]
	OrderingInfeasible {
		/// Id of the first gate of the exhausted pair
		a: usize,
		/// Id of the second gate of the exhausted pair
		b: usize,
		/// The retry budget that ran out
		budget: usize,
	},
	/// The grid rejected an operation mid-ordering, which indicates a bug in the caller
	#[error("grid rejected an operation during routing: {0}")]
	Grid(#[from] GridError),
}

/// Selects which routing algorithm lays the wire for each pair
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Pathfinder {
	/// Baseline that walks the x-stretch then the y-stretch on the base layer, blind to obstacles
	Manhattan,
	/// Depth-first search biased towards the target
	DepthFirst,
	/// Breadth-first wavefront, shortest route in steps
	Lee,
	/// Cost-aware search minimising the cost field plus the dynamic crossing penalty
	AStar,
}

impl Pathfinder {
	/// Search for a wire connecting `start` to `end` over the current grid state. The endpoints
	/// must be two distinct registered gates
	pub fn route(&self, start: &Gate, end: &Gate, grid: &Grid) -> Result<Wire, RoutingError> {
		if start.position() == end.position() {
			return Err(RoutingError::InvalidEndpoints {
				from: start.get_id(),
				to: end.get_id(),
			});
		}
		for gate in [start, end] {
			if !grid.is_gate_cell(&gate.position()) {
				return Err(RoutingError::UnknownGate(gate.get_id()));
			}
		}
		match self {
			Pathfinder::Manhattan => manhattan::route(start, end, grid),
			Pathfinder::DepthFirst => depth_first::route(start, end, grid),
			Pathfinder::Lee => lee::route(start, end, grid),
			Pathfinder::AStar => a_star::route(start, end, grid),
		}
	}
}

/// Whether a wire may step from `current` onto `candidate`: the candidate must be in bounds, must
/// not be a gate cell other than the wire's own `target` and the connecting segment must be
/// unclaimed
pub(crate) fn is_legal_step(
	current: &WirePoint,
	candidate: &WirePoint,
	target: &WirePoint,
	grid: &Grid,
) -> bool {
	if !grid.get_dimensions().contains(candidate) {
		return false;
	}
	if grid.is_gate_cell(candidate) && candidate != target {
		return false;
	}
	!grid.is_segment_used(&Segment::new(*current, *candidate))
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn route_rejects_identical_endpoints() {
		let gates = vec![Gate::new(1, 0, 0), Gate::new(2, 2, 0)];
		let grid = Grid::from_layout(gates, &[Connection::new(1, 2)]).unwrap();
		let gate = *grid.get_gate(1).unwrap();
		let result = Pathfinder::Lee.route(&gate, &gate, &grid);
		assert!(matches!(result, Err(RoutingError::InvalidEndpoints { .. })));
	}
	#[test]
	fn route_rejects_unregistered_gates() {
		let gates = vec![Gate::new(1, 0, 0), Gate::new(2, 2, 0)];
		let grid = Grid::from_layout(gates, &[Connection::new(1, 2)]).unwrap();
		let start = *grid.get_gate(1).unwrap();
		let phantom = Gate::new(9, 1, 1);
		let result = Pathfinder::Lee.route(&start, &phantom, &grid);
		assert!(matches!(result, Err(RoutingError::UnknownGate(9))));
	}
	#[test]
	fn steps_onto_foreign_gates_are_illegal() {
		let gates = vec![Gate::new(1, 0, 0), Gate::new(2, 2, 0), Gate::new(3, 1, 0)];
		let grid = Grid::from_layout(gates, &[Connection::new(1, 2)]).unwrap();
		let current = WirePoint::new(0, 0, 0);
		let blocked = WirePoint::new(1, 0, 0);
		let target = WirePoint::new(2, 0, 0);
		assert!(!is_legal_step(&current, &blocked, &target, &grid));
		// the end gate itself is always enterable
		assert!(is_legal_step(
			&WirePoint::new(2, 1, 0),
			&target,
			&target,
			&grid
		));
	}
	#[test]
	fn steps_over_claimed_segments_are_illegal() {
		let gates = vec![Gate::new(1, 0, 0), Gate::new(2, 2, 0)];
		let mut grid = Grid::from_layout(gates, &[Connection::new(1, 2)]).unwrap();
		let wire = Wire::new(vec![
			WirePoint::new(0, 0, 0),
			WirePoint::new(1, 0, 0),
			WirePoint::new(2, 0, 0),
		]);
		grid.try_add_wire(wire).unwrap();
		let current = WirePoint::new(1, 0, 0);
		let candidate = WirePoint::new(0, 0, 0);
		assert!(!is_legal_step(
			&current,
			&candidate,
			&WirePoint::new(0, 0, 0),
			&grid
		));
	}
}
