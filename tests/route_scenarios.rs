//! End-to-end routing scenarios covering the engine's contract: baseline wiring, obstacle
//! bypasses, forced crossings, controller backtracking, cost field determinism and the
//! place/remove round trip
//!

use gridwire::prelude::*;

/// Check the structural invariants of a routed grid: the segment set is exactly the union of the
/// placed wires' segments and every non-gate cell counts precisely the wires whose interior
/// passes through it
fn assert_grid_invariants(grid: &Grid) {
	use std::collections::{HashMap, HashSet};
	let mut union: HashSet<Segment> = HashSet::new();
	let mut segment_total = 0;
	let mut interior_counts: HashMap<WirePoint, u32> = HashMap::new();
	for wire in grid.get_wires() {
		assert!(wire.is_connected());
		for point in wire.get_interior() {
			assert!(!grid.is_gate_cell(point));
			*interior_counts.entry(*point).or_insert(0) += 1;
		}
		for segment in wire.get_segments() {
			assert!(union.insert(segment), "segment shared between wires");
		}
		segment_total += wire.segment_count();
	}
	assert_eq!(&union, grid.get_segments());
	assert_eq!(segment_total, grid.get_total_segments());
	for (point, count) in interior_counts.iter() {
		assert_eq!(*count, grid.get_occupancy().get_cell_value(point));
	}
	let expected_intersections: u64 = interior_counts
		.values()
		.map(|&count| u64::from(count.saturating_sub(1)))
		.sum();
	assert_eq!(expected_intersections, grid.total_intersections());
	assert_eq!(
		300 * grid.total_intersections() + grid.get_total_segments() as u64,
		grid.total_cost()
	);
}

#[test]
/// A single pair two cells apart routes as a straight baseline wire of two segments
fn trivial_connect() {
	let mut grid = Grid::new(GridDimensions::new(5, 5));
	grid.place_gate(Gate::new(1, 0, 0)).unwrap();
	grid.place_gate(Gate::new(2, 2, 0)).unwrap();
	let netlist = vec![Connection::new(1, 2)];
	grid.apply_costs_around_gates(&netlist);
	let start = *grid.get_gate(1).unwrap();
	let end = *grid.get_gate(2).unwrap();
	let wire = Pathfinder::Manhattan.route(&start, &end, &grid).unwrap();
	assert_eq!(
		vec![
			WirePoint::new(0, 0, 0),
			WirePoint::new(1, 0, 0),
			WirePoint::new(2, 0, 0),
		],
		wire.get_points()
	);
	grid.try_add_wire(wire).unwrap();
	assert_eq!(2, grid.get_total_segments());
	assert_eq!(0, grid.total_intersections());
	assert_eq!(2, grid.total_cost());
	assert_grid_invariants(&grid);
}

#[test]
/// A gate sitting between a pair forces the cost-aware router around or over it
fn bypass_via_upper_layer() {
	let gates = vec![Gate::new(1, 0, 1), Gate::new(2, 2, 1), Gate::new(3, 1, 1)];
	let netlist = vec![Connection::new(1, 2)];
	let mut grid = Grid::from_layout(gates, &netlist).unwrap();
	let start = *grid.get_gate(1).unwrap();
	let end = *grid.get_gate(2).unwrap();
	let wire = Pathfinder::AStar.route(&start, &end, &grid).unwrap();
	// the blocking gate may not appear anywhere inside the wire
	assert!(!wire
		.get_interior()
		.iter()
		.any(|point| *point == WirePoint::new(1, 1, 0)));
	assert!(wire.segment_count() <= 5);
	let length = wire.segment_count() as u64;
	grid.try_add_wire(wire).unwrap();
	assert_eq!(0, grid.total_intersections());
	assert_eq!(length, grid.total_cost());
	assert_grid_invariants(&grid);
}

#[test]
/// Two diagonal pairs on a tight grid cannot both take clean lanes: one crossing is forced and
/// scored at 300
fn forced_crossing() {
	let gates = vec![
		Gate::new(1, 0, 0),
		Gate::new(2, 2, 2),
		Gate::new(3, 0, 2),
		Gate::new(4, 2, 0),
	];
	let netlist = vec![Connection::new(1, 2), Connection::new(3, 4)];
	let mut grid = Grid::from_layout(gates, &netlist).unwrap();
	let mut controller = RoutingController::new(Pathfinder::Lee, 0);
	let report = controller.route_with_orderings(&mut grid, &netlist, &[netlist.clone()]);
	assert!(report.is_success());
	assert_eq!(2, grid.get_wires().len());
	assert!(grid.total_intersections() >= 1);
	assert!(grid.total_cost() >= 300 + grid.get_total_segments() as u64);
	assert_grid_invariants(&grid);
}

#[test]
/// The obstacle-blind baseline cannot resolve overlapping L-paths no matter how often the
/// controller backtracks, while an adaptive router routes the same layout in one pass
fn backtracking_pops_wires_and_adaptive_routing_recovers() {
	let gates = vec![Gate::new(1, 0, 0), Gate::new(2, 1, 3), Gate::new(3, 3, 1)];
	let netlist = vec![Connection::new(1, 2), Connection::new(3, 2)];
	// baseline: backtracking pops and re-lays wires until the retry budget runs out
	let mut grid = Grid::from_layout(gates.clone(), &netlist).unwrap();
	let mut controller = RoutingController::new(Pathfinder::Manhattan, 0).with_retry_budget(4);
	let report = controller.route_with_orderings(&mut grid, &netlist, &[netlist.clone()]);
	assert!(!report.is_success());
	assert!(grid.get_failed_wires() > 0);
	// adaptive: the same layout routes completely, leaving exactly two legal wires
	let mut grid = Grid::from_layout(gates, &netlist).unwrap();
	let mut controller = RoutingController::new(Pathfinder::Lee, 0);
	let report = controller.route_with_orderings(&mut grid, &netlist, &[netlist.clone()]);
	assert!(report.is_success());
	assert_eq!(2, grid.get_wires().len());
	assert_grid_invariants(&grid);
}

#[test]
/// Building the cost field twice for the same layout yields identical weights
fn cost_field_determinism() {
	let gates = vec![
		Gate::new(1, 1, 1),
		Gate::new(2, 5, 1),
		Gate::new(3, 3, 4),
		Gate::new(4, 0, 6),
	];
	let netlist = vec![
		Connection::new(1, 2),
		Connection::new(1, 3),
		Connection::new(1, 4),
		Connection::new(2, 3),
		Connection::new(2, 4),
	];
	let first = Grid::from_layout(gates.clone(), &netlist).unwrap();
	let second = Grid::from_layout(gates, &netlist).unwrap();
	assert_eq!(first.get_cost_field(), second.get_cost_field());
	assert_eq!(
		first.get_cost_field().get_cells(),
		second.get_cost_field().get_cells()
	);
}

#[test]
/// Removing every placed wire in reverse order returns the grid to its initial fingerprint
fn round_trip() {
	let gates = vec![
		Gate::new(1, 0, 0),
		Gate::new(2, 4, 0),
		Gate::new(3, 0, 4),
		Gate::new(4, 4, 4),
	];
	let netlist = vec![
		Connection::new(1, 2),
		Connection::new(3, 4),
		Connection::new(1, 3),
	];
	let mut grid = Grid::from_layout(gates, &netlist).unwrap();
	let clean = grid.fingerprint();
	let mut placed = Vec::new();
	for pair in netlist.iter() {
		let start = *grid.get_gate(pair.get_a()).unwrap();
		let end = *grid.get_gate(pair.get_b()).unwrap();
		let wire = Pathfinder::Lee.route(&start, &end, &grid).unwrap();
		grid.try_add_wire(wire.clone()).unwrap();
		placed.push(wire);
	}
	assert_eq!(3, grid.get_wires().len());
	assert_grid_invariants(&grid);
	assert_ne!(clean, grid.fingerprint());
	for wire in placed.iter().rev() {
		grid.remove_wire(wire).unwrap();
	}
	assert_eq!(clean, grid.fingerprint());
	assert_eq!(0, grid.get_total_segments());
	assert!(grid.get_wires().is_empty());
}

#[test]
/// A full strategy-driven run over a small chip publishes a coherent report
fn full_run_reports_best_routing() {
	let gates = vec![
		Gate::new(1, 0, 0),
		Gate::new(2, 5, 0),
		Gate::new(3, 0, 5),
		Gate::new(4, 5, 5),
		Gate::new(5, 2, 2),
	];
	let netlist = vec![
		Connection::new(1, 2),
		Connection::new(3, 4),
		Connection::new(1, 5),
		Connection::new(5, 4),
	];
	let mut grid = Grid::from_layout(gates, &netlist).unwrap();
	let mut controller = RoutingController::new(Pathfinder::AStar, 99);
	let report = controller.route_with_strategy(
		&mut grid,
		&netlist,
		OrderingStrategy::Distance { variations: 8 },
	);
	assert_eq!(8, report.get_attempted());
	assert!(report.is_success());
	let best = report.get_best_cost().unwrap();
	assert_eq!(
		best,
		300 * report.get_best_intersections() + report.get_best_segments()
	);
	assert_eq!(netlist.len(), report.get_best_wires().len());
}
