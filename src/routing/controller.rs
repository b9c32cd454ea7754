//! The RoutingController drives one ordering of the netlist at a time against a single
//! pathfinder. Within an ordering it routes pair by pair, committing each proposed wire to the
//! grid. When a pair cannot be routed the controller backtracks: the most recently committed wire
//! is popped off the grid, its connection is queued for re-routing and the failing pair is
//! retried against the loosened grid. A pair that keeps failing past its retry budget declares
//! the whole ordering infeasible, the grid is wiped and the next ordering starts from scratch.
//!
//! Across orderings the controller records how many attempts routed completely, the lowest total
//! cost seen and the wires that achieved it.
//!

use std::collections::{HashMap, VecDeque};

use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::prelude::*;

/// The published outcome of a routing run: attempt counts, the best cost found and the wires
/// that achieved it
#[derive(Debug, Default, Clone)]
pub struct RunReport {
	/// Number of orderings attempted
	attempted: usize,
	/// Number of orderings that routed every pair
	successful: usize,
	/// Lowest total cost across successful orderings
	best_cost: Option<u64>,
	/// The wires of the best ordering, in placement order
	best_wires: Vec<Wire>,
	/// Segment total of the best ordering
	best_segments: u64,
	/// Intersection total of the best ordering
	best_intersections: u64,
}

impl RunReport {
	/// Number of orderings attempted
	pub fn get_attempted(&self) -> usize {
		self.attempted
	}
	/// Number of orderings that routed every pair
	pub fn get_successful(&self) -> usize {
		self.successful
	}
	/// Fraction of attempted orderings that routed completely
	pub fn success_rate(&self) -> f64 {
		if self.attempted == 0 {
			0.0
		} else {
			self.successful as f64 / self.attempted as f64
		}
	}
	/// Lowest total cost across successful orderings, [None] when every ordering failed
	pub fn get_best_cost(&self) -> Option<u64> {
		self.best_cost
	}
	/// The wires of the best ordering, in placement order
	pub fn get_best_wires(&self) -> &[Wire] {
		&self.best_wires
	}
	/// Segment total of the best ordering
	pub fn get_best_segments(&self) -> u64 {
		self.best_segments
	}
	/// Intersection total of the best ordering
	pub fn get_best_intersections(&self) -> u64 {
		self.best_intersections
	}
	/// Whether at least one ordering routed every pair
	pub fn is_success(&self) -> bool {
		self.successful > 0
	}
	/// Fold the outcome of one fully routed ordering into the report
	fn record_success(&mut self, grid: &Grid) {
		self.attempted += 1;
		self.successful += 1;
		let cost = grid.total_cost();
		if self.best_cost.is_none_or(|best| cost < best) {
			self.best_cost = Some(cost);
			self.best_wires = grid.get_wires().to_vec();
			self.best_segments = grid.get_total_segments() as u64;
			self.best_intersections = grid.total_intersections();
		}
	}
	/// Fold an infeasible ordering into the report
	fn record_failure(&mut self) {
		self.attempted += 1;
	}
}

/// Routes netlists by trying orderings against a single pathfinder with per-pair backtracking
pub struct RoutingController {
	/// The per-pair router every ordering is driven against
	pathfinder: Pathfinder,
	/// Per-pair retry budget override; derived from the netlist size when unset
	retry_budget: Option<usize>,
	/// Controller-owned randomness feeding the ordering generators
	rng: StdRng,
}

impl RoutingController {
	/// Create a new instance of [RoutingController] for a pathfinder, seeding the controller's
	/// own RNG so runs are reproducible
	pub fn new(pathfinder: Pathfinder, seed: u64) -> Self {
		RoutingController {
			pathfinder,
			retry_budget: None,
			rng: StdRng::seed_from_u64(seed),
		}
	}
	/// Override the per-pair retry budget used before an ordering is declared infeasible
	pub fn with_retry_budget(mut self, budget: usize) -> Self {
		self.retry_budget = Some(budget);
		self
	}
	/// Get the pathfinder this controller routes with
	pub fn get_pathfinder(&self) -> Pathfinder {
		self.pathfinder
	}
	/// Route every ordering of a prepared batch and report the best outcome. The grid is reset
	/// before each ordering; after the call it holds the state of the last attempted ordering
	pub fn route_with_orderings(
		&mut self,
		grid: &mut Grid,
		netlist: &[Connection],
		orderings: &[Vec<Connection>],
	) -> RunReport {
		let mut report = RunReport::default();
		for (index, ordering) in orderings.iter().enumerate() {
			match self.route_ordering(grid, netlist, ordering) {
				Ok(cost) => {
					debug!("ordering {} routed completely at cost {}", index, cost);
					report.record_success(grid);
				}
				Err(failure) => {
					debug!("ordering {} abandoned: {}", index, failure);
					report.record_failure();
				}
			}
		}
		info!(
			"routed {}/{} orderings, best cost {:?}",
			report.get_successful(),
			report.get_attempted(),
			report.get_best_cost()
		);
		report
	}
	/// Generate orderings for a strategy and route them. The Q-learning strategy runs closed-loop
	/// instead, feeding each episode's outcome back into the scheduler as reward
	pub fn route_with_strategy(
		&mut self,
		grid: &mut Grid,
		netlist: &[Connection],
		strategy: OrderingStrategy,
	) -> RunReport {
		match strategy {
			OrderingStrategy::QLearning { episodes } => {
				self.route_q_learning(grid, netlist, episodes)
			}
			batch_strategy => {
				let orderings = batch_strategy.generate(netlist, grid.get_gates(), &mut self.rng);
				self.route_with_orderings(grid, netlist, &orderings)
			}
		}
	}
	/// Learn profitable ordering swaps over `episodes` routing attempts. Each episode swaps two
	/// positions of the current ordering, routes the result and rewards the swap with the negated
	/// total cost (or a heavy penalty for infeasible orderings)
	pub fn route_q_learning(
		&mut self,
		grid: &mut Grid,
		netlist: &[Connection],
		episodes: usize,
	) -> RunReport {
		if netlist.len() < 2 {
			// nothing to swap, route the lone ordering directly
			let orderings = vec![netlist.to_vec()];
			return self.route_with_orderings(grid, netlist, &orderings);
		}
		let mut scheduler = QLearningScheduler::new(self.rng.random());
		let mut state = netlist.to_vec();
		let mut report = RunReport::default();
		for episode in 0..episodes {
			let action = scheduler.choose_action(&state);
			let next_state = QLearningScheduler::apply_action(&state, action);
			let reward = match self.route_ordering(grid, netlist, &next_state) {
				Ok(cost) => {
					report.record_success(grid);
					-(cost as f64)
				}
				Err(failure) => {
					debug!("episode {} infeasible: {}", episode, failure);
					report.record_failure();
					INFEASIBLE_REWARD
				}
			};
			scheduler.update(&state, action, reward, &next_state);
			state = next_state;
		}
		info!(
			"q-learning finished after {} episodes with {} table entries, best cost {:?}",
			episodes,
			scheduler.table_size(),
			report.get_best_cost()
		);
		report
	}
	/// Route a single ordering on a freshly reset grid. Routing failures pop the most recently
	/// committed wire (queueing its pair for re-routing) and retry the failing pair; the ordering
	/// is abandoned once a pair runs out of retries or there is nothing left to pop
	fn route_ordering(
		&mut self,
		grid: &mut Grid,
		netlist: &[Connection],
		ordering: &[Connection],
	) -> Result<u64, RoutingError> {
		grid.clear_wires(netlist);
		let budget = self.retry_budget.unwrap_or_else(|| ordering.len().max(4));
		let mut pending: VecDeque<Connection> = ordering.iter().copied().collect();
		let mut laid: Vec<(Connection, Wire)> = Vec::new();
		let mut retries: HashMap<Connection, usize> = HashMap::new();
		while let Some(pair) = pending.pop_front() {
			let start = *grid
				.get_gate(pair.get_a())
				.ok_or(RoutingError::UnknownGate(pair.get_a()))?;
			let end = *grid
				.get_gate(pair.get_b())
				.ok_or(RoutingError::UnknownGate(pair.get_b()))?;
			loop {
				let proposed = self.pathfinder.route(&start, &end, grid);
				match proposed {
					Ok(wire) => match grid.try_add_wire(wire.clone()) {
						Ok(()) => {
							laid.push((pair, wire));
							break;
						}
						Err(violation) => {
							// the pathfinder proposed an illegal wire (the obstacle-blind
							// manhattan baseline does this routinely); treat it as a failure
							debug!("proposed wire rejected: {}", violation);
						}
					},
					Err(failure) => match failure {
						RoutingError::NoRoute { .. } => {}
						fatal => return Err(fatal),
					},
				}
				grid.record_failed_wire();
				let attempts = retries.entry(pair).or_insert(0);
				*attempts += 1;
				if *attempts > budget {
					return Err(RoutingError::OrderingInfeasible {
						a: pair.get_a(),
						b: pair.get_b(),
						budget,
					});
				}
				let Some((blocked_pair, last_wire)) = laid.pop() else {
					// nothing to backtrack over, the pair is unroutable on a clean grid
					warn!(
						"pair ({}, {}) unroutable with no wires to backtrack",
						pair.get_a(),
						pair.get_b()
					);
					return Err(RoutingError::OrderingInfeasible {
						a: pair.get_a(),
						b: pair.get_b(),
						budget,
					});
				};
				grid.remove_wire(&last_wire)?;
				// the popped pair reroutes after the current one
				pending.push_front(blocked_pair);
			}
		}
		Ok(grid.total_cost())
	}
}
