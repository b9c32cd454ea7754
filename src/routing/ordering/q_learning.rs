//! Tabular Q-learning over netlist orderings. The state is the current ordering, an action swaps
//! two positions in it and the reward is the negated total cost of routing the swapped ordering
//! (or a large penalty when it cannot be routed at all). Over episodes the table learns which
//! swaps tend to cheapen a routing, nudging the ordering search beyond the fixed heuristics.
//!
//! The scheduler owns its table and its RNG so repeated runs never leak learned state into each
//! other; convergence is not guaranteed and not required, the aim is improvement over the
//! baseline sorts.
//!

use std::collections::HashMap;

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::prelude::*;

/// Reward assigned to orderings that could not be routed at all
pub const INFEASIBLE_REWARD: f64 = -1_000_000.0;

/// Default learning rate
const DEFAULT_ALPHA: f64 = 0.1;
/// Default discount factor
const DEFAULT_GAMMA: f64 = 0.9;
/// Default exploration rate
const DEFAULT_EPSILON: f64 = 0.2;

/// A swap of two positions in an ordering
type SwapAction = (usize, usize);

/// Learns which ordering swaps produce cheap routings
pub struct QLearningScheduler {
	/// Learned action values keyed by `(ordering, swap)`; missing entries default to zero
	q_table: HashMap<(Vec<Connection>, SwapAction), f64>,
	/// Learning rate
	alpha: f64,
	/// Discount factor
	gamma: f64,
	/// Exploration rate for the epsilon-greedy policy
	epsilon: f64,
	/// Scheduler-owned randomness so runs are reproducible from the seed
	rng: StdRng,
}

impl QLearningScheduler {
	/// Create a new instance of [QLearningScheduler] with the default parameters
	pub fn new(seed: u64) -> Self {
		QLearningScheduler::with_parameters(DEFAULT_ALPHA, DEFAULT_GAMMA, DEFAULT_EPSILON, seed)
	}
	/// Create a [QLearningScheduler] with explicit learning parameters
	pub fn with_parameters(alpha: f64, gamma: f64, epsilon: f64, seed: u64) -> Self {
		QLearningScheduler {
			q_table: HashMap::new(),
			alpha,
			gamma,
			epsilon,
			rng: StdRng::seed_from_u64(seed),
		}
	}
	/// Number of `(state, action)` pairs the table has learned values for
	pub fn table_size(&self) -> usize {
		self.q_table.len()
	}
	/// Learned value of taking `action` in `state`, zero when never visited
	pub fn action_value(&self, state: &[Connection], action: SwapAction) -> f64 {
		self.q_table
			.get(&(state.to_vec(), action))
			.copied()
			.unwrap_or(0.0)
	}
	/// Pick a swap for `state` with an epsilon-greedy policy: mostly the best known action,
	/// sometimes a random exploratory one. States never seen before always explore
	pub fn choose_action(&mut self, state: &[Connection]) -> SwapAction {
		if state.len() < 2 {
			return (0, 0);
		}
		if self.rng.random::<f64>() < self.epsilon {
			return self.random_swap(state.len());
		}
		let mut best_known: Option<(SwapAction, f64)> = None;
		for ((seen_state, action), value) in self.q_table.iter() {
			if seen_state == state && best_known.is_none_or(|(_, best)| *value > best) {
				best_known = Some((*action, *value));
			}
		}
		match best_known {
			Some((action, _)) => action,
			None => self.random_swap(state.len()),
		}
	}
	/// Standard Bellman update of the table entry for `(state, action)` given the observed
	/// `reward` and the resulting `next_state`
	pub fn update(
		&mut self,
		state: &[Connection],
		action: SwapAction,
		reward: f64,
		next_state: &[Connection],
	) {
		let next_max = self
			.q_table
			.iter()
			.filter(|((s, _), _)| s == next_state)
			.map(|(_, value)| *value)
			.fold(None::<f64>, |best, value| {
				Some(best.map_or(value, |b| b.max(value)))
			})
			.unwrap_or(0.0);
		let entry = self
			.q_table
			.entry((state.to_vec(), action))
			.or_insert(0.0);
		*entry += self.alpha * (reward + self.gamma * next_max - *entry);
	}
	/// Apply a swap to an ordering, producing the next state
	pub fn apply_action(state: &[Connection], action: SwapAction) -> Vec<Connection> {
		let mut next_state = state.to_vec();
		if action.0 < next_state.len() && action.1 < next_state.len() {
			next_state.swap(action.0, action.1);
		}
		next_state
	}
	/// Two distinct random indices into an ordering of `len` pairs
	fn random_swap(&mut self, len: usize) -> SwapAction {
		let first = self.rng.random_range(0..len);
		let mut second = self.rng.random_range(0..len);
		while second == first {
			second = self.rng.random_range(0..len);
		}
		(first, second)
	}
}
