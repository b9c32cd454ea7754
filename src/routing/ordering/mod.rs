//! Generators of netlist orderings. Which pairs are routed first decides both whether a layout
//! routes at all and how expensive the result is, so the controller tries many orderings and
//! keeps the best. Strategies either sort once (busy gates first, short pairs first), produce
//! shuffled variations of a sort by rearranging runs of equal keys, sample random permutations,
//! or learn profitable index swaps with tabular Q-learning.
//!

pub mod q_learning;

use std::collections::{HashMap, HashSet};

use rand::prelude::*;

use crate::prelude::*;

/// Selects how candidate orderings of the netlist are produced
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OrderingStrategy {
	/// Distinct uniformly sampled permutations
	Random {
		/// How many permutations to draw, capped by the number that exist
		samples: usize,
	},
	/// Pairs touching the busiest gates first
	BusyGates {
		/// `1` for the plain sort, larger to also shuffle runs of equal frequency
		variations: usize,
	},
	/// Pairs spanning the shortest planar distance first
	Distance {
		/// `1` for the plain sort, larger to also shuffle runs of equal distance
		variations: usize,
	},
	/// Tabular Q-learning over index swaps, driven closed-loop by the controller
	QLearning {
		/// Number of swap episodes to learn over
		episodes: usize,
	},
}

impl OrderingStrategy {
	/// Produce the batch of orderings this strategy proposes. The Q-learning strategy is driven
	/// closed-loop by the controller and proposes only the input ordering here
	pub fn generate(
		&self,
		netlist: &[Connection],
		gates: &[Gate],
		rng: &mut impl Rng,
	) -> Vec<Vec<Connection>> {
		match self {
			OrderingStrategy::Random { samples } => random_permutations(netlist, *samples, rng),
			OrderingStrategy::BusyGates { variations } => {
				if *variations <= 1 {
					vec![sort_by_busy_gates(netlist)]
				} else {
					busy_gate_variations(netlist, *variations, rng)
				}
			}
			OrderingStrategy::Distance { variations } => {
				if *variations <= 1 {
					vec![sort_by_distance(netlist, gates)]
				} else {
					distance_variations(netlist, gates, *variations, rng)
				}
			}
			OrderingStrategy::QLearning { .. } => vec![netlist.to_vec()],
		}
	}
}

/// Number of permutations of `n` pairs, or [None] once the factorial overflows
fn permutation_count(n: usize) -> Option<usize> {
	(1..=n).try_fold(1usize, |total, factor| total.checked_mul(factor))
}

/// Every permutation of `items`, in lexicographic position order
fn all_permutations(items: &[Connection]) -> Vec<Vec<Connection>> {
	if items.len() <= 1 {
		return vec![items.to_vec()];
	}
	let mut permutations = Vec::new();
	for index in 0..items.len() {
		let mut rest = items.to_vec();
		let first = rest.remove(index);
		for mut tail in all_permutations(&rest) {
			let mut permutation = Vec::with_capacity(items.len());
			permutation.push(first);
			permutation.append(&mut tail);
			permutations.push(permutation);
		}
	}
	permutations
}

/// Draw up to `num_samples` distinct permutations of the netlist uniformly at random. When the
/// request covers every permutation the full enumeration is returned instead. Sampling attempts
/// are bounded so duplicate pairs in the netlist (which deflate the number of distinct
/// permutations) cannot livelock the loop
pub fn random_permutations(
	netlist: &[Connection],
	num_samples: usize,
	rng: &mut impl Rng,
) -> Vec<Vec<Connection>> {
	if let Some(total) = permutation_count(netlist.len()) {
		if total <= num_samples {
			return all_permutations(netlist);
		}
	}
	let max_attempts = num_samples.saturating_mul(100).max(1000);
	let mut selected = HashSet::new();
	let mut orderings = Vec::with_capacity(num_samples);
	let mut attempts = 0;
	while orderings.len() < num_samples && attempts < max_attempts {
		attempts += 1;
		let mut candidate = netlist.to_vec();
		candidate.shuffle(rng);
		if selected.insert(candidate.clone()) {
			orderings.push(candidate);
		}
	}
	orderings
}

/// The combined netlist frequency of a pair's two gates
fn busy_key(connection: &Connection, frequencies: &HashMap<usize, usize>) -> usize {
	frequencies.get(&connection.get_a()).copied().unwrap_or(0)
		+ frequencies.get(&connection.get_b()).copied().unwrap_or(0)
}

/// Sort the netlist descending by how busy each pair's gates are, so the connections competing
/// for the most contested neighbourhoods are routed while the grid is still empty
pub fn sort_by_busy_gates(netlist: &[Connection]) -> Vec<Connection> {
	let frequencies = gate_frequencies(netlist);
	let mut sorted = netlist.to_vec();
	sorted.sort_by_key(|connection| std::cmp::Reverse(busy_key(connection, &frequencies)));
	sorted
}

/// Planar Manhattan distance between a pair's gates. Layers are ignored because gates all sit on
/// the base layer
fn distance_key(connection: &Connection, positions: &HashMap<usize, (usize, usize)>) -> usize {
	let (ax, ay) = positions
		.get(&connection.get_a())
		.copied()
		.expect("netlist references an unregistered gate id");
	let (bx, by) = positions
		.get(&connection.get_b())
		.copied()
		.expect("netlist references an unregistered gate id");
	ax.abs_diff(bx) + ay.abs_diff(by)
}

/// Gate id to planar position lookup
fn gate_positions(gates: &[Gate]) -> HashMap<usize, (usize, usize)> {
	gates
		.iter()
		.map(|gate| (gate.get_id(), (gate.get_x(), gate.get_y())))
		.collect()
}

/// Sort the netlist ascending by the planar distance between each pair's gates, routing short
/// local connections before long snaking ones
pub fn sort_by_distance(netlist: &[Connection], gates: &[Gate]) -> Vec<Connection> {
	let positions = gate_positions(gates);
	let mut sorted = netlist.to_vec();
	sorted.sort_by_key(|connection| distance_key(connection, &positions));
	sorted
}

/// Rearrange a sorted netlist by shuffling every run of pairs sharing the same key, keeping the
/// overall sort order intact
fn shuffle_equal_runs<K: PartialEq>(
	sorted: &[Connection],
	key: impl Fn(&Connection) -> K,
	rng: &mut impl Rng,
) -> Vec<Connection> {
	let mut shuffled = sorted.to_vec();
	let mut run_start = 0;
	while run_start < shuffled.len() {
		let mut run_end = run_start + 1;
		while run_end < shuffled.len() && key(&shuffled[run_end]) == key(&shuffled[run_start]) {
			run_end += 1;
		}
		shuffled[run_start..run_end].shuffle(rng);
		run_start = run_end;
	}
	shuffled
}

/// Multiple busy-gate sorts of the netlist where each variation randomly rearranges the pairs
/// within every run of equal combined frequency
pub fn busy_gate_variations(
	netlist: &[Connection],
	num_variations: usize,
	rng: &mut impl Rng,
) -> Vec<Vec<Connection>> {
	let frequencies = gate_frequencies(netlist);
	let sorted = sort_by_busy_gates(netlist);
	(0..num_variations)
		.map(|_| shuffle_equal_runs(&sorted, |connection| busy_key(connection, &frequencies), rng))
		.collect()
}

/// Multiple distance sorts of the netlist where each variation randomly rearranges the pairs
/// within every run of equal planar distance
pub fn distance_variations(
	netlist: &[Connection],
	gates: &[Gate],
	num_variations: usize,
	rng: &mut impl Rng,
) -> Vec<Vec<Connection>> {
	let positions = gate_positions(gates);
	let sorted = sort_by_distance(netlist, gates);
	(0..num_variations)
		.map(|_| shuffle_equal_runs(&sorted, |connection| distance_key(connection, &positions), rng))
		.collect()
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::StdRng;
	#[test]
	fn busy_gates_sort_descending_and_stable() {
		let netlist = vec![
			Connection::new(1, 2),
			Connection::new(3, 4),
			Connection::new(1, 3),
			Connection::new(1, 4),
		];
		let result = sort_by_busy_gates(&netlist);
		let actual = vec![
			Connection::new(1, 3),
			Connection::new(1, 4),
			Connection::new(1, 2),
			Connection::new(3, 4),
		];
		assert_eq!(actual, result);
	}
	#[test]
	fn distance_sort_ascending_and_stable() {
		let gates = vec![
			Gate::new(1, 0, 0),
			Gate::new(2, 5, 0),
			Gate::new(3, 1, 1),
			Gate::new(4, 0, 2),
		];
		let netlist = vec![
			Connection::new(1, 2),
			Connection::new(1, 3),
			Connection::new(1, 4),
		];
		let result = sort_by_distance(&netlist, &gates);
		let actual = vec![
			Connection::new(1, 3),
			Connection::new(1, 4),
			Connection::new(1, 2),
		];
		assert_eq!(actual, result);
	}
	#[test]
	fn random_permutations_are_distinct() {
		let netlist = vec![
			Connection::new(1, 2),
			Connection::new(2, 3),
			Connection::new(3, 4),
			Connection::new(4, 5),
		];
		let mut rng = StdRng::seed_from_u64(11);
		let result = random_permutations(&netlist, 10, &mut rng);
		assert_eq!(10, result.len());
		let unique: HashSet<&Vec<Connection>> = result.iter().collect();
		assert_eq!(10, unique.len());
	}
	#[test]
	fn small_netlists_enumerate_every_permutation() {
		let netlist = vec![
			Connection::new(1, 2),
			Connection::new(2, 3),
			Connection::new(3, 4),
		];
		let mut rng = StdRng::seed_from_u64(11);
		let result = random_permutations(&netlist, 100, &mut rng);
		assert_eq!(6, result.len());
		let unique: HashSet<&Vec<Connection>> = result.iter().collect();
		assert_eq!(6, unique.len());
	}
	#[test]
	fn variations_preserve_the_sort_keys() {
		let gates = vec![
			Gate::new(1, 0, 0),
			Gate::new(2, 3, 0),
			Gate::new(3, 0, 3),
			Gate::new(4, 3, 3),
			Gate::new(5, 1, 1),
		];
		let netlist = vec![
			Connection::new(1, 2),
			Connection::new(3, 4),
			Connection::new(1, 5),
			Connection::new(2, 4),
		];
		let positions = gate_positions(&gates);
		let mut rng = StdRng::seed_from_u64(3);
		for variation in distance_variations(&netlist, &gates, 20, &mut rng) {
			// same multiset of pairs
			let mut sorted_variation = variation.clone();
			sorted_variation.sort();
			let mut sorted_input = netlist.clone();
			sorted_input.sort();
			assert_eq!(sorted_input, sorted_variation);
			// keys still ascend
			let keys: Vec<usize> = variation
				.iter()
				.map(|connection| distance_key(connection, &positions))
				.collect();
			assert!(keys.windows(2).all(|pair| pair[0] <= pair[1]));
		}
	}
	#[test]
	fn strategy_generates_requested_batch_sizes() {
		let gates = vec![Gate::new(1, 0, 0), Gate::new(2, 2, 2), Gate::new(3, 4, 0)];
		let netlist = vec![
			Connection::new(1, 2),
			Connection::new(2, 3),
			Connection::new(1, 3),
		];
		let mut rng = StdRng::seed_from_u64(5);
		let batch = OrderingStrategy::BusyGates { variations: 7 }.generate(&netlist, &gates, &mut rng);
		assert_eq!(7, batch.len());
		let single = OrderingStrategy::Distance { variations: 1 }.generate(&netlist, &gates, &mut rng);
		assert_eq!(1, single.len());
	}
}
