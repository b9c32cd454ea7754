//! Command line front-end for routing a chip: pick a gate file, a netlist file, an algorithm and
//! an ordering strategy, then print the best routing found
//!

use clap::{Parser, ValueEnum};
use gridwire::prelude::*;
use tracing_subscriber::EnvFilter;

/// Route a netlist across a chip described by gate and netlist CSV files
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
	/// Path to the gate CSV file (header `chip,x,y`, row order assigns ids)
	#[arg(long)]
	gates: String,
	/// Path to the netlist CSV file (header `chip_a,chip_b`)
	#[arg(long)]
	netlist: String,
	/// Routing algorithm laying each wire
	#[arg(long, value_enum, default_value_t = Algorithm::AStar)]
	algorithm: Algorithm,
	/// Strategy generating the netlist orderings to try
	#[arg(long, value_enum, default_value_t = Strategy::Random)]
	ordering: Strategy,
	/// Number of orderings to try (or Q-learning episodes)
	#[arg(long, default_value_t = 100)]
	iterations: usize,
	/// Seed for every stochastic component, making runs reproducible
	#[arg(long, default_value_t = 0)]
	seed: u64,
}

/// Command line names for the pathfinders
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
	/// Obstacle-blind L-shaped baseline
	Manhattan,
	/// Depth-first search biased towards the target
	Dfs,
	/// Breadth-first wavefront, shortest in steps
	Lee,
	/// Cost-aware search over the cost field
	AStar,
}

impl Algorithm {
	/// The engine pathfinder this argument selects
	fn pathfinder(&self) -> Pathfinder {
		match self {
			Algorithm::Manhattan => Pathfinder::Manhattan,
			Algorithm::Dfs => Pathfinder::DepthFirst,
			Algorithm::Lee => Pathfinder::Lee,
			Algorithm::AStar => Pathfinder::AStar,
		}
	}
}

/// Command line names for the ordering strategies
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
	/// Distinct random permutations
	Random,
	/// Busiest gates first, shuffling equal-frequency runs
	Busy,
	/// Shortest pairs first, shuffling equal-distance runs
	Distance,
	/// Tabular Q-learning over ordering swaps
	QLearning,
}

impl Strategy {
	/// The engine ordering strategy this argument selects
	fn ordering(&self, iterations: usize) -> OrderingStrategy {
		match self {
			Strategy::Random => OrderingStrategy::Random {
				samples: iterations,
			},
			Strategy::Busy => OrderingStrategy::BusyGates {
				variations: iterations,
			},
			Strategy::Distance => OrderingStrategy::Distance {
				variations: iterations,
			},
			Strategy::QLearning => OrderingStrategy::QLearning {
				episodes: iterations,
			},
		}
	}
}

/// Load the chip, route it and print the outcome
fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();
	let cli = Cli::parse();
	let gates = load_gates(&cli.gates)?;
	let netlist = load_netlist(&cli.netlist, gates.len())?;
	let mut grid = Grid::from_layout(gates, &netlist)?;
	let mut controller = RoutingController::new(cli.algorithm.pathfinder(), cli.seed);
	let report = controller.route_with_strategy(
		&mut grid,
		&netlist,
		cli.ordering.ordering(cli.iterations),
	);

	println!(
		"routed {}/{} orderings ({:.1}% success)",
		report.get_successful(),
		report.get_attempted(),
		report.success_rate() * 100.0
	);
	match report.get_best_cost() {
		Some(cost) => {
			println!(
				"best routing: cost {} ({} segments, {} intersections)",
				cost,
				report.get_best_segments(),
				report.get_best_intersections()
			);
			for (index, wire) in report.get_best_wires().iter().enumerate() {
				let polyline: Vec<(usize, usize, usize)> = wire
					.get_points()
					.iter()
					.map(|point| point.get_coords())
					.collect();
				println!("wire {}: {:?}", index + 1, polyline);
			}
		}
		None => println!("no ordering routed every pair"),
	}
	Ok(())
}
