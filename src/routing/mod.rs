//! Routing lays wires between pairs of gates sitting on the base layer of a 3D grid.
//!
//! A chip is described by a set of `Gates` (fixed terminals at `(x, y, 0)`) and a `Netlist`
//! (an ordered list of gate pairs that must be electrically connected). The engine realises each
//! pair as a `Wire`: a polyline of unit, axis-aligned steps through the grid volume. Wires are laid
//! one at a time onto a shared mutable `Grid` and the quality of a fully routed grid is scored as
//! `300 * crossings + total wire segments`.
//!
//! ## Useful definitions
//!
//! * Gate - a fixed terminal on the base layer, identified by a 1-based id; always the endpoint of a wire, never an interior point
//! * Net / pair - a single required connection between two gates
//! * Netlist - the ordered list of pairs to route
//! * Wire - the realised polyline connecting one pair, owned by the grid once placed
//! * Segment - a unit edge between two adjacent grid cells; no segment may belong to more than one wire
//! * Occupancy - the number of placed wires whose interior passes through a cell
//! * Intersection - an extra pass over a shared cell (`occupancy - 1`); wires may cross through the same cell in perpendicular directions but each crossing costs 300
//! * Cost field - precomputed per-cell weights consumed by the cost-aware pathfinders
//! * Ordering strategy - a rule that generates one or more permutations of the netlist for the controller to try
//!
//! ## Grid
//!
//! The grid volume is `length x depth x 8` where the footprint is derived from the gate
//! coordinates (one more than the largest coordinate in the layout) and the number of layers is
//! fixed at [primitives::GRID_LAYERS]. The [grid::Grid] owns the authoritative routing state: the
//! gate registry, an occupancy counter per cell, the set of segments claimed by placed wires, the
//! wires themselves in placement order and the cost field. Wires are committed atomically with
//! [grid::Grid::try_add_wire] and reversed exactly with [grid::Grid::remove_wire].
//!
//! ## CostField
//!
//! A [fields::cost_field::CostField] assigns every cell a positive weight. Construction paints
//! tiered stencils around gates that appear frequently in the netlist (the busier and more boxed-in
//! a gate, the larger and more expensive the painted neighbourhood) and then adds a bias of twice
//! the distance to the nearest face of the volume, making the interior pricier than the periphery.
//! The cost-aware pathfinders read these weights so that wires detour around congested gates and
//! drift towards the border and the unused upper layers.
//!
//! ## Pathfinders
//!
//! Four interchangeable per-pair routers live behind [pathfinders::Pathfinder]: a Manhattan
//! baseline that walks the x-stretch then the y-stretch on the base layer, a depth-first search
//! biased towards the target, a Lee wavefront (breadth-first, shortest in steps) and an A\* that
//! minimises the cost field plus a dynamic crossing penalty. Each either produces a wire or
//! reports a routing failure.
//!
//! ## Ordering and control
//!
//! Feasibility and cost both depend heavily on the order in which pairs are routed. The
//! [ordering] module generates candidate orderings (random samples, busy-gate sort, distance sort
//! and their shuffled variations, plus a tabular Q-learning scheduler that learns swaps), and the
//! [controller::RoutingController] drives one ordering at a time: route each pair, on failure pop
//! the most recently committed wire and retry, and abandon the ordering once a pair exhausts its
//! retry budget. Across orderings the controller records the best total cost and the winning set
//! of wires in a [controller::RunReport].
//!

pub mod controller;
pub mod fields;
pub mod grid;
#[cfg(any(feature = "csv", feature = "ron"))]
pub mod io;
pub mod ordering;
pub mod pathfinders;
pub mod primitives;
pub mod wire;
