//! Thin adapters between input files and the routing engine. Gate and netlist files follow the
//! classic chip description format: a `chip,x,y` CSV where the 1-based row index is the gate id,
//! and a `chip_a,chip_b` CSV listing the required connections. Layouts can also be stored whole
//! as RON. Every loader validates before anything is routed: malformed rows, duplicate gate
//! coordinates and out-of-range ids are fatal input errors.
//!

use crate::prelude::*;

/// Failures raised while reading gate, netlist or layout files
#[derive(Debug, thiserror::Error)]
pub enum InputError {
	/// The file could not be opened or read
	#[error("failed reading {path}: {source}")]
	Io {
		/// Path of the offending file
		path: String,
		/// The underlying IO failure
		#[source]
		source: std::io::Error,
	},
	/// A CSV record could not be parsed
	#[cfg(feature = "csv")]
	#[error("failed parsing {path}: {source}")]
	Csv {
		/// Path of the offending file
		path: String,
		/// The underlying CSV failure
		#[source]
		source: csv::Error,
	},
	/// A layout RON document could not be parsed
	#[cfg(feature = "ron")]
	#[error("failed parsing layout {path}: {source}")]
	Ron {
		/// Path of the offending file
		path: String,
		/// The underlying RON failure
		#[source]
		source: ron::error::SpannedError,
	},
	/// Two gate rows declared the same coordinates
	#[error("gate {id} duplicates the coordinates ({x}, {y}) of gate {earlier}")]
	DuplicateGate {
		/// 1-based row id of the duplicate
		id: usize,
		/// 1-based row id of the earlier gate on the cell
		earlier: usize,
		/// Shared `x` coordinate
		x: usize,
		/// Shared `y` coordinate
		y: usize,
	},
	/// A netlist row referenced a gate id outside the gate file
	#[error("netlist row {row} references gate {id} outside 1..={gate_count}")]
	GateIdOutOfRange {
		/// 1-based netlist row
		row: usize,
		/// The offending gate id
		id: usize,
		/// Number of gates declared by the gate file
		gate_count: usize,
	},
	/// A netlist row connected a gate to itself
	#[error("netlist row {row} connects gate {id} to itself")]
	SelfConnection {
		/// 1-based netlist row
		row: usize,
		/// The self-connected gate id
		id: usize,
	},
}

/// One row of a gate CSV file
#[cfg(feature = "csv")]
#[derive(Debug, serde::Deserialize)]
struct GateRecord {
	/// Chip label shared by every row; required by the format but irrelevant to routing
	#[allow(dead_code)]
	chip: String,
	/// Gate `x` coordinate
	x: usize,
	/// Gate `y` coordinate
	y: usize,
}

/// One row of a netlist CSV file
#[cfg(feature = "csv")]
#[derive(Debug, serde::Deserialize)]
struct ConnectionRecord {
	/// Id of the first gate of the pair
	chip_a: usize,
	/// Id of the second gate of the pair
	chip_b: usize,
}

/// Load gates from a `chip,x,y` CSV file. Each row becomes a gate whose 1-based id is its row
/// index; duplicate coordinates are rejected
#[cfg(feature = "csv")]
pub fn load_gates(path: &str) -> Result<Vec<Gate>, InputError> {
	use std::collections::HashMap;
	let file = std::fs::File::open(path).map_err(|source| InputError::Io {
		path: path.to_string(),
		source,
	})?;
	let mut reader = csv::Reader::from_reader(file);
	let mut gates = Vec::new();
	let mut seen: HashMap<(usize, usize), usize> = HashMap::new();
	for (row, record) in reader.deserialize::<GateRecord>().enumerate() {
		let record = record.map_err(|source| InputError::Csv {
			path: path.to_string(),
			source,
		})?;
		let id = row + 1;
		if let Some(&earlier) = seen.get(&(record.x, record.y)) {
			return Err(InputError::DuplicateGate {
				id,
				earlier,
				x: record.x,
				y: record.y,
			});
		}
		seen.insert((record.x, record.y), id);
		gates.push(Gate::new(id, record.x, record.y));
	}
	tracing::info!("loaded {} gates from {}", gates.len(), path);
	Ok(gates)
}

/// Load a netlist from a `chip_a,chip_b` CSV file, preserving row order. Ids must reference the
/// `gate_count` gates of the accompanying gate file and no pair may connect a gate to itself
#[cfg(feature = "csv")]
pub fn load_netlist(path: &str, gate_count: usize) -> Result<Vec<Connection>, InputError> {
	let file = std::fs::File::open(path).map_err(|source| InputError::Io {
		path: path.to_string(),
		source,
	})?;
	let mut reader = csv::Reader::from_reader(file);
	let mut netlist = Vec::new();
	for (index, record) in reader.deserialize::<ConnectionRecord>().enumerate() {
		let record = record.map_err(|source| InputError::Csv {
			path: path.to_string(),
			source,
		})?;
		let row = index + 1;
		for id in [record.chip_a, record.chip_b] {
			if id == 0 || id > gate_count {
				return Err(InputError::GateIdOutOfRange {
					row,
					id,
					gate_count,
				});
			}
		}
		if record.chip_a == record.chip_b {
			return Err(InputError::SelfConnection {
				row,
				id: record.chip_a,
			});
		}
		netlist.push(Connection::new(record.chip_a, record.chip_b));
	}
	tracing::info!("loaded {} connections from {}", netlist.len(), path);
	Ok(netlist)
}

/// A complete routing problem: the gates of a chip and the netlist to realise on it
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Layout {
	/// The gates of the chip in id order
	gates: Vec<Gate>,
	/// The connections to route in input order
	netlist: Vec<Connection>,
}

impl Layout {
	/// Create a new instance of [Layout]
	pub fn new(gates: Vec<Gate>, netlist: Vec<Connection>) -> Self {
		Layout { gates, netlist }
	}
	/// Get the gates in id order
	pub fn get_gates(&self) -> &[Gate] {
		&self.gates
	}
	/// Get the netlist in input order
	pub fn get_netlist(&self) -> &[Connection] {
		&self.netlist
	}
	/// From a `ron` file generate the [Layout]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str) -> Result<Self, InputError> {
		let file = std::fs::File::open(path).map_err(|source| InputError::Io {
			path: path.to_string(),
			source,
		})?;
		ron::de::from_reader(file).map_err(|source| InputError::Ron {
			path: path.to_string(),
			source,
		})
	}
}
