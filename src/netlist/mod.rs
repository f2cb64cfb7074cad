//! Netlist parsing and graph construction.

pub mod bench_parser;
pub mod grapher;
pub mod labels;
pub mod verilog_parser;

pub use bench_parser::{parse_bench, parse_bench_file};
pub use grapher::{CircuitGraph, UNDRIVEN_NODE};
pub use labels::LabelRule;
pub use verilog_parser::{parse_verilog, parse_verilog_file, Driver, GateKind, Netlist, Wire};

use crate::utils::error::Result;
use std::path::Path;

/// Reads a `.bench` or Verilog file, chosen by extension, into a graph.
pub fn load_circuit_graph(path: &Path) -> Result<CircuitGraph> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("bench") => parse_bench_file(path),
        _ => {
            let netlist = parse_verilog_file(path)?;
            Ok(CircuitGraph::from_netlist(&netlist))
        }
    }
}
