//! Parser for the ISCAS `.bench` netlist format:
//!
//! ```text
//! # c17
//! INPUT(G1)
//! OUTPUT(G22)
//! G10 = NAND(G1, G3)
//! ```
//!
//! Nodes are named `<kind>_<signal>` (`input_G1`, `nand_G10`, `output_G22`)
//! so that [`LabelRule::UnderscorePrefix`](crate::netlist::LabelRule) yields the
//! cell kind.

use crate::netlist::grapher::{CircuitGraph, UNDRIVEN_NODE};
use crate::utils::error::{EtlError, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Declared {
    signal: String,
    line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BenchGate {
    output: Declared,
    kind: String,
    fanin: Vec<String>,
}

#[derive(Debug, Default)]
struct BenchNetlist {
    inputs: Vec<Declared>,
    outputs: Vec<Declared>,
    gates: Vec<BenchGate>,
}

pub fn parse_bench(text: &str) -> Result<CircuitGraph> {
    parse_with_origin(text, Path::new("<string>"))
}

pub fn parse_bench_file(path: &Path) -> Result<CircuitGraph> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        EtlError::IoError(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    parse_with_origin(&text, path)
}

fn parse_with_origin(text: &str, origin: &Path) -> Result<CircuitGraph> {
    let netlist = read_netlist(text, origin)?;
    build_graph(&netlist, origin)
}

fn read_netlist(text: &str, origin: &Path) -> Result<BenchNetlist> {
    let mut netlist = BenchNetlist::default();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        if let Some((output, call)) = content.split_once('=') {
            let output = output.trim();
            if output.is_empty() {
                return Err(EtlError::parse(origin, line, "gate without output signal"));
            }
            let (kind, fanin) = parse_call(call, origin, line)?;
            netlist.gates.push(BenchGate {
                output: Declared {
                    signal: output.to_string(),
                    line,
                },
                kind: kind.to_ascii_lowercase(),
                fanin,
            });
            continue;
        }

        let (keyword, args) = parse_call(content, origin, line)?;
        let [signal] = args.as_slice() else {
            return Err(EtlError::parse(
                origin,
                line,
                format!("{} takes exactly one signal", keyword),
            ));
        };
        let declared = Declared {
            signal: signal.clone(),
            line,
        };
        match keyword.to_ascii_uppercase().as_str() {
            "INPUT" => netlist.inputs.push(declared),
            "OUTPUT" => netlist.outputs.push(declared),
            _ => {
                return Err(EtlError::parse(
                    origin,
                    line,
                    format!("unknown declaration '{}'", keyword),
                ))
            }
        }
    }

    Ok(netlist)
}

/// Splits `NAME(a, b, c)` into the name and its arguments.
fn parse_call(text: &str, origin: &Path, line: usize) -> Result<(String, Vec<String>)> {
    let text = text.trim();
    let (name, rest) = text
        .split_once('(')
        .ok_or_else(|| EtlError::parse(origin, line, format!("expected '(' in '{}'", text)))?;
    let args = rest
        .strip_suffix(')')
        .ok_or_else(|| EtlError::parse(origin, line, format!("expected ')' in '{}'", text)))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(EtlError::parse(origin, line, "missing gate type"));
    }

    let args = args
        .split(',')
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
        .collect();
    Ok((name.to_string(), args))
}

fn build_graph(netlist: &BenchNetlist, origin: &Path) -> Result<CircuitGraph> {
    let mut drivers: HashMap<&str, String> = HashMap::new();

    let gate_nodes: Vec<String> = netlist
        .gates
        .iter()
        .map(|gate| format!("{}_{}", gate.kind, gate.output.signal))
        .collect();
    for input in &netlist.inputs {
        claim(&mut drivers, input, format!("input_{}", input.signal), origin)?;
    }
    for (gate, node) in netlist.gates.iter().zip(&gate_nodes) {
        claim(&mut drivers, &gate.output, node.clone(), origin)?;
    }

    let mut graph = CircuitGraph::new();
    for input in &netlist.inputs {
        graph.add_node(&format!("input_{}", input.signal));
    }
    for node in &gate_nodes {
        graph.add_node(node);
    }
    let output_nodes: Vec<String> = netlist
        .outputs
        .iter()
        .map(|output| format!("output_{}", output.signal))
        .collect();
    for node in &output_nodes {
        graph.add_node(node);
    }

    for (gate, node) in netlist.gates.iter().zip(&gate_nodes) {
        for signal in &gate.fanin {
            graph.add_edge(driver_of(&drivers, signal, origin), node);
        }
    }
    for (output, node) in netlist.outputs.iter().zip(&output_nodes) {
        graph.add_edge(driver_of(&drivers, &output.signal, origin), node);
    }

    Ok(graph)
}

fn claim<'a>(
    drivers: &mut HashMap<&'a str, String>,
    declared: &'a Declared,
    node: String,
    origin: &Path,
) -> Result<()> {
    match drivers.entry(declared.signal.as_str()) {
        Entry::Vacant(slot) => {
            slot.insert(node);
            Ok(())
        }
        Entry::Occupied(_) => Err(EtlError::parse(
            origin,
            declared.line,
            format!("signal '{}' is driven more than once", declared.signal),
        )),
    }
}

fn driver_of<'a>(drivers: &'a HashMap<&str, String>, signal: &str, origin: &Path) -> &'a str {
    match drivers.get(signal) {
        Some(node) => node.as_str(),
        None => {
            tracing::warn!("{}: signal '{}' has no driver", origin.display(), signal);
            UNDRIVEN_NODE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C17: &str = "
# c17
# 5 inputs
# 2 outputs

INPUT(G1)
INPUT(G2)
INPUT(G3)
INPUT(G6)
INPUT(G7)

OUTPUT(G22)
OUTPUT(G23)

G10 = NAND(G1, G3)
G11 = NAND(G3, G6)
G16 = NAND(G2, G11)
G19 = NAND(G11, G7)
G22 = NAND(G10, G16)
G23 = NAND(G16, G19)
";

    #[test]
    fn test_parse_c17() {
        let graph = parse_bench(C17).unwrap();

        assert_eq!(graph.node_count(), 5 + 6 + 2);
        assert_eq!(graph.edge_count(), 12 + 2);

        let nodes: Vec<&str> = graph.node_names().collect();
        assert_eq!(&nodes[..2], &["input_G1", "input_G2"]);
        assert_eq!(nodes[5], "nand_G10");
        assert_eq!(&nodes[11..], &["output_G22", "output_G23"]);
    }

    #[test]
    fn test_edges_follow_signal_flow() {
        let graph = parse_bench(C17).unwrap();
        let edges = graph.edge_names();

        assert!(edges.contains(&("input_G1", "nand_G10")));
        assert!(edges.contains(&("nand_G11", "nand_G16")));
        assert!(edges.contains(&("nand_G22", "output_G22")));
        assert_eq!(edges[0], ("input_G1", "nand_G10"));
    }

    #[test]
    fn test_gates_may_reference_later_signals() {
        let graph = parse_bench("INPUT(a)\nOUTPUT(y)\ny = NOT(n)\nn = BUFF(a)\n").unwrap();
        assert!(graph.edge_names().contains(&("buff_n", "not_y")));
        assert!(!graph.contains_node(UNDRIVEN_NODE));
    }

    #[test]
    fn test_undriven_signal() {
        let graph = parse_bench("INPUT(a)\nOUTPUT(y)\ny = AND(a, ghost)\n").unwrap();
        assert!(graph.edge_names().contains(&(UNDRIVEN_NODE, "and_y")));
    }

    #[test]
    fn test_double_driver_is_an_error() {
        let err = parse_bench("INPUT(a)\nOUTPUT(y)\ny = NOT(a)\ny = BUFF(a)\n").unwrap_err();
        assert!(matches!(err, EtlError::ParseError { line: 4, .. }));
    }

    #[test]
    fn test_malformed_lines() {
        assert!(matches!(
            parse_bench("INPUT(a\n"),
            Err(EtlError::ParseError { line: 1, .. })
        ));
        assert!(matches!(
            parse_bench("INPUT(a)\nWIRE(b)\n"),
            Err(EtlError::ParseError { line: 2, .. })
        ));
        assert!(parse_bench("y = (a)\n").is_err());
    }
}
