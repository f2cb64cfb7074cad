use crate::netlist::verilog_parser::{Driver, Netlist};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Name of the node standing in for the driver of nets nobody drives.
pub const UNDRIVEN_NODE: &str = " ";

/// Directed circuit graph with nodes named after ports and gates.
///
/// Nodes keep their insertion order and there is at most one edge per
/// ordered pair of nodes; adding it again is a no-op.
#[derive(Debug, Clone, Default)]
pub struct CircuitGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl CircuitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes are added as inputs, outputs, gates; then each wire links its
    /// driver to every sink.
    pub fn from_netlist(netlist: &Netlist) -> Self {
        let mut graph = Self::new();

        for name in netlist
            .inputs
            .iter()
            .chain(&netlist.outputs)
            .chain(&netlist.gates)
        {
            graph.add_node(name);
        }

        for wire in netlist.wires.values() {
            if wire.sinks.is_empty() {
                continue;
            }
            let driver = match &wire.driver {
                Driver::Port(port) => port.as_str(),
                Driver::Gate(node) => node.as_str(),
                Driver::Undriven => UNDRIVEN_NODE,
            };
            for sink in &wire.sinks {
                graph.add_edge(driver, sink);
            }
        }

        graph
    }

    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from = self.add_node(from);
        let to = self.add_node(to);
        self.graph.update_edge(from, to, ());
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    pub fn node_name(&self, idx: usize) -> &str {
        &self.graph[NodeIndex::new(idx)]
    }

    /// Edges as `(source, target)` node positions, grouped by source in node
    /// order and by insertion order within a source. This is the row order of
    /// the adjacency matrix.
    pub fn ordered_edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .graph
            .raw_edges()
            .iter()
            .map(|edge| (edge.source().index(), edge.target().index()))
            .collect();
        edges.sort_by_key(|&(source, _)| source);
        edges
    }

    pub fn edge_names(&self) -> Vec<(&str, &str)> {
        self.ordered_edges()
            .into_iter()
            .map(|(source, target)| (self.node_name(source), self.node_name(target)))
            .collect()
    }

    /// Every node with its successors.
    pub fn adjacency(&self) -> Vec<(&str, Vec<&str>)> {
        let mut successors: Vec<Vec<&str>> = vec![Vec::new(); self.node_count()];
        for (source, target) in self.ordered_edges() {
            successors[source].push(self.node_name(target));
        }
        self.node_names().zip(successors).collect()
    }

    /// Adjacency as text, one `node: succ1 succ2 ` line per node.
    pub fn adjacency_lines(&self) -> Vec<String> {
        self.adjacency()
            .into_iter()
            .map(|(node, successors)| {
                let mut line = format!("{}: ", node);
                for successor in successors {
                    line.push_str(successor);
                    line.push(' ');
                }
                line
            })
            .collect()
    }
}
