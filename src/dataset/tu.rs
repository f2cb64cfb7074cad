//! TU graph dataset text format.
//!
//! All graphs share one block-diagonal adjacency matrix: the nodes of each
//! graph are numbered after the nodes of every graph before it. Every file
//! holds one value per line, and node and graph ids in the files are 1-based.
//!
//! | file                         | one line per | content                          |
//! |------------------------------|--------------|----------------------------------|
//! | `<p>_A.txt`                  | edge         | `row, col`                       |
//! | `<p>_graph_indicator.txt`    | node         | graph id                         |
//! | `<p>_graph_attributes.txt`   | graph        | reliability                      |
//! | `<p>_node_labels.txt`        | node         | node label id                    |
//! | `<p>_edge_labels.txt`        | edge         | edge label id                    |
//! | `<p>_node_labels_mapping.txt`| label        | id and label text                |
//! | `<p>_edge_labels_mapping.txt`| label        | id and label pair                |

use crate::domain::model::CircuitRecord;
use crate::netlist::LabelRule;
use crate::utils::error::{EtlError, Result};
use indexmap::IndexMap;
use std::fmt::Write;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TuDataset {
    /// Edges with 0-based global node ids.
    pub edges: Vec<(usize, usize)>,
    /// 0-based graph id of every node.
    pub graph_indicator: Vec<usize>,
    pub graph_attributes: Vec<f64>,
    pub graph_names: Vec<String>,
    pub node_labels: Vec<usize>,
    pub edge_labels: Vec<usize>,
    pub node_vocabulary: IndexMap<String, usize>,
    pub edge_vocabulary: IndexMap<(String, String), usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuFile {
    pub name: String,
    pub contents: String,
}

impl TuDataset {
    pub fn num_graphs(&self) -> usize {
        self.graph_attributes.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.graph_indicator.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn validate(&self) -> Result<()> {
        let num_nodes = self.num_nodes();

        check_len("node labels", self.node_labels.len(), num_nodes)?;
        check_len("edge labels", self.edge_labels.len(), self.num_edges())?;
        check_len("graph names", self.graph_names.len(), self.num_graphs())?;

        if let Some(&graph) = self.graph_indicator.iter().find(|&&g| g >= self.num_graphs()) {
            return Err(EtlError::ValidationError {
                message: format!("graph indicator refers to missing graph {}", graph + 1),
            });
        }

        for &(row, col) in &self.edges {
            if row >= num_nodes || col >= num_nodes {
                return Err(EtlError::ValidationError {
                    message: format!("edge ({}, {}) outside of {} nodes", row + 1, col + 1, num_nodes),
                });
            }
            if self.graph_indicator[row] != self.graph_indicator[col] {
                return Err(EtlError::ValidationError {
                    message: format!("edge ({}, {}) crosses graphs", row + 1, col + 1),
                });
            }
        }

        if self.node_labels.iter().any(|&id| id >= self.node_vocabulary.len()) {
            return Err(EtlError::ValidationError {
                message: "node label id outside of the vocabulary".to_string(),
            });
        }
        if self.edge_labels.iter().any(|&id| id >= self.edge_vocabulary.len()) {
            return Err(EtlError::ValidationError {
                message: "edge label id outside of the vocabulary".to_string(),
            });
        }

        Ok(())
    }

    pub fn render(&self, prefix: &str) -> Vec<TuFile> {
        let file = |suffix: &str, contents: String| TuFile {
            name: format!("{}_{}.txt", prefix, suffix),
            contents,
        };

        vec![
            file(
                "A",
                lines(self.edges.iter().map(|(row, col)| format!("{}, {}", row + 1, col + 1))),
            ),
            file(
                "graph_indicator",
                lines(self.graph_indicator.iter().map(|graph| graph + 1)),
            ),
            file(
                "graph_attributes",
                lines(self.graph_attributes.iter().map(|&value| python_float(value))),
            ),
            file("node_labels", lines(&self.node_labels)),
            file("edge_labels", lines(&self.edge_labels)),
            file(
                "node_labels_mapping",
                mapping(
                    "Node labels:",
                    self.node_vocabulary
                        .iter()
                        .map(|(label, id)| (*id, label.clone())),
                ),
            ),
            file(
                "edge_labels_mapping",
                mapping(
                    "Edge labels:",
                    self.edge_vocabulary.iter().map(|((source, target), id)| {
                        (*id, format!("({}, {})", python_repr(source), python_repr(target)))
                    }),
                ),
            ),
        ]
    }
}

fn check_len(what: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(EtlError::ValidationError {
            message: format!("{} {} entries, expected {}", actual, what, expected),
        });
    }
    Ok(())
}

fn lines<I>(values: I) -> String
where
    I: IntoIterator,
    I::Item: std::fmt::Display,
{
    let mut out = String::new();
    for value in values {
        // writing into a String cannot fail
        let _ = writeln!(out, "{}", value);
    }
    out
}

fn mapping(title: &str, entries: impl Iterator<Item = (usize, String)>) -> String {
    let mut out = format!("{}\n\n", title);
    for (id, label) in entries {
        let _ = writeln!(out, " {}  \"{}\"", id, label);
    }
    out
}

/// Float text as Python's `str(float)` prints it: `0.5`, `1.0`, `0.7419`,
/// and exponent notation below `1e-4` or from `1e16` on (`5e-05`, `1e+16`).
pub fn python_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        return text.to_string();
    }

    let magnitude = value.abs();
    if value != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return python_exponent(value);
    }
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Rust writes `5e-5`, Python wants a signed exponent of at least two digits.
fn python_exponent(value: f64) -> String {
    let text = format!("{:e}", value);
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    match exponent.parse::<i32>() {
        Ok(exponent) => {
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
        }
        Err(_) => text,
    }
}

/// String literal as Python's `repr` writes it.
fn python_repr(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Accumulates graphs into a [`TuDataset`], interning labels in first-seen order.
pub struct TuDatasetBuilder {
    rule: LabelRule,
    dataset: TuDataset,
}

impl TuDatasetBuilder {
    pub fn new(rule: LabelRule) -> Self {
        Self {
            rule,
            dataset: TuDataset::default(),
        }
    }

    pub fn add_graph(&mut self, record: &CircuitRecord) {
        let graph = &record.graph;
        let dataset = &mut self.dataset;
        let graph_id = dataset.num_graphs();
        let offset = dataset.num_nodes();

        let edges = graph.ordered_edges();
        dataset
            .edges
            .extend(edges.iter().map(|&(row, col)| (row + offset, col + offset)));
        dataset
            .graph_indicator
            .extend(std::iter::repeat(graph_id).take(graph.node_count()));
        dataset.graph_attributes.push(record.reliability);
        dataset.graph_names.push(record.name.clone());

        let labels: Vec<&str> = graph
            .node_names()
            .map(|name| self.rule.node_label(name))
            .collect();
        for label in &labels {
            let id = intern(&mut dataset.node_vocabulary, label.to_string());
            dataset.node_labels.push(id);
        }
        for &(row, col) in &edges {
            let (source, target) = self
                .rule
                .edge_label(graph.node_name(row), graph.node_name(col));
            let key = (source.to_string(), target.to_string());
            let id = intern(&mut dataset.edge_vocabulary, key);
            dataset.edge_labels.push(id);
        }
    }

    pub fn finish(self) -> Result<TuDataset> {
        self.dataset.validate()?;
        Ok(self.dataset)
    }
}

fn intern<K: std::hash::Hash + Eq>(vocabulary: &mut IndexMap<K, usize>, key: K) -> usize {
    let next = vocabulary.len();
    *vocabulary.entry(key).or_insert(next)
}
