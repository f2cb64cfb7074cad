use crate::netlist::{CircuitGraph, LabelRule};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Layout of a circuit dataset on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    /// `<root>/*/*/*.v` netlists, each next to a `.json` file holding its reliability.
    Combcirc,
    /// `<root>/*.bench` ISCAS netlists with tabulated reliabilities.
    Iscas,
}

impl DatasetFormat {
    pub fn default_label_rule(&self) -> LabelRule {
        match self {
            DatasetFormat::Combcirc => LabelRule::TrailingDigits,
            DatasetFormat::Iscas => LabelRule::UnderscorePrefix,
        }
    }
}

impl std::fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetFormat::Combcirc => write!(f, "combcirc"),
            DatasetFormat::Iscas => write!(f, "iscas"),
        }
    }
}

/// A netlist found in the dataset, not parsed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitFile {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct CircuitRecord {
    pub name: String,
    pub path: PathBuf,
    pub reliability: f64,
    pub graph: CircuitGraph,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: String,
    pub num_graphs: usize,
    pub num_nodes: usize,
    pub num_edges: usize,
}
