use crate::domain::model::{CircuitFile, CircuitRecord, DatasetFormat};
use crate::domain::ports::{CircuitSource, ConfigProvider};
use crate::netlist::{parse_bench_file, parse_verilog_file, CircuitGraph};
use crate::utils::error::{EtlError, Result};
use crate::utils::json_fix::fix_trailing_commas;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reliability of the ISCAS-85 benchmarks. Circuits without a published
/// figure are set to 0.5.
pub const ISCAS85_RELIABILITY: [(&str, f64); 11] = [
    ("c17", 0.7419),
    ("c432", 0.3128),
    ("c499", 0.5333),
    ("c880", 0.5),
    ("c1355", 0.5345),
    ("c1908", 0.617),
    ("c2670", 0.5),
    ("c3540", 0.3442),
    ("c5315", 0.5),
    ("c6288", 0.5),
    ("c7552", 0.5),
];

pub fn source_for<C: ConfigProvider>(config: &C) -> Arc<dyn CircuitSource> {
    let root = PathBuf::from(config.dataset_path());
    match config.format() {
        DatasetFormat::Combcirc => Arc::new(CombcircSource::new(root, config.reliability_field())),
        DatasetFormat::Iscas => {
            let mut source = IscasSource::new(root);
            for (circuit, value) in config.reliability_overrides() {
                source.set_reliability(&circuit, value);
            }
            Arc::new(source)
        }
    }
}

/// Files under `root` matching `pattern`, in sorted order.
fn glob_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = format!(
        "{}/{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        pattern
    );
    let mut files = Vec::new();
    for entry in glob::glob(&full)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Combinational circuit dataset: `<root>/<group>/<circuit>/<name>.v`, each
/// netlist next to a `<name>.json` carrying its reliability.
#[derive(Debug, Clone)]
pub struct CombcircSource {
    root: PathBuf,
    reliability_field: String,
}

impl CombcircSource {
    pub fn new(root: impl Into<PathBuf>, reliability_field: &str) -> Self {
        Self {
            root: root.into(),
            reliability_field: reliability_field.to_string(),
        }
    }

    /// The sidecar JSON is repaired in memory first, some of them end objects
    /// with a trailing comma.
    pub fn read_reliability(&self, json_path: &Path) -> Result<f64> {
        let text = std::fs::read_to_string(json_path).map_err(|e| {
            EtlError::IoError(std::io::Error::new(
                e.kind(),
                format!("{}: {}", json_path.display(), e),
            ))
        })?;
        let info: serde_json::Value = serde_json::from_str(&fix_trailing_commas(&text))?;

        info.get(&self.reliability_field)
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| EtlError::MissingReliabilityError {
                circuit: json_path.display().to_string(),
            })
    }
}

impl CircuitSource for CombcircSource {
    fn discover(&self) -> Result<Vec<CircuitFile>> {
        Ok(glob_files(&self.root, "*/*/*.v")?
            .into_iter()
            .map(|path| CircuitFile {
                name: file_stem(&path),
                path,
            })
            .collect())
    }

    fn load(&self, file: &CircuitFile) -> Result<CircuitRecord> {
        let reliability = self.read_reliability(&file.path.with_extension("json"))?;
        let netlist = parse_verilog_file(&file.path)?;
        for net in netlist.undriven_nets() {
            tracing::warn!("{}: net '{}' has no driver", file.path.display(), net);
        }
        Ok(CircuitRecord {
            name: file.name.clone(),
            path: file.path.clone(),
            reliability,
            graph: CircuitGraph::from_netlist(&netlist),
        })
    }
}

/// ISCAS benchmark dataset: `<root>/<circuit>.bench`.
#[derive(Debug, Clone)]
pub struct IscasSource {
    root: PathBuf,
    reliability: HashMap<String, f64>,
}

impl IscasSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            reliability: ISCAS85_RELIABILITY
                .iter()
                .map(|&(circuit, value)| (circuit.to_string(), value))
                .collect(),
        }
    }

    pub fn set_reliability(&mut self, circuit: &str, value: f64) {
        self.reliability.insert(circuit.to_string(), value);
    }

    pub fn reliability(&self, circuit: &str) -> Result<f64> {
        self.reliability
            .get(circuit)
            .copied()
            .ok_or_else(|| EtlError::MissingReliabilityError {
                circuit: circuit.to_string(),
            })
    }
}

impl CircuitSource for IscasSource {
    fn discover(&self) -> Result<Vec<CircuitFile>> {
        Ok(glob_files(&self.root, "*.bench")?
            .into_iter()
            .map(|path| CircuitFile {
                name: file_stem(&path),
                path,
            })
            .collect())
    }

    fn load(&self, file: &CircuitFile) -> Result<CircuitRecord> {
        let reliability = self.reliability(&file.name)?;
        let graph = parse_bench_file(&file.path)?;
        Ok(CircuitRecord {
            name: file.name.clone(),
            path: file.path.clone(),
            reliability,
            graph,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_combcirc_discovery_is_sorted_and_three_levels_deep() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(&root.join("n2/b/circ_b.v"), "");
        write(&root.join("n1/a/circ_a.v"), "");
        write(&root.join("n1/a/circ_a.json"), "{}");
        write(&root.join("top_level.v"), "");

        let files = CombcircSource::new(root, "reliability").discover().unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["circ_a", "circ_b"]);
    }

    #[test]
    fn test_combcirc_load_reads_sidecar_reliability() {
        let dir = TempDir::new().unwrap();
        let netlist = dir.path().join("n1/a/inv.v");
        write(
            &netlist,
            "module inv(x1, f1);\n  input x1;\n  output f1;\n  not (f1, x1);\nendmodule\n",
        );
        write(&netlist.with_extension("json"), "{\n  \"reliability\": 0.93,\n}\n");

        let source = CombcircSource::new(dir.path(), "reliability");
        let file = source.discover().unwrap().remove(0);
        let record = source.load(&file).unwrap();

        assert_eq!(record.name, "inv");
        assert_eq!(record.reliability, 0.93);
        assert_eq!(record.graph.node_count(), 3);
    }

    #[test]
    fn test_combcirc_load_links_undriven_nets_to_placeholder() {
        let dir = TempDir::new().unwrap();
        let netlist = dir.path().join("n1/a/floating.v");
        write(
            &netlist,
            "module floating(x1, f1);\n  input x1;\n  output f1;\n  wire w;\n  and (f1, x1, w);\nendmodule\n",
        );
        write(&netlist.with_extension("json"), "{\"reliability\": 0.5}");

        let source = CombcircSource::new(dir.path(), "reliability");
        let file = source.discover().unwrap().remove(0);
        let record = source.load(&file).unwrap();

        assert!(record.graph.contains_node(crate::netlist::UNDRIVEN_NODE));
        assert!(record
            .graph
            .edge_names()
            .contains(&(crate::netlist::UNDRIVEN_NODE, "and0")));
    }

    #[test]
    fn test_combcirc_missing_reliability_field() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("c.json");
        write(&json, "{\"area\": 4}");

        let source = CombcircSource::new(dir.path(), "reliability");
        assert!(matches!(
            source.read_reliability(&json),
            Err(EtlError::MissingReliabilityError { .. })
        ));
    }

    #[test]
    fn test_iscas_reliability_table_and_overrides() {
        let mut source = IscasSource::new("unused");
        assert_eq!(source.reliability("c17").unwrap(), 0.7419);
        assert!(source.reliability("s27").is_err());

        source.set_reliability("s27", 0.8);
        source.set_reliability("c880", 0.61);
        assert_eq!(source.reliability("s27").unwrap(), 0.8);
        assert_eq!(source.reliability("c880").unwrap(), 0.61);
    }

    #[test]
    fn test_iscas_load() {
        let dir = TempDir::new().unwrap();
        write(
            &dir.path().join("c17.bench"),
            "INPUT(G1)\nINPUT(G2)\nOUTPUT(G3)\nG3 = NAND(G1, G2)\n",
        );

        let source = IscasSource::new(dir.path());
        let files = source.discover().unwrap();
        assert_eq!(files.len(), 1);

        let record = source.load(&files[0]).unwrap();
        assert_eq!(record.name, "c17");
        assert_eq!(record.reliability, 0.7419);
        assert_eq!(record.graph.edge_count(), 3);
    }
}
