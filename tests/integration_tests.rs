use std::path::Path;
use tempfile::TempDir;
use verilog_to_txt::{DatasetPipeline, EtlEngine, EtlError, LocalStorage, TomlConfig};

const INVERTER: &str = "\
// single inverter
module inv(x1, f1);
  input x1;
  output f1;
  not (f1, x1);
endmodule
";

const AND2: &str = "\
module and2(x1, x2, f1);
  input x1, x2;
  output f1;
  and (f1, x1, x2);
endmodule
";

const C17: &str = "\
# c17
# 5 inputs
# 2 outputs
# 6 NAND gates

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

fn write(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

fn config(dataset: &Path, output: &Path, format: &str, prefix: &str, extra: &str) -> TomlConfig {
    let toml = format!(
        r#"
[dataset]
path = "{}"
format = "{}"

[output]
directory = "{}"
prefix = "{}"
{}
"#,
        dataset.to_str().unwrap().replace('\\', "/"),
        format,
        output.to_str().unwrap().replace('\\', "/"),
        prefix,
        extra
    );
    TomlConfig::from_toml_str(&toml).unwrap()
}

async fn convert(config: TomlConfig) -> verilog_to_txt::Result<verilog_to_txt::core::RunSummary> {
    let storage = LocalStorage::new(config.output.directory.clone());
    let pipeline = DatasetPipeline::new(storage, config);
    EtlEngine::new(pipeline).run().await
}

#[tokio::test]
async fn test_end_to_end_combcirc_dataset() {
    let dataset = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write(&dataset.path().join("n1/a/inv.v"), INVERTER);
    write(
        &dataset.path().join("n1/a/inv.json"),
        "{\n  \"reliability\": 0.9,\n}\n",
    );
    write(&dataset.path().join("n1/b/and2.v"), AND2);
    write(
        &dataset.path().join("n1/b/and2.json"),
        "{\"reliability\": 0.75}",
    );

    let summary = convert(config(dataset.path(), output.path(), "combcirc", "combcirc", ""))
        .await
        .unwrap();

    assert_eq!(summary.num_graphs, 2);
    assert_eq!(summary.num_nodes, 7);
    assert_eq!(summary.num_edges, 5);

    let out = output.path();
    assert_eq!(
        read(out, "combcirc_A.txt"),
        "1, 3\n3, 2\n4, 7\n5, 7\n7, 6\n"
    );
    assert_eq!(
        read(out, "combcirc_graph_indicator.txt"),
        "1\n1\n1\n2\n2\n2\n2\n"
    );
    assert_eq!(read(out, "combcirc_graph_attributes.txt"), "0.9\n0.75\n");
    assert_eq!(
        read(out, "combcirc_node_labels.txt"),
        "0\n1\n2\n0\n0\n1\n3\n"
    );
    assert_eq!(read(out, "combcirc_edge_labels.txt"), "0\n1\n2\n2\n3\n");
    assert_eq!(
        read(out, "combcirc_node_labels_mapping.txt"),
        "Node labels:\n\n 0  \"x\"\n 1  \"f\"\n 2  \"not\"\n 3  \"and\"\n"
    );
    assert_eq!(
        read(out, "combcirc_edge_labels_mapping.txt"),
        "Edge labels:\n\n 0  \"('x', 'not')\"\n 1  \"('not', 'f')\"\n 2  \"('x', 'and')\"\n 3  \"('and', 'f')\"\n"
    );

    // sidecar files are repaired in memory only
    assert!(read(dataset.path(), "n1/a/inv.json").contains(','));
}

#[tokio::test]
async fn test_end_to_end_iscas_dataset_with_archive() {
    let dataset = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(&dataset.path().join("c17.bench"), C17);

    let extra = "\n[output.archive]\nenabled = true\nfilename = \"iscas.zip\"\n";
    let summary = convert(config(dataset.path(), output.path(), "iscas", "iscas", extra))
        .await
        .unwrap();

    assert_eq!(summary.num_graphs, 1);
    assert_eq!(summary.num_nodes, 13);
    assert_eq!(summary.num_edges, 14);

    let out = output.path();
    assert_eq!(read(out, "iscas_graph_attributes.txt"), "0.7419\n");
    assert_eq!(read(out, "iscas_graph_indicator.txt"), "1\n".repeat(13));
    assert_eq!(
        read(out, "iscas_node_labels_mapping.txt"),
        "Node labels:\n\n 0  \"input\"\n 1  \"nand\"\n 2  \"output\"\n"
    );
    assert!(read(out, "iscas_edge_labels_mapping.txt").contains("\"('input', 'nand')\""));
    assert!(read(out, "iscas_edge_labels_mapping.txt").contains("\"('nand', 'output')\""));

    let zip_data = std::fs::read(out.join("iscas.zip")).unwrap();
    let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 7);
}

#[tokio::test]
async fn test_iscas_unknown_circuit_needs_override() {
    let dataset = TempDir::new().unwrap();
    write(&dataset.path().join("s27.bench"), C17);

    let output = TempDir::new().unwrap();
    let result = convert(config(dataset.path(), output.path(), "iscas", "iscas", "")).await;
    assert!(matches!(
        result,
        Err(EtlError::MissingReliabilityError { .. })
    ));

    let extra = "\n[reliability.overrides]\ns27 = 0.8\n";
    convert(config(dataset.path(), output.path(), "iscas", "iscas", extra))
        .await
        .unwrap();
    assert_eq!(read(output.path(), "iscas_graph_attributes.txt"), "0.8\n");
}

#[tokio::test]
async fn test_malformed_netlist_reports_location() {
    let dataset = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        &dataset.path().join("n1/a/broken.v"),
        "module broken(x1, f1);\n  input x1;\n  output f1;\n  nand (f1, x1;\nendmodule\n",
    );
    write(&dataset.path().join("n1/a/broken.json"), "{\"reliability\": 0.5}");

    let result = convert(config(dataset.path(), output.path(), "combcirc", "combcirc", "")).await;

    match result {
        Err(EtlError::ParseError { path, .. }) => assert!(path.ends_with("broken.v")),
        other => panic!("expected a parse error, got {:?}", other.map(|s| s.num_graphs)),
    }
    assert!(!output.path().join("combcirc_A.txt").exists());
}

#[tokio::test]
async fn test_empty_dataset_writes_empty_files() {
    let dataset = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let summary = convert(config(dataset.path(), output.path(), "combcirc", "empty", ""))
        .await
        .unwrap();

    assert_eq!(summary.num_graphs, 0);
    assert_eq!(read(output.path(), "empty_A.txt"), "");
    assert_eq!(
        read(output.path(), "empty_node_labels_mapping.txt"),
        "Node labels:\n\n"
    );
}

#[cfg(feature = "cli")]
#[tokio::test]
async fn test_cli_config_end_to_end() {
    use clap::Parser;
    use verilog_to_txt::CliConfig;

    let dataset = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(&dataset.path().join("c17.bench"), C17);

    let config = CliConfig::parse_from([
        "verilog-to-txt",
        "-d",
        dataset.path().to_str().unwrap(),
        "-f",
        "iscas",
        "-p",
        "c17",
        "-o",
        output.path().to_str().unwrap(),
        "-j",
        "1",
    ]);

    let storage = LocalStorage::new(config.output_directory.clone());
    let engine = EtlEngine::new(DatasetPipeline::new(storage, config));
    let summary = engine.run().await.unwrap();

    assert_eq!(summary.num_graphs, 1);
    assert!(output.path().join("c17_edge_labels.txt").exists());
}
