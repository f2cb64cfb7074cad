use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use verilog_to_txt::netlist::load_circuit_graph;
use verilog_to_txt::utils::logger;

#[derive(Parser)]
#[command(name = "verilog-to-graph")]
#[command(about = "Print the graph of a single Verilog or .bench netlist")]
struct Args {
    /// Netlist file, `.bench` files are read as ISCAS netlists
    file: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let graph = load_circuit_graph(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    println!("Nodes ({}):", graph.node_count());
    for name in graph.node_names() {
        println!("  {:?}", name);
    }

    println!("Edges ({}):", graph.edge_count());
    for (source, target) in graph.edge_names() {
        println!("  {:?} -> {:?}", source, target);
    }

    println!("Adjacency:");
    for line in graph.adjacency_lines() {
        println!("{}", line);
    }

    Ok(())
}
