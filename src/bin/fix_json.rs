use clap::Parser;
use std::path::PathBuf;
use verilog_to_txt::utils::{json_fix::fix_dataset_json, logger};

#[derive(Parser)]
#[command(name = "fix-json")]
#[command(about = "Remove trailing commas from the dataset's JSON files")]
struct Args {
    /// Path to the dataset directory
    #[arg(short = 'd', long, default_value = "verilog_dataset")]
    dataset_path: PathBuf,

    /// List the files that need repairing without writing them
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let fixed = fix_dataset_json(&args.dataset_path, args.dry_run)?;
    for path in &fixed {
        println!("{}", path.display());
    }

    let verb = if args.dry_run { "need repairing" } else { "repaired" };
    tracing::info!("{} JSON files {}", fixed.len(), verb);
    Ok(())
}
