use clap::Parser;
use verilog_to_txt::config::toml_config::TomlConfig;
use verilog_to_txt::core::{CircuitSource, ConfigProvider};
use verilog_to_txt::dataset::source_for;
use verilog_to_txt::utils::{logger, validation::Validate};
use verilog_to_txt::{DatasetPipeline, EtlEngine, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-convert")]
#[command(about = "Dataset conversion driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "verilog-to-txt.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the number of parallel parsing jobs
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Dry run - list the netlists that would be converted without converting them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // load config
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // logging, the config may ask for debug
    logger::init_cli_logger(args.verbose || config.log_level() == Some("debug"));

    tracing::info!("🚀 Starting TOML-based dataset conversion");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // command line overrides
    if let Some(jobs) = args.jobs {
        config.performance.get_or_insert_with(Default::default).jobs = Some(jobs);
        tracing::info!("🔧 Jobs overridden to: {}", jobs);
    }

    // validate config
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // storage and pipeline
    let storage = LocalStorage::new(config.output_directory().to_string());
    let pipeline = DatasetPipeline::new(storage, config);

    // run the engine
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Conversion completed successfully!");
            println!(
                "✅ Converted {} graphs ({} nodes, {} edges)",
                summary.num_graphs, summary.num_nodes, summary.num_edges
            );
            println!("📁 Output saved to: {}_*.txt", summary.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // exit code follows the error severity
            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Dataset: {} ({})", config.dataset_path(), config.format());
    println!("  Label rule: {}", config.label_rule());
    println!(
        "  Output: {}/{}_*.txt",
        config.output_directory(),
        config.prefix()
    );
    if let Some(archive) = config.archive_name() {
        println!("  Archive: {}", archive);
    }
    println!("  Jobs: {}", config.jobs());

    let overrides = config.reliability_overrides();
    if !overrides.is_empty() {
        println!("  Reliability overrides: {}", overrides.len());
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> Result<(), Box<dyn std::error::Error>> {
    let source = source_for(config);
    let files = source.discover()?;

    println!("🔍 Dry Run Analysis:");
    println!("  {} netlists would be converted:", files.len());
    for file in &files {
        println!("    {} ({})", file.name, file.path.display());
    }

    println!();
    println!("✅ Dry run analysis complete.");

    Ok(())
}
