use clap::Parser;
use verilog_to_txt::utils::{logger, validation::Validate};
use verilog_to_txt::{CliConfig, DatasetPipeline, EtlEngine, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // logging
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting verilog-to-txt");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // validate config
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // storage and pipeline
    let storage = LocalStorage::new(config.output_directory.clone());
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
