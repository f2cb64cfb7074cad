pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::DatasetFormat;
#[cfg(feature = "cli")]
use crate::netlist::LabelRule;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "verilog-to-txt")]
#[command(about = "Convert gate-level circuit datasets into TU graph dataset text files")]
pub struct CliConfig {
    /// Path to the dataset directory
    #[arg(short = 'd', long, default_value = "verilog_dataset")]
    pub dataset_path: String,

    /// Dataset layout
    #[arg(short = 'f', long, value_enum, default_value = "combcirc")]
    pub format: DatasetFormat,

    /// Output file names prefix
    #[arg(short, long, default_value = "combcirc")]
    pub prefix: String,

    /// Output files directory
    #[arg(short, long, default_value = "combcirc")]
    pub output_directory: String,

    /// Node label rule, defaults to the one of the dataset format
    #[arg(short, long, value_enum)]
    pub label_rule: Option<LabelRule>,

    /// Number of netlists parsed in parallel
    #[arg(short, long, default_value = "4")]
    pub jobs: usize,

    /// Also bundle the output files into this zip archive
    #[arg(long)]
    pub archive: Option<String>,

    /// Log CPU and memory usage after every phase
    #[arg(long)]
    pub monitor: bool,

    /// Print out additional information
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn dataset_path(&self) -> &str {
        &self.dataset_path
    }

    fn format(&self) -> DatasetFormat {
        self.format
    }

    fn output_directory(&self) -> &str {
        &self.output_directory
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn jobs(&self) -> usize {
        self.jobs
    }

    fn label_rule(&self) -> LabelRule {
        self.label_rule
            .unwrap_or_else(|| self.format.default_label_rule())
    }

    fn archive_name(&self) -> Option<&str> {
        self.archive.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("dataset_path", &self.dataset_path)?;
        validation::validate_path("output_directory", &self.output_directory)?;
        validation::validate_prefix("prefix", &self.prefix)?;
        validation::validate_range("jobs", self.jobs, 1, 256)?;
        if let Some(archive) = &self.archive {
            validation::validate_prefix("archive", archive)?;
            validation::validate_file_extension("archive", archive, &["zip"])?;
        }
        Ok(())
    }
}
