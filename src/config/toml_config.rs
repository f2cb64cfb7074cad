use crate::core::ConfigProvider;
use crate::domain::model::DatasetFormat;
use crate::netlist::LabelRule;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub dataset: DatasetConfig,
    pub output: OutputConfig,
    pub labels: Option<LabelsConfig>,
    pub performance: Option<PerformanceConfig>,
    pub monitoring: Option<MonitoringConfig>,
    pub reliability: Option<ReliabilityConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub path: String,
    pub format: DatasetFormat,
    /// Key of the reliability value in combcirc JSON files
    pub reliability_field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: String,
    pub prefix: String,
    pub archive: Option<ArchiveConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsConfig {
    pub rule: Option<LabelRule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceConfig {
    pub jobs: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    /// Circuit name to reliability, for ISCAS datasets
    pub overrides: BTreeMap<String, f64>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable, unset
    /// variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("dataset.path", &self.dataset.path)?;
        validation::validate_path("output.directory", &self.output.directory)?;
        validation::validate_prefix("output.prefix", &self.output.prefix)?;

        if let Some(field) = &self.dataset.reliability_field {
            validation::validate_non_empty_string("dataset.reliability_field", field)?;
        }

        if let Some(jobs) = self.performance.as_ref().and_then(|p| p.jobs) {
            validation::validate_range("performance.jobs", jobs, 1, 256)?;
        }

        if let Some(archive) = self.output.archive.as_ref().filter(|a| a.enabled) {
            validation::validate_prefix("output.archive.filename", &archive.filename)?;
            validation::validate_file_extension(
                "output.archive.filename",
                &archive.filename,
                &["zip"],
            )?;
        }

        if let Some(reliability) = &self.reliability {
            for (circuit, value) in &reliability.overrides {
                validation::validate_reliability(&format!("reliability.overrides.{}", circuit), *value)?;
            }
        }

        Ok(())
    }

    pub fn jobs(&self) -> usize {
        self.performance
            .as_ref()
            .and_then(|p| p.jobs)
            .unwrap_or(4)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn dataset_path(&self) -> &str {
        &self.dataset.path
    }

    fn format(&self) -> DatasetFormat {
        self.dataset.format
    }

    fn output_directory(&self) -> &str {
        &self.output.directory
    }

    fn prefix(&self) -> &str {
        &self.output.prefix
    }

    fn jobs(&self) -> usize {
        TomlConfig::jobs(self)
    }

    fn label_rule(&self) -> LabelRule {
        self.labels
            .as_ref()
            .and_then(|l| l.rule)
            .unwrap_or_else(|| self.dataset.format.default_label_rule())
    }

    fn reliability_field(&self) -> &str {
        self.dataset
            .reliability_field
            .as_deref()
            .unwrap_or("reliability")
    }

    fn reliability_overrides(&self) -> Vec<(String, f64)> {
        self.reliability
            .as_ref()
            .map(|r| {
                r.overrides
                    .iter()
                    .map(|(circuit, value)| (circuit.clone(), *value))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn archive_name(&self) -> Option<&str> {
        self.output
            .archive
            .as_ref()
            .filter(|a| a.enabled)
            .map(|a| a.filename.as_str())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config() {
        let toml_content = r#"
[dataset]
path = "verilog_dataset"
format = "combcirc"

[output]
directory = "combcirc"
prefix = "combcirc"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.dataset_path(), "verilog_dataset");
        assert_eq!(config.format(), DatasetFormat::Combcirc);
        assert_eq!(config.label_rule(), LabelRule::TrailingDigits);
        assert_eq!(config.reliability_field(), "reliability");
        assert_eq!(config.jobs(), 4);
        assert_eq!(config.archive_name(), None);
        assert!(!config.monitoring_enabled());
        assert!(config.reliability_overrides().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[dataset]
path = "iscas85"
format = "iscas"

[labels]
rule = "trailing_digits"

[output]
directory = "out"
prefix = "iscas"

[output.archive]
enabled = true
filename = "iscas.zip"

[performance]
jobs = 8

[monitoring]
enabled = true
log_level = "debug"

[reliability.overrides]
c880 = 0.61
s27 = 0.8
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.format(), DatasetFormat::Iscas);
        assert_eq!(config.label_rule(), LabelRule::TrailingDigits);
        assert_eq!(config.jobs(), 8);
        assert_eq!(config.archive_name(), Some("iscas.zip"));
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_level(), Some("debug"));
        assert_eq!(
            config.reliability_overrides(),
            vec![("c880".to_string(), 0.61), ("s27".to_string(), 0.8)]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_disabled_archive_is_ignored() {
        let toml_content = r#"
[dataset]
path = "d"
format = "combcirc"

[output]
directory = "o"
prefix = "p"

[output.archive]
enabled = false
filename = "not-a-zip.tar"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.archive_name(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("VERILOG_TO_TXT_TEST_DATASET", "/data/combcirc");

        let toml_content = r#"
[dataset]
path = "${VERILOG_TO_TXT_TEST_DATASET}"
format = "combcirc"

[output]
directory = "${VERILOG_TO_TXT_TEST_UNSET}"
prefix = "combcirc"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.dataset.path, "/data/combcirc");
        assert_eq!(config.output.directory, "${VERILOG_TO_TXT_TEST_UNSET}");

        std::env::remove_var("VERILOG_TO_TXT_TEST_DATASET");
    }

    #[test]
    fn test_config_validation() {
        let bad_jobs = r#"
[dataset]
path = "d"
format = "combcirc"

[output]
directory = "o"
prefix = "p"

[performance]
jobs = 0
"#;
        assert!(TomlConfig::from_toml_str(bad_jobs).unwrap().validate().is_err());

        let bad_reliability = r#"
[dataset]
path = "d"
format = "iscas"

[output]
directory = "o"
prefix = "p"

[reliability.overrides]
c17 = 1.5
"#;
        assert!(TomlConfig::from_toml_str(bad_reliability)
            .unwrap()
            .validate()
            .is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let toml_content = r#"
[dataset]
path = "d"
format = "blif"

[output]
directory = "o"
prefix = "p"
"#;

        assert!(matches!(
            TomlConfig::from_toml_str(toml_content),
            Err(EtlError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[dataset]
path = "verilog_dataset"
format = "combcirc"
reliability_field = "rel"

[output]
directory = "combcirc"
prefix = "combcirc"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.reliability_field(), "rel");
    }
}
