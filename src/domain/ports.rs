use crate::dataset::tu::TuDataset;
use crate::domain::model::{CircuitFile, CircuitRecord, DatasetFormat};
use crate::netlist::LabelRule;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn dataset_path(&self) -> &str;
    fn format(&self) -> DatasetFormat;
    fn output_directory(&self) -> &str;
    fn prefix(&self) -> &str;
    fn jobs(&self) -> usize;

    fn label_rule(&self) -> LabelRule {
        self.format().default_label_rule()
    }

    /// Key of the reliability value in combcirc sidecar JSON files.
    fn reliability_field(&self) -> &str {
        "reliability"
    }

    /// Configured ISCAS circuit reliabilities, taking precedence over the
    /// built-in table.
    fn reliability_overrides(&self) -> Vec<(String, f64)> {
        Vec::new()
    }

    /// File name of the zip bundle written next to the dataset files.
    fn archive_name(&self) -> Option<&str> {
        None
    }
}

/// Finds the netlists of a dataset and turns each into a labelled graph record.
///
/// `load` is called from blocking worker threads, one file at a time.
pub trait CircuitSource: Send + Sync {
    fn discover(&self) -> Result<Vec<CircuitFile>>;
    fn load(&self, file: &CircuitFile) -> Result<CircuitRecord>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<CircuitRecord>>;
    async fn transform(&self, records: Vec<CircuitRecord>) -> Result<TuDataset>;
    async fn load(&self, dataset: TuDataset) -> Result<String>;
}
