pub mod etl;

pub use crate::domain::model::{CircuitFile, CircuitRecord, DatasetFormat, RunSummary};
pub use crate::domain::ports::{CircuitSource, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
