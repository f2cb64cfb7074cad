pub mod dataset_pipeline;

pub use dataset_pipeline::DatasetPipeline;
