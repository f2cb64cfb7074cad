use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting dataset conversion...");
        self.monitor.log_stats("Start");

        tracing::info!("Parsing netlists...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Parsed {} netlists", records.len());
        self.monitor.log_stats("Extract");

        tracing::info!("Building graph dataset...");
        let dataset = self.pipeline.transform(records).await?;
        tracing::info!(
            "Built {} graphs with {} nodes and {} edges",
            dataset.num_graphs(),
            dataset.num_nodes(),
            dataset.num_edges()
        );
        self.monitor.log_stats("Transform");

        let summary = RunSummary {
            output_path: String::new(),
            num_graphs: dataset.num_graphs(),
            num_nodes: dataset.num_nodes(),
            num_edges: dataset.num_edges(),
        };

        tracing::info!("Writing dataset files...");
        let output_path = self.pipeline.load(dataset).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(RunSummary {
            output_path,
            ..summary
        })
    }
}
