use crate::core::{CircuitRecord, CircuitSource, ConfigProvider, Pipeline, Storage};
use crate::dataset::{source_for, TuDataset, TuDatasetBuilder};
use crate::utils::error::{EtlError, Result};
use std::io::Write;
use std::sync::Arc;
use tokio::task::JoinSet;
use zip::write::{FileOptions, ZipWriter};

/// Converts every netlist of a dataset into one TU graph dataset.
pub struct DatasetPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) source: Arc<dyn CircuitSource>,
}

impl<S: Storage, C: ConfigProvider> DatasetPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let source = source_for(&config);
        Self::with_source(storage, config, source)
    }

    pub fn with_source(storage: S, config: C, source: Arc<dyn CircuitSource>) -> Self {
        Self {
            storage,
            config,
            source,
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> EtlError {
    EtlError::processing(format!("Netlist worker failed: {}", e))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DatasetPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<CircuitRecord>> {
        tracing::debug!(
            "Discovering {} netlists under: {}",
            self.config.format(),
            self.config.dataset_path()
        );
        let source = Arc::clone(&self.source);
        let files = tokio::task::spawn_blocking(move || source.discover())
            .await
            .map_err(join_error)??;
        tracing::debug!("Found {} netlist files", files.len());

        // parsing is CPU bound, at most `jobs` files are in flight
        let jobs = self.config.jobs().max(1);
        let total = files.len();
        let mut pending = files.into_iter().enumerate();
        let mut running = JoinSet::new();
        let mut loaded = Vec::with_capacity(total);

        loop {
            while running.len() < jobs {
                let Some((index, file)) = pending.next() else {
                    break;
                };
                let source = Arc::clone(&self.source);
                running.spawn_blocking(move || {
                    tracing::debug!("Parsing {}", file.path.display());
                    source.load(&file).map(|record| (index, record))
                });
            }

            let Some(joined) = running.join_next().await else {
                break;
            };
            match joined.map_err(join_error)? {
                Ok(entry) => loaded.push(entry),
                Err(e) => {
                    running.abort_all();
                    return Err(e);
                }
            }
        }

        loaded.sort_by_key(|(index, _)| *index);
        let records: Vec<CircuitRecord> = loaded.into_iter().map(|(_, record)| record).collect();
        tracing::debug!("Loaded {} of {} netlists", records.len(), total);

        Ok(records)
    }

    async fn transform(&self, records: Vec<CircuitRecord>) -> Result<TuDataset> {
        if records.is_empty() {
            tracing::warn!(
                "No netlists found under {}, the dataset will be empty",
                self.config.dataset_path()
            );
        }

        let mut builder = TuDatasetBuilder::new(self.config.label_rule());
        for record in &records {
            tracing::debug!(
                "Adding {} ({} nodes, {} edges, reliability {})",
                record.name,
                record.graph.node_count(),
                record.graph.edge_count(),
                record.reliability
            );
            builder.add_graph(record);
        }

        builder.finish()
    }

    async fn load(&self, dataset: TuDataset) -> Result<String> {
        let files = dataset.render(self.config.prefix());

        tracing::debug!(
            "Writing {} files for {} graphs",
            files.len(),
            dataset.num_graphs()
        );

        for file in &files {
            self.storage
                .write_file(&file.name, file.contents.as_bytes())
                .await?;
        }

        if let Some(archive_name) = self.config.archive_name() {
            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for file in &files {
                    zip.start_file::<_, ()>(file.name.as_str(), FileOptions::default())?;
                    zip.write_all(file.contents.as_bytes())?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(archive_name, &zip_data).await?;
        }

        Ok(format!(
            "{}/{}",
            self.config.output_directory(),
            self.config.prefix()
        ))
    }
}
