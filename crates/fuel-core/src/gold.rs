//! Gold analytics: silver partitions into per-category analytics tables.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use tracing::{debug, info};

use fuel_analytics::gold_tables;
use fuel_model::{JobMetrics, PipelineConfig};
use fuel_store::{PartitionReader, write_table};

/// Subdirectory of the gold layer holding analytics tables.
pub const ANALYTICS_DIR: &str = "analytics";

#[derive(Debug, Clone, Copy)]
pub struct GoldJob<'a> {
    config: &'a PipelineConfig,
}

impl<'a> GoldJob<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<JobMetrics> {
        let lake = &self.config.lake;
        let silver = PartitionReader::new(lake.silver_dir())
            .read()
            .context("read silver layer")?;

        let tables = gold_tables(&silver, &self.config.analytics).context("compute analytics")?;

        let analytics_dir = lake.gold_dir().join(ANALYTICS_DIR);
        let mut categories = BTreeSet::new();
        let mut records_output = 0;
        for table in &tables {
            let dir = analytics_dir.join(table.category.as_str());
            let path = write_table(&table.data, &dir, table.name)
                .with_context(|| format!("write {} table {}", table.category, table.name))?;
            debug!(table = table.name, rows = table.height(), path = %path.display(), "table written");
            categories.insert(table.category);
            records_output += table.height();
        }

        info!(
            rows_in = silver.height(),
            tables = tables.len(),
            categories = categories.len(),
            "gold analytics complete"
        );
        Ok(JobMetrics {
            records_input: silver.height(),
            records_output,
            partitions_written: categories.len(),
            files_written: tables.len(),
            quality_score: None,
        })
    }
}
