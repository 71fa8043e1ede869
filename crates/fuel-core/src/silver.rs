//! Silver transformation: bronze partitions through clean, normalize and
//! enrich, re-partitioned by collection year and month.

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, warn};

use fuel_common::{has_column, i64_column, set_i64_column};
use fuel_model::{JobMetrics, PipelineConfig, columns};
use fuel_quality::{QualityChecker, issues};
use fuel_store::{PartitionReader, PartitionWriter};
use fuel_transform::TransformPipeline;

pub const SILVER_FILE_PREFIX: &str = "data";

#[derive(Debug, Clone, Copy)]
pub struct SilverJob<'a> {
    config: &'a PipelineConfig,
}

impl<'a> SilverJob<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<JobMetrics> {
        let lake = &self.config.lake;
        let bronze = PartitionReader::new(lake.bronze_dir())
            .read()
            .context("read bronze layer")?;
        let records_input = bronze.height();
        let bronze = drop_partition_keys(bronze, &lake.partition_columns)?;

        let output = TransformPipeline::new(&self.config.analytics)
            .run(bronze)
            .context("transform bronze records")?;
        info!(
            duplicates = output.clean.duplicates_removed,
            invalid_dates = output.clean.invalid_dates_removed,
            unmapped = output.normalize.has_unmapped(),
            "silver transforms applied"
        );
        let silver = with_collection_keys(output.data)?;

        let checker = QualityChecker::new(&self.config.quality);
        let keys = QualityChecker::silver_keys();
        let report = checker.report(&silver, Some(&checker.silver_rules()), Some(keys.as_slice()));
        let sparse_columns = checker.columns_over_null_limit(&report);
        if !checker.passes(&report) || !sparse_columns.is_empty() {
            warn!(
                quality_score = report.overall_quality_score,
                issues = ?issues(&report),
                sparse_columns = ?sparse_columns,
                "silver data quality below expected"
            );
        }

        let writer = PartitionWriter::new(lake.silver_dir(), SILVER_FILE_PREFIX);
        let summary = writer
            .try_write(&silver, &lake.partition_columns)
            .context("write silver partitions")?;

        info!(
            rows_in = records_input,
            rows = summary.rows_written,
            partitions = summary.partition_count(),
            quality_score = report.overall_quality_score,
            "silver transformation complete"
        );
        Ok(JobMetrics {
            records_input,
            records_output: summary.rows_written,
            partitions_written: summary.partition_count(),
            files_written: summary.file_count(),
            quality_score: Some(report.overall_quality_score),
        })
    }
}

/// Drop the bronze partition columns restored from the directory path.
fn drop_partition_keys(mut df: DataFrame, partition_columns: &[String]) -> Result<DataFrame> {
    for name in partition_columns {
        if has_column(&df, name) {
            df = df.drop(name)?;
        }
    }
    Ok(df)
}

/// Partition keys for silver come from the enriched collection date.
pub fn with_collection_keys(mut df: DataFrame) -> Result<DataFrame> {
    let years = i64_column(&df, columns::ANO_COLETA)?;
    let months = i64_column(&df, columns::MES_COLETA)?;
    set_i64_column(&mut df, columns::ANO, years)?;
    set_i64_column(&mut df, columns::MES, months)?;
    Ok(df)
}
