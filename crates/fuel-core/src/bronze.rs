//! Bronze ingestion: raw CSV (given or synthetic) to partitioned parquet.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local, Utc};
use polars::prelude::DataFrame;
use tracing::{info, warn};

use fuel_common::{
    filter_rows, parse_date, set_date_column, set_i64_column, set_string_column, string_column,
};
use fuel_ingest::{
    generate_sample, list_raw_files, read_raw_csv, validate_raw_schema, write_raw_csv,
};
use fuel_model::columns::{self, RAW_DATE_FORMAT};
use fuel_model::{JobMetrics, PipelineConfig, SourceConfig};
use fuel_quality::{QualityChecker, issues};
use fuel_store::PartitionWriter;

/// File name prefix for bronze parquet files.
pub const BRONZE_FILE_PREFIX: &str = "data";

/// Where bronze reads from.
#[derive(Debug, Clone, PartialEq)]
pub struct BronzeInput {
    /// Raw CSV, or a directory of them, to ingest. Synthetic data is
    /// generated when absent.
    pub input: Option<PathBuf>,
    pub records: usize,
    pub seed: u64,
}

impl From<&SourceConfig> for BronzeInput {
    fn from(source: &SourceConfig) -> Self {
        Self {
            input: None,
            records: source.default_records,
            seed: source.seed,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BronzeJob<'a> {
    config: &'a PipelineConfig,
}

impl<'a> BronzeJob<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, input: &BronzeInput) -> Result<JobMetrics> {
        let source_path = match &input.input {
            Some(path) => path.clone(),
            None => self.write_synthetic(input)?,
        };

        let raw = load_raw(&source_path)?;
        let records_input = raw.height();

        let checker = QualityChecker::new(&self.config.quality);
        let keys = [columns::CNPJ, columns::DATA_COLETA, columns::PRODUTO];
        let report = checker.report(&raw, Some(&checker.raw_rules()), Some(keys.as_slice()));
        let sparse_columns = checker.columns_over_null_limit(&report);
        if !checker.passes(&report) || !sparse_columns.is_empty() {
            warn!(
                quality_score = report.overall_quality_score,
                issues = ?issues(&report),
                sparse_columns = ?sparse_columns,
                "raw data quality below expected"
            );
        }

        let source_name = source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bronze = add_technical_columns(raw, &source_name)?;
        let bronze = drop_unpartitioned(bronze, &self.config.lake.partition_columns)?;

        let writer = PartitionWriter::new(self.config.lake.bronze_dir(), BRONZE_FILE_PREFIX);
        let summary = writer
            .try_write(&bronze, &self.config.lake.partition_columns)
            .context("write bronze partitions")?;

        info!(
            rows_in = records_input,
            rows = summary.rows_written,
            partitions = summary.partition_count(),
            quality_score = report.overall_quality_score,
            "bronze ingestion complete"
        );
        Ok(JobMetrics {
            records_input,
            records_output: summary.rows_written,
            partitions_written: summary.partition_count(),
            files_written: summary.file_count(),
            quality_score: Some(report.overall_quality_score),
        })
    }

    fn write_synthetic(&self, input: &BronzeInput) -> Result<PathBuf> {
        let records = generate_sample(input.records, input.seed, &self.config.source);
        let name = format!(
            "combustiveis_sample_{}.csv",
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.config.lake.transient_dir().join(name);
        write_raw_csv(&path, &records).context("write synthetic data")?;
        Ok(path)
    }
}

/// Read one raw CSV, or every CSV directly inside a directory stacked in
/// file name order. Each file must carry the required raw columns.
pub fn load_raw(path: &Path) -> Result<DataFrame> {
    if !path.is_dir() {
        let raw = read_raw_csv(path).context("load raw data")?;
        validate_raw_schema(&raw).context("validate raw schema")?;
        return Ok(raw);
    }
    let files = list_raw_files(path).context("load raw data")?;
    let Some((first, rest)) = files.split_first() else {
        bail!("load raw data: no CSV files in {}", path.display());
    };
    let mut combined = read_raw_csv(first).context("load raw data")?;
    validate_raw_schema(&combined)
        .with_context(|| format!("validate raw schema of {}", first.display()))?;
    let names: Vec<String> = combined
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    for file in rest {
        let raw = read_raw_csv(file).context("load raw data")?;
        validate_raw_schema(&raw)
            .with_context(|| format!("validate raw schema of {}", file.display()))?;
        let aligned = raw
            .select(names.iter().map(String::as_str))
            .with_context(|| format!("align columns of {}", file.display()))?;
        combined.vstack_mut(&aligned)?;
    }
    info!(dir = %path.display(), files = files.len(), rows = combined.height(), "raw directory loaded");
    Ok(combined)
}

/// Add load metadata, the parsed collection date and its year/month keys.
/// Dates that do not parse leave the keys null.
pub fn add_technical_columns(df: DataFrame, source_file: &str) -> Result<DataFrame> {
    let mut df = df;
    let height = df.height();
    let loaded_at = Utc::now().to_rfc3339();
    set_string_column(
        &mut df,
        columns::BRONZE_LOAD_TIMESTAMP,
        vec![Some(loaded_at); height],
    )?;
    set_string_column(
        &mut df,
        columns::BRONZE_SOURCE_FILE,
        vec![Some(source_file.to_string()); height],
    )?;
    let ids = (1..=height).map(|id| i64::try_from(id).ok()).collect();
    set_i64_column(&mut df, columns::BRONZE_RECORD_ID, ids)?;

    let dates: Vec<_> = string_column(&df, columns::DATA_COLETA)?
        .into_iter()
        .map(|value| value.and_then(|raw| parse_date(&raw, RAW_DATE_FORMAT)))
        .collect();
    let years = dates.iter().map(|d| d.map(|d| i64::from(d.year()))).collect();
    let months = dates.iter().map(|d| d.map(|d| i64::from(d.month()))).collect();
    set_date_column(&mut df, columns::DATA_COLETA_PARSED, &dates)?;
    set_i64_column(&mut df, columns::ANO, years)?;
    set_i64_column(&mut df, columns::MES, months)?;
    Ok(df)
}

/// Drop rows with a null value in any partition column that is present.
pub fn drop_unpartitioned<S: AsRef<str>>(df: DataFrame, partition_columns: &[S]) -> Result<DataFrame> {
    let mut keep = vec![true; df.height()];
    for name in partition_columns {
        let Ok(values) = string_column(&df, name.as_ref()) else {
            continue;
        };
        for (flag, value) in keep.iter_mut().zip(&values) {
            *flag &= value.is_some();
        }
    }
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped == 0 {
        return Ok(df);
    }
    warn!(dropped, "rows without partition keys dropped");
    Ok(filter_rows(&df, &keep)?)
}
