//! Command implementations behind the `fuel-lake` subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use fuel_core::{BronzeInput, Orchestrator};
use fuel_ingest::{read_raw_csv, validate_raw_schema};
use fuel_model::{
    ExecutionSummary, JobReport, Layer, PipelineConfig, QualityReport, SourceConfig, columns,
};
use fuel_quality::QualityChecker;
use fuel_store::{PartitionInfo, PartitionReader};

/// Defaults, then the TOML file if given, then the lake directory override.
pub fn load_config(path: Option<&Path>, lake_dir: Option<&Path>) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => PipelineConfig::load(path).context("load pipeline configuration")?,
        None => PipelineConfig::default(),
    };
    Ok(match lake_dir {
        Some(dir) => config.with_lake_root(dir),
        None => config,
    })
}

/// Bronze input from command-line values, falling back to the source config.
pub fn bronze_input(
    source: &SourceConfig,
    input: Option<PathBuf>,
    records: Option<usize>,
    seed: Option<u64>,
) -> BronzeInput {
    let defaults = BronzeInput::from(source);
    BronzeInput {
        input,
        records: records.unwrap_or(defaults.records),
        seed: seed.unwrap_or(defaults.seed),
    }
}

pub fn run_pipeline(config: &PipelineConfig, input: &BronzeInput) -> ExecutionSummary {
    Orchestrator::new(config).run(input)
}

pub fn run_layer(config: &PipelineConfig, layer: Layer, input: &BronzeInput) -> JobReport {
    Orchestrator::new(config).run_layer(layer, input)
}

/// Score a raw CSV with the raw survey rules.
pub fn inspect_quality(config: &PipelineConfig, path: &Path) -> Result<QualityReport> {
    let df = read_raw_csv(path).with_context(|| format!("read {}", path.display()))?;
    validate_raw_schema(&df).context("validate raw schema")?;
    let checker = QualityChecker::new(&config.quality);
    let keys = [columns::CNPJ, columns::DATA_COLETA, columns::PRODUTO];
    let report = checker.report(&df, Some(&checker.raw_rules()), Some(keys.as_slice()));
    info!(
        path = %path.display(),
        rows = df.height(),
        quality_score = report.overall_quality_score,
        "quality report built"
    );
    Ok(report)
}

/// Partitions of a partitioned layer, relative to the layer root.
pub fn list_partitions(config: &PipelineConfig, layer: Layer) -> Result<(PathBuf, Vec<PartitionInfo>)> {
    let root = match layer {
        Layer::Bronze => config.lake.bronze_dir(),
        Layer::Silver => config.lake.silver_dir(),
        Layer::Gold => bail!("gold tables are not partitioned"),
    };
    let partitions = PartitionReader::new(&root)
        .describe()
        .with_context(|| format!("inspect {layer} layer"))?;
    Ok((root, partitions))
}
