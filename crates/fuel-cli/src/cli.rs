//! Argument definitions for `fuel-lake`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

use fuel_model::Layer;

#[derive(Parser)]
#[command(
    name = "fuel-lake",
    version,
    about = "Fuel price lake - ingest, clean and analyse fuel price surveys",
    long_about = "Run the fuel price batch pipeline.\n\n\
                  Raw survey CSVs land in a partitioned bronze layer, are cleaned,\n\
                  normalized and enriched into silver, and summarized into gold\n\
                  analytics tables."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Pipeline configuration file (TOML).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Lake root directory (overrides the configuration file).
    #[arg(long = "lake-dir", value_name = "DIR", env = "FUEL_LAKE_DIR", global = true)]
    pub lake_dir: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run bronze, silver and gold in order.
    Run(IngestArgs),

    /// Ingest raw data into the bronze layer.
    Bronze(IngestArgs),

    /// Transform bronze into the silver layer.
    Silver,

    /// Build gold analytics tables from silver.
    Gold,

    /// Print a quality report for a raw CSV file.
    Quality(QualityArgs),

    /// List the partitions of a layer.
    Partitions(PartitionsArgs),
}

#[derive(Args, Default)]
pub struct IngestArgs {
    /// Raw CSV, or a directory of them, to ingest. Synthetic data is
    /// generated when omitted.
    #[arg(long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Number of synthetic records to generate.
    #[arg(long = "records", value_name = "N")]
    pub records: Option<usize>,

    /// Seed for synthetic data.
    #[arg(long = "seed", value_name = "S")]
    pub seed: Option<u64>,
}

#[derive(Args)]
pub struct QualityArgs {
    /// Raw survey CSV to score.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,
}

#[derive(Args)]
pub struct PartitionsArgs {
    /// Layer to inspect.
    #[arg(long = "layer", value_enum, default_value = "silver")]
    pub layer: LayerArg,
}

/// Partitioned layers.
#[derive(Clone, Copy, ValueEnum)]
pub enum LayerArg {
    Bronze,
    Silver,
}

impl From<LayerArg> for Layer {
    fn from(layer: LayerArg) -> Self {
        match layer {
            LayerArg::Bronze => Layer::Bronze,
            LayerArg::Silver => Layer::Silver,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
