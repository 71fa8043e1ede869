//! Fuel price lake CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use fuel_cli::commands::{
    bronze_input, inspect_quality, list_partitions, load_config, run_layer, run_pipeline,
};
use fuel_cli::logging::{LogConfig, LogFormat, init_logging};
use fuel_cli::summary::{
    print_execution_summary, print_job_report, print_partitions, print_quality_report,
};
use fuel_model::{Layer, PipelineConfig, PipelineStatus};

mod cli;

use crate::cli::{Cli, Command, IngestArgs, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let config = load_config(cli.config.as_deref(), cli.lake_dir.as_deref())?;
    let code = match cli.command {
        Command::Run(args) => {
            let summary = run_pipeline(&config, &ingest(&config, args));
            print_execution_summary(&summary);
            i32::from(summary.status != PipelineStatus::Success)
        }
        Command::Bronze(args) => single(&config, Layer::Bronze, args),
        Command::Silver => single(&config, Layer::Silver, IngestArgs::default()),
        Command::Gold => single(&config, Layer::Gold, IngestArgs::default()),
        Command::Quality(args) => {
            let report = inspect_quality(&config, &args.csv)?;
            print_quality_report(&report);
            0
        }
        Command::Partitions(args) => {
            let (root, partitions) = list_partitions(&config, args.layer.into())?;
            println!("Layer: {}", root.display());
            print_partitions(&partitions);
            0
        }
    };
    Ok(code)
}

fn ingest(config: &PipelineConfig, args: IngestArgs) -> fuel_core::BronzeInput {
    bronze_input(&config.source, args.input, args.records, args.seed)
}

fn single(config: &PipelineConfig, layer: Layer, args: IngestArgs) -> i32 {
    let report = run_layer(config, layer, &ingest(config, args));
    print_job_report(&report);
    i32::from(!report.is_success())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
