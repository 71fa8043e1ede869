//! Runs the layer jobs in order and records what happened.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{error, info, info_span, warn};

use fuel_model::{
    ExecutionSummary, JobMetrics, JobOutcome, JobReport, Layer, PipelineConfig, PipelineStatus,
};

use crate::bronze::{BronzeInput, BronzeJob};
use crate::gold::GoldJob;
use crate::silver::SilverJob;

/// Layers of a full run, in execution order.
pub const LAYERS: [Layer; 3] = [Layer::Bronze, Layer::Silver, Layer::Gold];

#[derive(Debug, Clone, Copy)]
pub struct Orchestrator<'a> {
    config: &'a PipelineConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Run bronze, silver and gold, stopping at the first failed job. The
    /// summary is also written to the lake's log directory.
    pub fn run(&self, input: &BronzeInput) -> ExecutionSummary {
        let started = Local::now();
        let start = Instant::now();
        let pipeline_id = format!("exec_{}", started.format("%Y%m%d_%H%M%S"));
        info!(pipeline_id = %pipeline_id, "pipeline started");

        let mut jobs = Vec::with_capacity(LAYERS.len());
        for layer in LAYERS {
            let report = self.run_layer(layer, input);
            let failed = !report.is_success();
            jobs.push(report);
            if failed {
                break;
            }
        }

        let status = if jobs.iter().all(JobReport::is_success) {
            PipelineStatus::Success
        } else {
            PipelineStatus::Failed
        };
        let summary = ExecutionSummary {
            pipeline_id,
            started_at: started.to_rfc3339(),
            finished_at: Local::now().to_rfc3339(),
            total_seconds: start.elapsed().as_secs_f64(),
            status,
            jobs,
        };
        info!(
            pipeline_id = %summary.pipeline_id,
            status = ?summary.status,
            total_seconds = summary.total_seconds,
            "pipeline finished"
        );

        if let Err(error) = write_execution_log(&summary, &self.config.lake.logs_dir()) {
            warn!(error = %format!("{error:#}"), "execution log not written");
        }
        summary
    }

    /// Run one layer job inside its span.
    pub fn run_layer(&self, layer: Layer, input: &BronzeInput) -> JobReport {
        let config = self.config;
        match layer {
            Layer::Bronze => info_span!("bronze")
                .in_scope(|| run_job(layer, || BronzeJob::new(config).run(input))),
            Layer::Silver => {
                info_span!("silver").in_scope(|| run_job(layer, || SilverJob::new(config).run()))
            }
            Layer::Gold => {
                info_span!("gold").in_scope(|| run_job(layer, || GoldJob::new(config).run()))
            }
        }
    }
}

/// Time `job` and turn its result into a report. Errors are kept as their
/// full context chain.
pub fn run_job<F>(layer: Layer, job: F) -> JobReport
where
    F: FnOnce() -> Result<JobMetrics>,
{
    let started_at = Local::now().to_rfc3339();
    let start = Instant::now();
    let result = job();
    let elapsed_seconds = start.elapsed().as_secs_f64();

    let outcome = match result {
        Ok(metrics) => {
            info!(job = layer.job_name(), elapsed_seconds, "job succeeded");
            JobOutcome::Success(metrics)
        }
        Err(err) => {
            let message = format!("{err:#}");
            error!(job = layer.job_name(), elapsed_seconds, error = %message, "job failed");
            JobOutcome::Failure { error: message }
        }
    };
    JobReport {
        layer,
        job_name: layer.job_name().to_string(),
        started_at,
        elapsed_seconds,
        outcome,
    }
}

/// Write `summary` as pretty JSON to `pipeline_execution_{id}.json`.
pub fn write_execution_log(summary: &ExecutionSummary, logs_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(logs_dir)
        .with_context(|| format!("create log directory {}", logs_dir.display()))?;
    let path = logs_dir.join(format!("pipeline_execution_{}.json", summary.pipeline_id));
    let json = serde_json::to_string_pretty(summary).context("serialize execution summary")?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
