//! Job and pipeline execution reports.

use serde::{Deserialize, Serialize};

/// Lake layer a job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Bronze,
    Silver,
    Gold,
}

impl Layer {
    pub fn job_name(self) -> &'static str {
        match self {
            Layer::Bronze => "bronze_ingestion",
            Layer::Silver => "silver_transformation",
            Layer::Gold => "gold_analytics",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Layer::Bronze => "bronze",
            Layer::Silver => "silver",
            Layer::Gold => "gold",
        };
        f.write_str(label)
    }
}

/// Counts produced by a successful job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobMetrics {
    pub records_input: usize,
    pub records_output: usize,
    pub partitions_written: usize,
    pub files_written: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobOutcome {
    Success(JobMetrics),
    Failure { error: String },
}

/// Result of one job run. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobReport {
    pub layer: Layer,
    pub job_name: String,
    pub started_at: String,
    pub elapsed_seconds: f64,
    #[serde(flatten)]
    pub outcome: JobOutcome,
}

impl JobReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, JobOutcome::Success(_))
    }

    pub fn metrics(&self) -> Option<&JobMetrics> {
        match &self.outcome {
            JobOutcome::Success(metrics) => Some(metrics),
            JobOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            JobOutcome::Success(_) => None,
            JobOutcome::Failure { error } => Some(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Success,
    Failed,
}

/// Summary of a full orchestrated run, written to the execution log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub pipeline_id: String,
    pub started_at: String,
    pub finished_at: String,
    pub total_seconds: f64,
    pub status: PipelineStatus,
    pub jobs: Vec<JobReport>,
}

impl ExecutionSummary {
    pub fn failed_job(&self) -> Option<&JobReport> {
        self.jobs.iter().find(|job| !job.is_success())
    }
}
