//! Layer jobs of the fuel price lake.
//!
//! - **bronze**: raw CSV (or synthetic data) into partitioned parquet
//! - **silver**: bronze through the transform pipeline
//! - **gold**: silver into per-category analytics tables
//! - **orchestrator**: the three jobs in order, with an execution summary
//!
//! Jobs return `anyhow::Result`; the orchestrator turns each result into a
//! [`fuel_model::JobReport`] and never propagates a job error.

pub mod bronze;
pub mod gold;
pub mod orchestrator;
pub mod silver;

pub use bronze::{BronzeInput, BronzeJob, add_technical_columns, load_raw};
pub use gold::GoldJob;
pub use orchestrator::{LAYERS, Orchestrator, run_job, write_execution_log};
pub use silver::SilverJob;
