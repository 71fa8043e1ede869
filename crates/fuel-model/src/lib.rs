pub mod columns;
pub mod config;
pub mod error;
pub mod job;
pub mod products;
pub mod quality;
pub mod schema;

pub use config::{AnalyticsConfig, LakeConfig, PipelineConfig, QualityConfig, SourceConfig};
pub use error::ConfigError;
pub use job::{ExecutionSummary, JobMetrics, JobOutcome, JobReport, Layer, PipelineStatus};
pub use quality::{
    ColumnRule, DatasetInfo, NumericRange, QualityReport, RuleKind, ValidationRules, mean,
};
pub use schema::{LogicalType, logical_type};
