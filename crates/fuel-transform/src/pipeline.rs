//! Ordered clean → normalize → enrich execution with per-stage quality snapshots.

use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{info, info_span};

use fuel_model::{AnalyticsConfig, QualityReport, ValidationRules};

use crate::clean::{CleanOptions, CleanReport, clean};
use crate::enrich::{EnrichOptions, enrich};
use crate::error::Result;
use crate::normalize::{NormalizeOptions, NormalizeReport, normalize, vocabulary_rules};
use crate::stage::Stage;

/// Quality snapshot taken after a stage.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub rows: usize,
    pub duration_ms: u128,
    pub quality: QualityReport,
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub data: DataFrame,
    pub clean: CleanReport,
    pub normalize: NormalizeReport,
    pub stages: Vec<StageReport>,
}

impl PipelineOutput {
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransformPipeline {
    pub clean: CleanOptions,
    pub normalize: NormalizeOptions,
    pub enrich: EnrichOptions,
}

impl TransformPipeline {
    pub fn new(analytics: &AnalyticsConfig) -> Self {
        Self {
            enrich: EnrichOptions::from(analytics),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_strict_vocabulary(mut self, strict: bool) -> Self {
        self.normalize.strict = strict;
        self
    }

    #[must_use]
    pub fn with_clean_options(mut self, options: CleanOptions) -> Self {
        self.clean = options;
        self
    }

    /// Run every stage in order. The first failing stage stops the run.
    pub fn run(&self, df: DataFrame) -> Result<PipelineOutput> {
        let mut stages = Vec::with_capacity(Stage::ALL.len());
        let rules = self.stage_rules();

        let start = Instant::now();
        let (df, clean_report) = info_span!("stage", name = %Stage::Clean)
            .in_scope(|| clean(df, &self.clean))?;
        stages.push(snapshot(Stage::Clean, &df, None, start));

        let start = Instant::now();
        let (df, normalize_report) = info_span!("stage", name = %Stage::Normalize)
            .in_scope(|| normalize(df, &self.normalize))?;
        stages.push(snapshot(Stage::Normalize, &df, rules.as_ref(), start));

        let start = Instant::now();
        let df = info_span!("stage", name = %Stage::Enrich).in_scope(|| enrich(df, &self.enrich))?;
        stages.push(snapshot(Stage::Enrich, &df, rules.as_ref(), start));

        Ok(PipelineOutput {
            data: df,
            clean: clean_report,
            normalize: normalize_report,
            stages,
        })
    }

    fn stage_rules(&self) -> Option<ValidationRules> {
        self.normalize.strict.then(vocabulary_rules)
    }
}

fn snapshot(
    stage: Stage,
    df: &DataFrame,
    rules: Option<&ValidationRules>,
    start: Instant,
) -> StageReport {
    let quality = fuel_quality::report::<&str>(df, rules, None);
    let duration_ms = start.elapsed().as_millis();
    info!(
        stage = %stage,
        rows = df.height(),
        quality_score = quality.overall_quality_score,
        duration_ms,
        "stage complete"
    );
    StageReport {
        stage,
        rows: df.height(),
        duration_ms,
        quality,
    }
}
