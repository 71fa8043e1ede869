//! Report composition, schema checks and advisory issues.

use chrono::Utc;
use polars::prelude::DataFrame;
use tracing::{info, warn};

use fuel_common::missing_columns;
use fuel_model::{DatasetInfo, QualityReport, ValidationRules, mean};

use crate::checks::completeness::completeness;
use crate::checks::consistency::consistency;
use crate::checks::uniqueness::uniqueness;
use crate::checks::validity::validity;

pub const COMPLETENESS_THRESHOLD: f64 = 0.9;
pub const VALIDITY_THRESHOLD: f64 = 0.8;
pub const UNIQUENESS_THRESHOLD: f64 = 0.95;
pub const OVERALL_THRESHOLD: f64 = 0.8;

/// Score a table.
///
/// Validity is included only for a non-empty rule set and uniqueness only for
/// a non-empty key list. The overall score is the mean of the category means,
/// each category weighing the same regardless of its column count.
pub fn report<S: AsRef<str>>(
    df: &DataFrame,
    rules: Option<&ValidationRules>,
    key_columns: Option<&[S]>,
) -> QualityReport {
    let validity = rules
        .filter(|rules| !rules.is_empty())
        .map(|rules| validity(df, rules));
    let uniqueness = key_columns
        .filter(|keys| !keys.is_empty())
        .map(|keys| uniqueness(df, keys));
    let mut report = QualityReport {
        timestamp: Utc::now().to_rfc3339(),
        dataset_info: DatasetInfo {
            total_rows: df.height(),
            total_columns: df.width(),
            memory_usage_mb: df.estimated_size() as f64 / 1024.0 / 1024.0,
        },
        completeness: completeness(df),
        consistency: consistency(df),
        validity,
        uniqueness,
        overall_quality_score: 0.0,
    };
    report.overall_quality_score = overall_score(&report);
    info!(
        rows = report.dataset_info.total_rows,
        columns = report.dataset_info.total_columns,
        quality_score = report.overall_quality_score,
        "quality report computed"
    );
    report
}

/// Mean of the available category means; 0.0 when nothing is computable.
pub fn overall_score(report: &QualityReport) -> f64 {
    let categories = [
        report.mean_completeness(),
        report.mean_validity(),
        report.mean_consistency(),
        report.uniqueness,
    ];
    mean(categories.into_iter().flatten()).unwrap_or(0.0)
}

/// True iff every expected column is present. Extra columns are fine.
pub fn schema_check<S: AsRef<str>>(df: &DataFrame, expected_columns: &[S]) -> bool {
    let missing = missing_columns(df, expected_columns);
    if missing.is_empty() {
        return true;
    }
    warn!(missing = ?missing, "required columns missing");
    false
}

/// Human-readable list of metrics below the fixed thresholds.
pub fn issues(report: &QualityReport) -> Vec<String> {
    let mut issues = Vec::new();
    for (column, score) in &report.completeness {
        if *score < COMPLETENESS_THRESHOLD {
            issues.push(format!(
                "column '{column}' has low completeness: {}",
                percent(*score)
            ));
        }
    }
    if let Some(validity) = &report.validity {
        for (column, score) in validity {
            if *score < VALIDITY_THRESHOLD {
                issues.push(format!(
                    "column '{column}' has low validity: {}",
                    percent(*score)
                ));
            }
        }
    }
    if let Some(score) = report.uniqueness
        && score < UNIQUENESS_THRESHOLD
    {
        issues.push(format!("low uniqueness detected: {}", percent(score)));
    }
    if report.overall_quality_score < OVERALL_THRESHOLD {
        issues.push(format!(
            "overall quality score below expected: {}",
            percent(report.overall_quality_score)
        ));
    }
    issues
}

fn percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}
