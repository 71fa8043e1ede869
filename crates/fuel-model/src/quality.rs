//! Validation rules and quality report types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Validity rule for a single column.
///
/// Only one rule kind is evaluated per column: range, then allowed values,
/// then date format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<NumericRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

/// Rule kind selected for evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleKind<'a> {
    Range(NumericRange),
    Values(&'a [String]),
    Date(&'a str),
}

impl ColumnRule {
    pub fn range(min: f64, max: f64) -> Self {
        Self {
            range: Some(NumericRange::new(min, max)),
            ..Self::default()
        }
    }

    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_values: Some(values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn date(format: impl Into<String>) -> Self {
        Self {
            date_format: Some(format.into()),
            ..Self::default()
        }
    }

    /// The rule kind that wins under range > values > date precedence.
    pub fn effective(&self) -> Option<RuleKind<'_>> {
        if let Some(range) = self.range {
            return Some(RuleKind::Range(range));
        }
        if let Some(values) = &self.allowed_values {
            return Some(RuleKind::Values(values));
        }
        self.date_format.as_deref().map(RuleKind::Date)
    }
}

/// Column name to rule.
pub type ValidationRules = BTreeMap<String, ColumnRule>;

/// Shape and size of the scored table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub total_rows: usize,
    pub total_columns: usize,
    pub memory_usage_mb: f64,
}

/// Read-only quality snapshot of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub timestamp: String,
    pub dataset_info: DatasetInfo,
    pub completeness: BTreeMap<String, f64>,
    pub consistency: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniqueness: Option<f64>,
    pub overall_quality_score: f64,
}

impl QualityReport {
    pub fn mean_completeness(&self) -> Option<f64> {
        mean(self.completeness.values().copied())
    }

    pub fn mean_consistency(&self) -> Option<f64> {
        mean(self.consistency.values().copied())
    }

    pub fn mean_validity(&self) -> Option<f64> {
        self.validity
            .as_ref()
            .and_then(|values| mean(values.values().copied()))
    }
}

/// Arithmetic mean, `None` for an empty sequence.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut total = 0.0;
    let mut count = 0usize;
    for value in values {
        total += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_precedence_prefers_range() {
        let rule = ColumnRule {
            range: Some(NumericRange::new(0.0, 1.0)),
            allowed_values: Some(vec!["A".to_string()]),
            date_format: Some("%Y".to_string()),
        };
        assert!(matches!(rule.effective(), Some(RuleKind::Range(_))));

        let rule = ColumnRule {
            allowed_values: Some(vec!["A".to_string()]),
            date_format: Some("%Y".to_string()),
            ..ColumnRule::default()
        };
        assert!(matches!(rule.effective(), Some(RuleKind::Values(_))));
        assert_eq!(ColumnRule::default().effective(), None);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(Vec::new()), None);
        assert_eq!(mean(vec![1.0, 0.5]), Some(0.75));
    }
}
