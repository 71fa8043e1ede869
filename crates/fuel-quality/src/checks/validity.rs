//! Rule-based validity.

use std::collections::BTreeMap;

use polars::prelude::{AnyValue, Column, DataFrame};
use tracing::debug;

use fuel_common::{any_to_f64, any_to_string, parse_date};
use fuel_model::{RuleKind, ValidationRules};

use super::fraction;

/// Fraction of rows satisfying each column's rule.
///
/// A rule column absent from the frame scores 0.0. On a frame with no rows
/// only the absent columns are reported.
pub fn validity(df: &DataFrame, rules: &ValidationRules) -> BTreeMap<String, f64> {
    let mut scores = BTreeMap::new();
    for (name, rule) in rules {
        let Ok(column) = df.column(name) else {
            debug!(column = %name, "rule column absent");
            scores.insert(name.clone(), 0.0);
            continue;
        };
        if df.height() == 0 {
            continue;
        }
        let score = match rule.effective() {
            Some(kind) => fraction(count_valid(column, df.height(), kind), df),
            None => 1.0,
        };
        scores.insert(name.clone(), score);
    }
    scores
}

fn count_valid(column: &Column, height: usize, kind: RuleKind<'_>) -> usize {
    (0..height)
        .filter(|&idx| is_valid(column.get(idx).unwrap_or(AnyValue::Null), kind))
        .count()
}

fn is_valid(value: AnyValue<'_>, kind: RuleKind<'_>) -> bool {
    if matches!(value, AnyValue::Null) {
        return false;
    }
    match kind {
        RuleKind::Range(range) => any_to_f64(value).is_some_and(|v| range.contains(v)),
        RuleKind::Values(allowed) => {
            let text = any_to_string(value);
            allowed.iter().any(|candidate| candidate == &text)
        }
        RuleKind::Date(format) => match value {
            AnyValue::Date(_) => true,
            AnyValue::String(s) => parse_date(s, format).is_some(),
            AnyValue::StringOwned(s) => parse_date(&s, format).is_some(),
            _ => false,
        },
    }
}
