//! Per-column completeness.

use std::collections::BTreeMap;

use polars::prelude::{AnyValue, DataFrame};

use fuel_common::is_missing;

use super::fraction;

/// Fraction of non-missing rows per column. Empty for a frame with no rows.
pub fn completeness(df: &DataFrame) -> BTreeMap<String, f64> {
    let mut scores = BTreeMap::new();
    if df.height() == 0 {
        return scores;
    }
    for column in df.get_columns() {
        let present = (0..df.height())
            .filter(|&idx| !is_missing(&column.get(idx).unwrap_or(AnyValue::Null)))
            .count();
        scores.insert(column.name().to_string(), fraction(present, df));
    }
    scores
}
