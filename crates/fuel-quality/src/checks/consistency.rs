//! Per-column format consistency.
//!
//! For text columns this is the share of values whose length equals the most
//! common length. Other columns fall back to the share of non-missing rows.

use std::collections::BTreeMap;

use polars::prelude::{AnyValue, Column, DataFrame, DataType};

use fuel_common::{any_to_string, is_missing};

use super::fraction;

pub fn consistency(df: &DataFrame) -> BTreeMap<String, f64> {
    let mut scores = BTreeMap::new();
    if df.height() == 0 {
        return scores;
    }
    for column in df.get_columns() {
        let score = if column.dtype() == &DataType::String {
            text_consistency(column, df.height())
        } else {
            let present = (0..df.height())
                .filter(|&idx| !is_missing(&column.get(idx).unwrap_or(AnyValue::Null)))
                .count();
            fraction(present, df)
        };
        scores.insert(column.name().to_string(), score);
    }
    scores
}

fn text_consistency(column: &Column, height: usize) -> f64 {
    let mut lengths: BTreeMap<usize, usize> = BTreeMap::new();
    let mut present = 0usize;
    for idx in 0..height {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        if is_missing(&value) {
            continue;
        }
        present += 1;
        *lengths.entry(any_to_string(value).chars().count()).or_insert(0) += 1;
    }
    if present == 0 {
        return 1.0;
    }
    // Ascending iteration keeps the shorter length on ties.
    let mut modal = 0usize;
    for &count in lengths.values() {
        if count > modal {
            modal = count;
        }
    }
    modal as f64 / present as f64
}
