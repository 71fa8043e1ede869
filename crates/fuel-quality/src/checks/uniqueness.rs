//! Row-set uniqueness over business keys.

use std::collections::HashSet;

use polars::prelude::{AnyValue, Column, DataFrame};

use fuel_common::{any_to_string, is_missing};

/// Distinct rows under the key projection divided by the row count.
///
/// Vacuously 1.0 for no keys or no rows; 0.0 when none of the keys exist.
/// Keys absent from the frame are ignored when at least one key exists.
pub fn uniqueness<S: AsRef<str>>(df: &DataFrame, key_columns: &[S]) -> f64 {
    if key_columns.is_empty() || df.height() == 0 {
        return 1.0;
    }
    let columns: Vec<&Column> = key_columns
        .iter()
        .filter_map(|name| df.column(name.as_ref()).ok())
        .collect();
    if columns.is_empty() {
        return 0.0;
    }
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(df.height());
    for idx in 0..df.height() {
        let key: Vec<Option<String>> = columns
            .iter()
            .map(|column| {
                let value = column.get(idx).unwrap_or(AnyValue::Null);
                if is_missing(&value) {
                    None
                } else {
                    Some(any_to_string(value))
                }
            })
            .collect();
        seen.insert(key);
    }
    seen.len() as f64 / df.height() as f64
}
