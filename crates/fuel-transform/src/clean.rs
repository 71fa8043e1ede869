//! Clean stage: dedupe, text standardization, price filtering and date parsing.

use std::collections::{BTreeMap, HashSet};

use polars::prelude::{DataFrame, DataType};
use serde::Serialize;
use tracing::{info, warn};

use fuel_common::{
    f64_column, filter_rows, has_column, parse_date, set_date_column, set_f64_column,
    set_string_column, string_column,
};
use fuel_model::columns;

use crate::error::{Result, TransformError};
use crate::stage::Stage;

#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Business keys for duplicate removal; keys absent from the table are ignored.
    pub dedupe_keys: Vec<String>,
    /// Text columns left untouched by trimming and uppercasing.
    pub preserve_case: Vec<String>,
    /// Price columns, filtered in order.
    pub price_columns: Vec<String>,
    pub outlier_sigma: f64,
    pub date_column: String,
    pub date_format: String,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            dedupe_keys: vec![
                columns::CNPJ.to_string(),
                columns::DATA_COLETA.to_string(),
                columns::PRODUTO.to_string(),
            ],
            preserve_case: vec![
                columns::BRONZE_LOAD_TIMESTAMP.to_string(),
                columns::DATA_COLETA_PARSED.to_string(),
            ],
            price_columns: vec![
                columns::VALOR_VENDA.to_string(),
                columns::VALOR_COMPRA.to_string(),
            ],
            outlier_sigma: 3.0,
            date_column: columns::DATA_COLETA.to_string(),
            date_format: columns::RAW_DATE_FORMAT.to_string(),
        }
    }
}

impl CleanOptions {
    #[must_use]
    pub fn with_dedupe_keys(mut self, keys: Vec<String>) -> Self {
        self.dedupe_keys = keys;
        self
    }

    #[must_use]
    pub fn with_outlier_sigma(mut self, sigma: f64) -> Self {
        self.outlier_sigma = sigma;
        self
    }
}

/// Row accounting for one clean run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanReport {
    pub input_rows: usize,
    pub duplicates_removed: usize,
    pub non_positive_removed: BTreeMap<String, usize>,
    pub outliers_removed: BTreeMap<String, usize>,
    pub invalid_dates_removed: usize,
    pub output_rows: usize,
}

/// Run the clean stage. Row-level problems drop rows; only an empty result fails.
pub fn clean(df: DataFrame, options: &CleanOptions) -> Result<(DataFrame, CleanReport)> {
    let mut report = CleanReport {
        input_rows: df.height(),
        ..CleanReport::default()
    };

    let mut df = drop_duplicates(df, &options.dedupe_keys)?;
    report.duplicates_removed = report.input_rows - df.height();
    if report.duplicates_removed > 0 {
        info!(removed = report.duplicates_removed, "duplicates removed");
    }

    standardize_text(&mut df, &options.preserve_case)?;

    for column in &options.price_columns {
        if !has_column(&df, column) {
            continue;
        }
        let (filtered, non_positive, outliers) =
            filter_prices(df, column, options.outlier_sigma)?;
        df = filtered;
        if non_positive > 0 {
            info!(column = %column, removed = non_positive, "missing or non-positive prices removed");
        }
        if outliers > 0 {
            info!(column = %column, removed = outliers, "outliers removed");
        }
        report.non_positive_removed.insert(column.clone(), non_positive);
        report.outliers_removed.insert(column.clone(), outliers);
    }

    if has_column(&df, &options.date_column) {
        let before = df.height();
        df = parse_dates(df, &options.date_column, &options.date_format)?;
        report.invalid_dates_removed = before - df.height();
        if report.invalid_dates_removed > 0 {
            warn!(
                removed = report.invalid_dates_removed,
                "rows with invalid collection dates removed"
            );
        }
    }

    report.output_rows = df.height();
    if df.height() == 0 {
        return Err(TransformError::NoValidRows {
            stage: Stage::Clean,
        });
    }
    info!(
        rows_in = report.input_rows,
        rows_out = report.output_rows,
        "clean complete"
    );
    Ok((df, report))
}

/// Keep the first row per key; order is preserved.
fn drop_duplicates(df: DataFrame, keys: &[String]) -> Result<DataFrame> {
    let mut key_columns = Vec::new();
    for key in keys {
        if has_column(&df, key) {
            key_columns.push(string_column(&df, key)?);
        }
    }
    if key_columns.is_empty() || df.height() == 0 {
        return Ok(df);
    }
    let mut seen: HashSet<Vec<Option<&str>>> = HashSet::with_capacity(df.height());
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let key: Vec<Option<&str>> = key_columns
            .iter()
            .map(|values| values[idx].as_deref())
            .collect();
        keep.push(seen.insert(key));
    }
    if keep.iter().all(|k| *k) {
        return Ok(df);
    }
    Ok(filter_rows(&df, &keep)?)
}

fn standardize_text(df: &mut DataFrame, preserve: &[String]) -> Result<()> {
    let targets: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|column| column.dtype() == &DataType::String)
        .map(|column| column.name().to_string())
        .filter(|name| !preserve.contains(name))
        .collect();
    for name in targets {
        let values: Vec<Option<String>> = df
            .column(&name)?
            .str()?
            .into_iter()
            .map(|value| value.map(|s| s.trim().to_uppercase()))
            .collect();
        set_string_column(df, &name, values)?;
    }
    Ok(())
}

/// Coerce a price column, drop missing/non-positive rows, then trim outliers
/// above `mean + sigma * std` in a single pass.
fn filter_prices(df: DataFrame, column: &str, sigma: f64) -> Result<(DataFrame, usize, usize)> {
    let mut df = df;
    let values = f64_column(&df, column)?;
    set_f64_column(&mut df, column, values.clone())?;

    let keep: Vec<bool> = values.iter().map(|v| v.is_some_and(|p| p > 0.0)).collect();
    let before = df.height();
    let positive: Vec<f64> = values.iter().flatten().copied().filter(|p| *p > 0.0).collect();
    let df = filter_rows(&df, &keep)?;
    let non_positive = before - df.height();

    let Some(threshold) = outlier_threshold(&positive, sigma) else {
        return Ok((df, non_positive, 0));
    };
    let keep: Vec<bool> = positive.iter().map(|p| *p <= threshold).collect();
    let before = df.height();
    let df = filter_rows(&df, &keep)?;
    let outliers = before - df.height();
    Ok((df, non_positive, outliers))
}

/// `mean + sigma * sample std`, undefined below two observations.
pub fn outlier_threshold(values: &[f64], sigma: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(mean + sigma * variance.sqrt())
}

fn parse_dates(df: DataFrame, column: &str, format: &str) -> Result<DataFrame> {
    let mut df = df;
    let dates: Vec<_> = string_column(&df, column)?
        .into_iter()
        .map(|value| value.and_then(|raw| parse_date(&raw, format)))
        .collect();
    set_date_column(&mut df, columns::DATA_COLETA_PARSED, &dates)?;
    let keep: Vec<bool> = dates.iter().map(Option::is_some).collect();
    if keep.iter().all(|k| *k) {
        return Ok(df);
    }
    Ok(filter_rows(&df, &keep)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_needs_two_values() {
        assert_eq!(outlier_threshold(&[], 3.0), None);
        assert_eq!(outlier_threshold(&[4.0], 3.0), None);
    }

    #[test]
    fn threshold_uses_sample_std() {
        // mean 2, sample std 1
        let threshold = outlier_threshold(&[1.0, 2.0, 3.0], 3.0).unwrap();
        assert!((threshold - 5.0).abs() < 1e-12);
    }
}
