//! Column accessors over Polars data frames.

use chrono::NaiveDate;
use polars::prelude::{
    AnyValue, BooleanChunked, DataFrame, DataType, NamedFrom, NewChunkedArray, PolarsResult,
    Series,
};

use crate::dates::{date_from_days, days_from_date, parse_date};
use crate::polars::{any_to_f64, any_to_i64, any_to_string};

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Names from `required` that are not columns of `df`, in the given order.
pub fn missing_columns<S: AsRef<str>>(df: &DataFrame, required: &[S]) -> Vec<String> {
    required
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !has_column(df, name))
        .map(str::to_string)
        .collect()
}

/// Values of a column rendered as strings; nulls stay `None`.
pub fn string_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        if matches!(value, AnyValue::Null) {
            values.push(None);
        } else {
            values.push(Some(any_to_string(value)));
        }
    }
    Ok(values)
}

pub fn f64_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

pub fn i64_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_i64(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

/// Dates from a Date column, or from ISO `YYYY-MM-DD` strings.
pub fn date_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<NaiveDate>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let date = match column.get(idx).unwrap_or(AnyValue::Null) {
            AnyValue::Date(days) => date_from_days(days),
            AnyValue::String(s) => parse_date(s, "%Y-%m-%d"),
            AnyValue::StringOwned(s) => parse_date(&s, "%Y-%m-%d"),
            _ => None,
        };
        values.push(date);
    }
    Ok(values)
}

pub fn set_string_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<String>>,
) -> PolarsResult<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

pub fn set_f64_column(df: &mut DataFrame, name: &str, values: Vec<Option<f64>>) -> PolarsResult<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

pub fn set_i64_column(df: &mut DataFrame, name: &str, values: Vec<Option<i64>>) -> PolarsResult<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

pub fn set_bool_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<bool>>,
) -> PolarsResult<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

pub fn set_date_column(
    df: &mut DataFrame,
    name: &str,
    values: &[Option<NaiveDate>],
) -> PolarsResult<()> {
    let days: Vec<Option<i32>> = values.iter().map(|v| v.map(days_from_date)).collect();
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    df.with_column(series)?;
    Ok(())
}

/// Rows of `df` where `keep` is true, as a new frame.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> PolarsResult<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    df.filter(&mask)
}
