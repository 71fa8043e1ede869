//! Shared utilities for the fuel price lake crates.
//!
//! This crate provides Polars `AnyValue` conversions, date helpers and the
//! small set of column accessors every layer uses.

pub mod dates;
pub mod frame;
pub mod polars;

pub use dates::{date_from_days, days_from_date, parse_date};
pub use frame::{
    date_column, f64_column, filter_rows, has_column, i64_column, missing_columns,
    set_bool_column, set_date_column, set_f64_column, set_i64_column, set_string_column,
    string_column,
};
pub use polars::{any_to_f64, any_to_i64, any_to_string, format_numeric, is_missing, parse_f64};
