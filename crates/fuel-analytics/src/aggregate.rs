//! Grouped aggregation helpers shared by every category.

use polars::prelude::{
    DataFrame, Expr, IntoLazy, SortMultipleOptions, col, len,
};

use fuel_common::{f64_column, filter_rows, missing_columns, set_f64_column, string_column};

use crate::error::{AnalyticsError, Result};
use crate::stats::round_to;
use crate::table::Category;

/// Aggregate statistics, named `{column}_{suffix}` in output tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Mean,
    Median,
    Std,
    Min,
    Max,
    Count,
    NUnique,
}

impl Stat {
    pub fn suffix(self) -> &'static str {
        match self {
            Stat::Mean => "mean",
            Stat::Median => "median",
            Stat::Std => "std",
            Stat::Min => "min",
            Stat::Max => "max",
            Stat::Count => "count",
            Stat::NUnique => "nunique",
        }
    }
}

pub fn stat_name(column: &str, stat: Stat) -> String {
    format!("{column}_{}", stat.suffix())
}

/// Aggregation expression for `stat` over `column`. Std is the sample deviation.
pub fn stat(column: &str, stat: Stat) -> Expr {
    let expr = col(column);
    let expr = match stat {
        Stat::Mean => expr.mean(),
        Stat::Median => expr.median(),
        Stat::Std => expr.std(1),
        Stat::Min => expr.min(),
        Stat::Max => expr.max(),
        Stat::Count => expr.count(),
        Stat::NUnique => expr.n_unique(),
    };
    expr.alias(stat_name(column, stat))
}

/// Row count per group.
pub fn group_len(alias: &str) -> Expr {
    len().alias(alias)
}

/// Group by `keys`, aggregate, and sort by the keys.
pub fn grouped(df: &DataFrame, keys: &[&str], aggs: Vec<Expr>) -> Result<DataFrame> {
    let key_exprs: Vec<Expr> = keys.iter().map(|key| col(*key)).collect();
    let out = df
        .clone()
        .lazy()
        .group_by(key_exprs)
        .agg(aggs)
        .sort(keys.to_vec(), SortMultipleOptions::default())
        .collect()?;
    Ok(out)
}

/// Round the named float columns in place; absent columns are skipped.
pub fn round_columns(df: &mut DataFrame, names: &[String], decimals: i32) -> Result<()> {
    for name in names {
        if df.column(name).is_err() {
            continue;
        }
        let rounded = f64_column(df, name)?
            .into_iter()
            .map(|value| value.map(|v| round_to(v, decimals)))
            .collect();
        set_f64_column(df, name, rounded)?;
    }
    Ok(())
}

/// Fail with the missing names when `df` lacks any of `columns`.
pub fn require(df: &DataFrame, category: Category, columns: &[&str]) -> Result<()> {
    let missing = missing_columns(df, columns);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AnalyticsError::MissingColumns { category, missing })
    }
}

/// Rows whose `column` value satisfies `keep`.
pub fn filter_by<F>(df: &DataFrame, column: &str, keep: F) -> Result<DataFrame>
where
    F: Fn(&str) -> bool,
{
    let mask: Vec<bool> = string_column(df, column)?
        .iter()
        .map(|value| value.as_deref().is_some_and(&keep))
        .collect();
    Ok(filter_rows(df, &mask)?)
}
