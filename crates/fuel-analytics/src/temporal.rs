//! Price evolution, seasonality, yearly trends and volatility.

use chrono::NaiveDate;
use polars::prelude::DataFrame;

use fuel_common::{f64_column, i64_column, set_date_column, set_f64_column, string_column};
use fuel_model::columns::{ANO, MARGEM_PERCENTUAL, MES, PRODUTO_NORMALIZADO, VALOR_VENDA};

use crate::aggregate::{Stat, grouped, require, round_columns, stat, stat_name};
use crate::error::Result;
use crate::stats::{group_indices, pct_change};
use crate::table::{AnalyticsTable, Category};

pub const REQUIRED: [&str; 5] = [ANO, MES, PRODUTO_NORMALIZADO, VALOR_VENDA, MARGEM_PERCENTUAL];

pub fn temporal_tables(df: &DataFrame) -> Result<Vec<AnalyticsTable>> {
    require(df, Category::Temporal, &REQUIRED)?;
    Ok(vec![
        AnalyticsTable::new(Category::Temporal, "evolucao_mensal_precos", monthly_evolution(df)?),
        AnalyticsTable::new(Category::Temporal, "sazonalidade", seasonality(df)?),
        AnalyticsTable::new(Category::Temporal, "tendencias_anuais", yearly_trends(df)?),
        AnalyticsTable::new(Category::Temporal, "volatilidade_precos", volatility(df)?),
    ])
}

/// Monthly price statistics per product, with a `periodo` date on the 1st.
pub fn monthly_evolution(df: &DataFrame) -> Result<DataFrame> {
    let mut out = grouped(
        df,
        &[ANO, MES, PRODUTO_NORMALIZADO],
        vec![
            stat(VALOR_VENDA, Stat::Mean),
            stat(VALOR_VENDA, Stat::Median),
            stat(VALOR_VENDA, Stat::Min),
            stat(VALOR_VENDA, Stat::Max),
            stat(VALOR_VENDA, Stat::Count),
            stat(MARGEM_PERCENTUAL, Stat::Mean),
            stat(MARGEM_PERCENTUAL, Stat::Median),
        ],
    )?;
    round_columns(
        &mut out,
        &[
            stat_name(VALOR_VENDA, Stat::Mean),
            stat_name(VALOR_VENDA, Stat::Median),
            stat_name(MARGEM_PERCENTUAL, Stat::Mean),
            stat_name(MARGEM_PERCENTUAL, Stat::Median),
        ],
        3,
    )?;
    let periods: Vec<Option<NaiveDate>> = i64_column(&out, ANO)?
        .into_iter()
        .zip(i64_column(&out, MES)?)
        .map(|(year, month)| {
            let year = i32::try_from(year?).ok()?;
            let month = u32::try_from(month?).ok()?;
            NaiveDate::from_ymd_opt(year, month, 1)
        })
        .collect();
    set_date_column(&mut out, "periodo", &periods)?;
    Ok(out)
}

/// Calendar-month statistics per product; `coef_variacao` is std over mean.
pub fn seasonality(df: &DataFrame) -> Result<DataFrame> {
    let mut out = grouped(
        df,
        &[MES, PRODUTO_NORMALIZADO],
        vec![
            stat(VALOR_VENDA, Stat::Mean),
            stat(VALOR_VENDA, Stat::Std),
            stat(MARGEM_PERCENTUAL, Stat::Mean),
        ],
    )?;
    let mean_name = stat_name(VALOR_VENDA, Stat::Mean);
    let std_name = stat_name(VALOR_VENDA, Stat::Std);
    round_columns(
        &mut out,
        &[
            mean_name.clone(),
            std_name.clone(),
            stat_name(MARGEM_PERCENTUAL, Stat::Mean),
        ],
        3,
    )?;
    let cv = f64_column(&out, &std_name)?
        .into_iter()
        .zip(f64_column(&out, &mean_name)?)
        .map(|(std, mean)| match (std, mean) {
            (Some(std), Some(mean)) if mean != 0.0 => Some(std / mean),
            _ => None,
        })
        .collect();
    set_f64_column(&mut out, "coef_variacao", cv)?;
    Ok(out)
}

/// Yearly statistics per product with year-over-year growth of the mean price.
pub fn yearly_trends(df: &DataFrame) -> Result<DataFrame> {
    let mut out = grouped(
        df,
        &[PRODUTO_NORMALIZADO, ANO],
        vec![
            stat(VALOR_VENDA, Stat::Mean),
            stat(VALOR_VENDA, Stat::Count),
            stat(MARGEM_PERCENTUAL, Stat::Mean),
        ],
    )?;
    let mean_name = stat_name(VALOR_VENDA, Stat::Mean);
    round_columns(
        &mut out,
        &[mean_name.clone(), stat_name(MARGEM_PERCENTUAL, Stat::Mean)],
        3,
    )?;
    // Rows are sorted by product then year, so each product's rows are contiguous.
    let products = string_column(&out, PRODUTO_NORMALIZADO)?;
    let means = f64_column(&out, &mean_name)?;
    let mut growth = vec![None; out.height()];
    for (_, indices) in group_indices(&products) {
        let series: Vec<Option<f64>> = indices.iter().map(|i| means[*i]).collect();
        for (idx, change) in indices.iter().zip(pct_change(&series)) {
            growth[*idx] = change;
        }
    }
    set_f64_column(&mut out, "crescimento_percentual", growth)?;
    Ok(out)
}

/// Monthly price dispersion per product.
pub fn volatility(df: &DataFrame) -> Result<DataFrame> {
    let mut out = grouped(
        df,
        &[ANO, MES, PRODUTO_NORMALIZADO],
        vec![
            stat(VALOR_VENDA, Stat::Std),
            stat(VALOR_VENDA, Stat::Min),
            stat(VALOR_VENDA, Stat::Max),
        ],
    )?;
    let std_name = stat_name(VALOR_VENDA, Stat::Std);
    round_columns(&mut out, std::slice::from_ref(&std_name), 3)?;
    let std = f64_column(&out, &std_name)?;
    let min = f64_column(&out, &stat_name(VALOR_VENDA, Stat::Min))?;
    let max = f64_column(&out, &stat_name(VALOR_VENDA, Stat::Max))?;
    let amplitude = min
        .iter()
        .zip(&max)
        .map(|(lo, hi)| Some((*hi)? - (*lo)?))
        .collect();
    let relative = std
        .iter()
        .zip(&max)
        .map(|(std, hi)| match (std, hi) {
            (Some(std), Some(hi)) if *hi != 0.0 => Some(std / hi * 100.0),
            _ => None,
        })
        .collect();
    set_f64_column(&mut out, "amplitude", amplitude)?;
    set_f64_column(&mut out, "volatilidade_relativa", relative)?;
    Ok(out)
}
