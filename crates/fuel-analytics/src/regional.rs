//! State rankings and regional price comparisons.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

use fuel_common::{f64_column, set_f64_column, set_string_column, string_column};
use fuel_model::columns::{
    ESTADO, MARGEM_PERCENTUAL, PRODUTO_NORMALIZADO, REGIAO_NORMALIZADA, VALOR_COMPRA, VALOR_VENDA,
};

use crate::aggregate::{Stat, grouped, require, round_columns, stat, stat_name};
use crate::error::Result;
use crate::stats::{group_indices, ranks_within, round_to};
use crate::table::{AnalyticsTable, Category};

pub const REQUIRED: [&str; 6] = [
    ESTADO,
    REGIAO_NORMALIZADA,
    PRODUTO_NORMALIZADO,
    VALOR_VENDA,
    VALOR_COMPRA,
    MARGEM_PERCENTUAL,
];

pub const CHEAPEST: &str = "MAIS_BARATA";
pub const PRICIEST: &str = "MAIS_CARA";
pub const INTERMEDIATE: &str = "INTERMEDIARIA";

pub fn regional_tables(df: &DataFrame) -> Result<Vec<AnalyticsTable>> {
    require(df, Category::Regional, &REQUIRED)?;
    let regional = regional_analysis(df)?;
    let disparity = regional_disparity(&regional)?;
    Ok(vec![
        AnalyticsTable::new(Category::Regional, "ranking_estados", state_ranking(df)?),
        AnalyticsTable::new(Category::Regional, "analise_regional", regional),
        AnalyticsTable::new(Category::Regional, "disparidade_regional", disparity),
    ])
}

/// Mean price per state and product, ranked ascending within each product.
pub fn state_ranking(df: &DataFrame) -> Result<DataFrame> {
    let mut out = grouped(
        df,
        &[ESTADO, PRODUTO_NORMALIZADO],
        vec![
            stat(VALOR_VENDA, Stat::Mean),
            stat(VALOR_VENDA, Stat::Median),
            stat(VALOR_VENDA, Stat::Count),
            stat(MARGEM_PERCENTUAL, Stat::Mean),
        ],
    )?;
    let mean_name = stat_name(VALOR_VENDA, Stat::Mean);
    round_columns(
        &mut out,
        &[
            mean_name.clone(),
            stat_name(VALOR_VENDA, Stat::Median),
            stat_name(MARGEM_PERCENTUAL, Stat::Mean),
        ],
        3,
    )?;
    let ranks = ranks_within(
        &string_column(&out, PRODUTO_NORMALIZADO)?,
        &f64_column(&out, &mean_name)?,
        true,
    );
    set_f64_column(&mut out, "ranking_preco", ranks)?;
    Ok(out)
}

/// Region × product statistics with the cheapest and priciest region marked.
pub fn regional_analysis(df: &DataFrame) -> Result<DataFrame> {
    let mut out = grouped(
        df,
        &[REGIAO_NORMALIZADA, PRODUTO_NORMALIZADO],
        vec![
            stat(VALOR_VENDA, Stat::Mean),
            stat(VALOR_VENDA, Stat::Median),
            stat(VALOR_VENDA, Stat::Std),
            stat(VALOR_VENDA, Stat::Count),
            stat(MARGEM_PERCENTUAL, Stat::Mean),
            stat(MARGEM_PERCENTUAL, Stat::Std),
            stat(VALOR_COMPRA, Stat::Mean),
        ],
    )?;
    let mean_name = stat_name(VALOR_VENDA, Stat::Mean);
    round_columns(
        &mut out,
        &[
            mean_name.clone(),
            stat_name(VALOR_VENDA, Stat::Median),
            stat_name(VALOR_VENDA, Stat::Std),
            stat_name(MARGEM_PERCENTUAL, Stat::Mean),
            stat_name(MARGEM_PERCENTUAL, Stat::Std),
            stat_name(VALOR_COMPRA, Stat::Mean),
        ],
        3,
    )?;
    let products = string_column(&out, PRODUTO_NORMALIZADO)?;
    let means = f64_column(&out, &mean_name)?;
    let mut labels = vec![Some(INTERMEDIATE.to_string()); out.height()];
    for (_, indices) in group_indices(&products) {
        let present: Vec<(usize, f64)> = indices
            .iter()
            .filter_map(|i| means[*i].map(|m| (*i, m)))
            .collect();
        // First occurrence wins on ties; the priciest label overrides a lone row.
        let cheapest = present
            .iter()
            .fold(None, |best: Option<(usize, f64)>, (i, m)| match best {
                Some((_, b)) if b <= *m => best,
                _ => Some((*i, *m)),
            });
        let priciest = present
            .iter()
            .fold(None, |best: Option<(usize, f64)>, (i, m)| match best {
                Some((_, b)) if b >= *m => best,
                _ => Some((*i, *m)),
            });
        if let Some((idx, _)) = cheapest {
            labels[idx] = Some(CHEAPEST.to_string());
        }
        if let Some((idx, _)) = priciest {
            labels[idx] = Some(PRICIEST.to_string());
        }
    }
    set_string_column(&mut out, "classificacao", labels)?;
    Ok(out)
}

/// Spread of regional mean prices per product, for products sold in more than one region.
pub fn regional_disparity(regional: &DataFrame) -> Result<DataFrame> {
    let products = string_column(regional, PRODUTO_NORMALIZADO)?;
    let regions = string_column(regional, REGIAO_NORMALIZADA)?;
    let means = f64_column(regional, &stat_name(VALOR_VENDA, Stat::Mean))?;

    let mut product_col = Vec::new();
    let mut cv_col = Vec::new();
    let mut amplitude_col = Vec::new();
    let mut priciest_col = Vec::new();
    let mut cheapest_col = Vec::new();
    for (product, indices) in group_indices(&products) {
        let values: Vec<(f64, &str)> = indices
            .iter()
            .filter_map(|i| Some((means[*i].filter(|m| *m > 0.0)?, regions[*i].as_deref()?)))
            .collect();
        if values.len() < 2 {
            continue;
        }
        let n = values.len() as f64;
        let mean = values.iter().map(|(v, _)| v).sum::<f64>() / n;
        let variance = values.iter().map(|(v, _)| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let (min, min_region) = values
            .iter()
            .copied()
            .fold(values[0], |acc, item| if item.0 < acc.0 { item } else { acc });
        let (max, max_region) = values
            .iter()
            .copied()
            .fold(values[0], |acc, item| if item.0 > acc.0 { item } else { acc });
        product_col.push(product);
        cv_col.push(round_to(variance.sqrt() / mean * 100.0, 3));
        amplitude_col.push(round_to((max - min) / min * 100.0, 3));
        priciest_col.push(max_region.to_string());
        cheapest_col.push(min_region.to_string());
    }

    Ok(DataFrame::new(vec![
        Series::new(PRODUTO_NORMALIZADO.into(), product_col).into_column(),
        Series::new("coef_variacao".into(), cv_col).into_column(),
        Series::new("amplitude_percentual".into(), amplitude_col).into_column(),
        Series::new("regiao_mais_cara".into(), priciest_col).into_column(),
        Series::new("regiao_mais_barata".into(), cheapest_col).into_column(),
    ])?)
}
