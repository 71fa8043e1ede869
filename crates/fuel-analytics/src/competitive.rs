//! Brand market share, price positioning and the major-brand comparison.

use polars::prelude::DataFrame;

use fuel_common::{f64_column, i64_column, set_f64_column, set_string_column, string_column};
use fuel_model::columns::{
    BANDEIRA_NORMALIZADA, MARGEM_PERCENTUAL, PRODUTO_NORMALIZADO, REGIAO_NORMALIZADA, VALOR_VENDA,
};

use crate::aggregate::{Stat, filter_by, group_len, grouped, require, round_columns, stat, stat_name};
use crate::error::Result;
use crate::stats::{group_indices, quantile, ranks_within, round_to};
use crate::table::{AnalyticsTable, Category};

pub const REQUIRED: [&str; 5] = [
    BANDEIRA_NORMALIZADA,
    PRODUTO_NORMALIZADO,
    REGIAO_NORMALIZADA,
    VALOR_VENDA,
    MARGEM_PERCENTUAL,
];

pub const ECONOMY: &str = "ECONOMICA";
pub const MIDDLE: &str = "MEDIA";
pub const PREMIUM: &str = "PREMIUM";

/// `major_brands` selects the rows of the major-brand table, which is omitted
/// when no row matches.
pub fn competitive_tables(df: &DataFrame, major_brands: &[String]) -> Result<Vec<AnalyticsTable>> {
    require(df, Category::Competitive, &REQUIRED)?;
    let mut tables = vec![
        AnalyticsTable::new(Category::Competitive, "market_share_bandeiras", market_share(df)?),
        AnalyticsTable::new(
            Category::Competitive,
            "posicionamento_bandeiras",
            brand_positioning(df)?,
        ),
    ];
    let majors = major_brand_competitiveness(df, major_brands)?;
    if majors.height() > 0 {
        tables.push(AnalyticsTable::new(
            Category::Competitive,
            "competitividade_grandes_bandeiras",
            majors,
        ));
    }
    Ok(tables)
}

/// Share of survey points per brand within each product, ranked descending.
pub fn market_share(df: &DataFrame) -> Result<DataFrame> {
    let mut out = grouped(
        df,
        &[BANDEIRA_NORMALIZADA, PRODUTO_NORMALIZADO],
        vec![group_len("num_pontos")],
    )?;
    let products = string_column(&out, PRODUTO_NORMALIZADO)?;
    let points = i64_column(&out, "num_pontos")?;
    let mut share = vec![None; out.height()];
    for (_, indices) in group_indices(&products) {
        let total: i64 = indices.iter().filter_map(|i| points[*i]).sum();
        if total == 0 {
            continue;
        }
        for idx in indices {
            share[idx] = points[idx].map(|p| round_to(p as f64 / total as f64 * 100.0, 2));
        }
    }
    let ranks = ranks_within(&products, &share, false);
    set_f64_column(&mut out, "market_share_pct", share)?;
    set_f64_column(&mut out, "ranking_market_share", ranks)?;
    Ok(out)
}

/// Price strategy per brand: mean price at or below the product's 33rd
/// percentile is economy, above the 67th is premium.
pub fn brand_positioning(df: &DataFrame) -> Result<DataFrame> {
    let mut out = grouped(
        df,
        &[BANDEIRA_NORMALIZADA, PRODUTO_NORMALIZADO],
        vec![
            stat(VALOR_VENDA, Stat::Mean),
            stat(VALOR_VENDA, Stat::Std),
            stat(VALOR_VENDA, Stat::Count),
            stat(MARGEM_PERCENTUAL, Stat::Mean),
        ],
    )?;
    let mean_name = stat_name(VALOR_VENDA, Stat::Mean);
    round_columns(
        &mut out,
        &[
            mean_name.clone(),
            stat_name(VALOR_VENDA, Stat::Std),
            stat_name(MARGEM_PERCENTUAL, Stat::Mean),
        ],
        3,
    )?;
    let products = string_column(&out, PRODUTO_NORMALIZADO)?;
    let means = f64_column(&out, &mean_name)?;
    let mut strategy = vec![Some(MIDDLE.to_string()); out.height()];
    for (_, indices) in group_indices(&products) {
        let values: Vec<f64> = indices.iter().filter_map(|i| means[*i]).collect();
        let (Some(q33), Some(q67)) = (quantile(&values, 0.33), quantile(&values, 0.67)) else {
            continue;
        };
        for idx in indices {
            if let Some(mean) = means[idx] {
                strategy[idx] = Some(price_strategy(mean, q33, q67).to_string());
            }
        }
    }
    set_string_column(&mut out, "estrategia_preco", strategy)?;
    Ok(out)
}

pub fn price_strategy(mean: f64, q33: f64, q67: f64) -> &'static str {
    if mean <= q33 {
        ECONOMY
    } else if mean <= q67 {
        MIDDLE
    } else {
        PREMIUM
    }
}

/// Price, margin and regional presence of the major brands.
pub fn major_brand_competitiveness(df: &DataFrame, major_brands: &[String]) -> Result<DataFrame> {
    let majors = filter_by(df, BANDEIRA_NORMALIZADA, |brand| {
        major_brands.iter().any(|major| major == brand)
    })?;
    let mut out = grouped(
        &majors,
        &[BANDEIRA_NORMALIZADA, PRODUTO_NORMALIZADO],
        vec![
            stat(VALOR_VENDA, Stat::Mean),
            stat(VALOR_VENDA, Stat::Count),
            stat(MARGEM_PERCENTUAL, Stat::Mean),
            stat(REGIAO_NORMALIZADA, Stat::NUnique).alias("presenca_regional"),
        ],
    )?;
    round_columns(
        &mut out,
        &[
            stat_name(VALOR_VENDA, Stat::Mean),
            stat_name(MARGEM_PERCENTUAL, Stat::Mean),
        ],
        3,
    )?;
    Ok(out)
}
