//! Ethanol viability, diesel comparison, category analysis and price elasticity.

use polars::prelude::{DataFrame, DataType, IntoColumn, NamedFrom, Series, col, lit};

use fuel_common::{f64_column, i64_column, set_bool_column, set_f64_column, string_column};
use fuel_model::columns::{
    ANO, BANDEIRA_NORMALIZADA, CATEGORIA_PRODUTO, ESTADO, MARGEM_PERCENTUAL, MES,
    PRODUTO_NORMALIZADO, REGIAO_NORMALIZADA, VALOR_VENDA,
};
use fuel_model::products::{ETHANOL, REFERENCE_GASOLINE};

use crate::aggregate::{Stat, filter_by, group_len, grouped, require, round_columns, stat, stat_name};
use crate::error::Result;
use crate::stats::{group_indices, pearson, round_to};
use crate::table::{AnalyticsTable, Category};

pub const REQUIRED: [&str; 9] = [
    ESTADO,
    ANO,
    MES,
    PRODUTO_NORMALIZADO,
    REGIAO_NORMALIZADA,
    BANDEIRA_NORMALIZADA,
    CATEGORIA_PRODUTO,
    VALOR_VENDA,
    MARGEM_PERCENTUAL,
];

pub const RATIO: &str = "ratio_etanol_gasolina";
pub const VIABLE: &str = "etanol_viavel";

/// Months of data a product needs before its elasticity is reported.
const MIN_ELASTICITY_PERIODS: usize = 4;

pub fn product_tables(df: &DataFrame, viability_threshold: f64) -> Result<Vec<AnalyticsTable>> {
    require(df, Category::Product, &REQUIRED)?;
    let mut tables = Vec::new();

    let history = ethanol_ratio_history(df, viability_threshold)?;
    if history.height() > 0 {
        tables.push(AnalyticsTable::new(
            Category::Product,
            "viabilidade_etanol",
            ethanol_viability(&history)?,
        ));
        tables.push(AnalyticsTable::new(
            Category::Product,
            "historico_ratio_etanol_gasolina",
            history,
        ));
    }

    let diesel = diesel_comparison(df)?;
    if diesel.height() > 0 {
        tables.push(AnalyticsTable::new(Category::Product, "comparacao_diesel", diesel));
    }

    tables.push(AnalyticsTable::new(
        Category::Product,
        "analise_categorias",
        category_analysis(df)?,
    ));

    let elasticity = price_elasticity(df)?;
    if elasticity.height() > 0 {
        tables.push(AnalyticsTable::new(
            Category::Product,
            "elasticidade_precos",
            elasticity,
        ));
    }
    Ok(tables)
}

/// Mean ethanol and reference gasoline prices per state and month, with
/// their ratio. Months missing either product have no ratio.
pub fn ethanol_ratio_history(df: &DataFrame, threshold: f64) -> Result<DataFrame> {
    let pair = filter_by(df, PRODUTO_NORMALIZADO, |product| {
        product == ETHANOL || product == REFERENCE_GASOLINE
    })?;
    let price_of = |product: &str| {
        col(VALOR_VENDA)
            .filter(col(PRODUTO_NORMALIZADO).eq(lit(product)))
            .mean()
            .alias(product)
    };
    let mut out = grouped(
        &pair,
        &[ESTADO, ANO, MES],
        vec![price_of(ETHANOL), price_of(REFERENCE_GASOLINE)],
    )?;
    let ethanol = f64_column(&out, ETHANOL)?;
    let gasoline = f64_column(&out, REFERENCE_GASOLINE)?;
    let ratio: Vec<Option<f64>> = ethanol
        .iter()
        .zip(&gasoline)
        .map(|(e, g)| match (e, g) {
            (Some(e), Some(g)) if *g != 0.0 => Some(round_to(e / g, 3)),
            _ => None,
        })
        .collect();
    let viable = ratio.iter().map(|r| r.map(|r| r <= threshold)).collect();
    set_f64_column(&mut out, RATIO, ratio)?;
    set_bool_column(&mut out, VIABLE, viable)?;
    Ok(out)
}

/// Per-state ratio statistics and the share of months where ethanol paid off.
pub fn ethanol_viability(history: &DataFrame) -> Result<DataFrame> {
    let viable_sum = col(VIABLE)
        .cast(DataType::Int64)
        .sum()
        .alias(format!("{VIABLE}_sum"));
    let mut out = grouped(
        history,
        &[ESTADO],
        vec![
            stat(RATIO, Stat::Mean),
            stat(RATIO, Stat::Min),
            stat(RATIO, Stat::Max),
            viable_sum,
            stat(VIABLE, Stat::Count),
        ],
    )?;
    round_columns(&mut out, &[stat_name(RATIO, Stat::Mean)], 3)?;
    let sums = i64_column(&out, &format!("{VIABLE}_sum"))?;
    let counts = i64_column(&out, &stat_name(VIABLE, Stat::Count))?;
    let share = sums
        .iter()
        .zip(&counts)
        .map(|(sum, count)| match (sum, count) {
            (Some(sum), Some(count)) if *count > 0 => {
                Some(round_to(*sum as f64 / *count as f64 * 100.0, 1))
            }
            _ => None,
        })
        .collect();
    set_f64_column(&mut out, "percentual_viabilidade", share)?;
    Ok(out)
}

/// Diesel grades side by side per region.
pub fn diesel_comparison(df: &DataFrame) -> Result<DataFrame> {
    let diesel = filter_by(df, PRODUTO_NORMALIZADO, |product| product.contains("DIESEL"))?;
    let mut out = grouped(
        &diesel,
        &[PRODUTO_NORMALIZADO, REGIAO_NORMALIZADA],
        vec![
            stat(VALOR_VENDA, Stat::Mean),
            stat(VALOR_VENDA, Stat::Count),
            stat(MARGEM_PERCENTUAL, Stat::Mean),
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

/// Product category statistics per region.
pub fn category_analysis(df: &DataFrame) -> Result<DataFrame> {
    let mut out = grouped(
        df,
        &[CATEGORIA_PRODUTO, REGIAO_NORMALIZADA],
        vec![
            stat(VALOR_VENDA, Stat::Mean),
            stat(VALOR_VENDA, Stat::Std),
            stat(VALOR_VENDA, Stat::Count),
            stat(MARGEM_PERCENTUAL, Stat::Mean),
            stat(BANDEIRA_NORMALIZADA, Stat::NUnique).alias("num_bandeiras"),
        ],
    )?;
    round_columns(
        &mut out,
        &[
            stat_name(VALOR_VENDA, Stat::Mean),
            stat_name(VALOR_VENDA, Stat::Std),
            stat_name(MARGEM_PERCENTUAL, Stat::Mean),
        ],
        3,
    )?;
    Ok(out)
}

/// Correlation between monthly mean price and survey volume per product.
pub fn price_elasticity(df: &DataFrame) -> Result<DataFrame> {
    let monthly = grouped(
        df,
        &[PRODUTO_NORMALIZADO, ANO, MES],
        vec![stat(VALOR_VENDA, Stat::Mean), group_len("volume")],
    )?;
    let products = string_column(&monthly, PRODUTO_NORMALIZADO)?;
    let prices = f64_column(&monthly, &stat_name(VALOR_VENDA, Stat::Mean))?;
    let volumes = i64_column(&monthly, "volume")?;

    let mut product_col = Vec::new();
    let mut correlation_col = Vec::new();
    let mut periods_col = Vec::new();
    let mut mean_col = Vec::new();
    for (product, indices) in group_indices(&products) {
        let points: Vec<(f64, f64)> = indices
            .iter()
            .filter_map(|i| Some((prices[*i]?, volumes[*i]? as f64)))
            .collect();
        if points.len() < MIN_ELASTICITY_PERIODS {
            continue;
        }
        let (x, y): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
        product_col.push(product);
        correlation_col.push(pearson(&x, &y));
        periods_col.push(points.len() as i64);
        mean_col.push(x.iter().sum::<f64>() / x.len() as f64);
    }

    Ok(DataFrame::new(vec![
        Series::new(PRODUTO_NORMALIZADO.into(), product_col).into_column(),
        Series::new("correlacao_preco_volume".into(), correlation_col).into_column(),
        Series::new("periodos_analisados".into(), periods_col).into_column(),
        Series::new("preco_medio".into(), mean_col).into_column(),
    ])?)
}
