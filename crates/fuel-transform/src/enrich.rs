//! Enrich stage: calendar fields, margins, classifications and ethanol viability.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use polars::prelude::DataFrame;
use tracing::info;

use fuel_common::{
    date_column, f64_column, missing_columns, set_bool_column, set_f64_column, set_i64_column,
    set_string_column, string_column,
};
use fuel_model::products::{ETHANOL, REFERENCE_GASOLINE};
use fuel_model::{AnalyticsConfig, columns};

use crate::error::{Result, TransformError};
use crate::stage::Stage;

/// Columns enrich derives from.
pub const ENRICH_INPUTS: [&str; 6] = [
    columns::DATA_COLETA_PARSED,
    columns::VALOR_VENDA,
    columns::VALOR_COMPRA,
    columns::PRODUTO_NORMALIZADO,
    columns::BANDEIRA_NORMALIZADA,
    columns::ESTADO,
];

/// Ordered keyword → category table; the first keyword found wins.
const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("GASOLINA", "COMBUSTIVEL_LIQUIDO"),
    ("ETANOL", "COMBUSTIVEL_RENOVAVEL"),
    ("ALCOOL", "COMBUSTIVEL_RENOVAVEL"),
    ("DIESEL", "COMBUSTIVEL_DIESEL"),
    ("GNV", "COMBUSTIVEL_GASOSO"),
    ("GLP", "GAS_COZINHA"),
];
const OTHER_CATEGORY: &str = "OUTROS";

/// Upper bounds (inclusive) of each price bucket.
const PRICE_BUCKETS: &[(f64, &str)] = &[
    (2.0, "MUITO_BAIXO"),
    (4.0, "BAIXO"),
    (6.0, "MEDIO"),
    (8.0, "ALTO"),
];
const TOP_BUCKET: &str = "MUITO_ALTO";

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    pub ethanol_viability_threshold: f64,
    pub major_brands: Vec<String>,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self::from(&AnalyticsConfig::default())
    }
}

impl From<&AnalyticsConfig> for EnrichOptions {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            ethanol_viability_threshold: config.ethanol_viability_threshold,
            major_brands: config.major_brands.clone(),
        }
    }
}

pub fn product_category(product: Option<&str>) -> &'static str {
    let Some(product) = product else {
        return OTHER_CATEGORY;
    };
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| product.contains(keyword))
        .map_or(OTHER_CATEGORY, |(_, category)| *category)
}

/// Bucket for a sale price; negative prices have none.
pub fn price_bucket(price: f64) -> Option<&'static str> {
    if price < 0.0 || price.is_nan() {
        return None;
    }
    let bucket = PRICE_BUCKETS
        .iter()
        .find(|(upper, _)| price <= *upper)
        .map_or(TOP_BUCKET, |(_, label)| *label);
    Some(bucket)
}

/// Percentage margin over the purchase price.
pub fn margin_percent(sale: f64, purchase: f64) -> Option<f64> {
    if purchase == 0.0 {
        return None;
    }
    Some((sale - purchase) / purchase * 100.0)
}

/// Mean reference gasoline price per (state, date).
#[derive(Debug, Default)]
pub struct GasolineIndex {
    sums: HashMap<(String, NaiveDate), (f64, usize)>,
}

impl GasolineIndex {
    pub fn build(
        states: &[Option<String>],
        dates: &[Option<NaiveDate>],
        products: &[Option<String>],
        prices: &[Option<f64>],
    ) -> Self {
        let mut sums: HashMap<(String, NaiveDate), (f64, usize)> = HashMap::new();
        for idx in 0..products.len() {
            if products[idx].as_deref() != Some(REFERENCE_GASOLINE) {
                continue;
            }
            let (Some(state), Some(date), Some(price)) = (&states[idx], dates[idx], prices[idx])
            else {
                continue;
            };
            let entry = sums.entry((state.clone(), date)).or_insert((0.0, 0));
            entry.0 += price;
            entry.1 += 1;
        }
        Self { sums }
    }

    pub fn mean(&self, state: &str, date: NaiveDate) -> Option<f64> {
        self.sums
            .get(&(state.to_string(), date))
            .map(|(sum, count)| sum / *count as f64)
    }

    pub fn len(&self) -> usize {
        self.sums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }
}

/// Run the enrich stage. Any missing input column aborts before any column is added.
pub fn enrich(df: DataFrame, options: &EnrichOptions) -> Result<DataFrame> {
    let missing = missing_columns(&df, &ENRICH_INPUTS);
    if !missing.is_empty() {
        return Err(TransformError::Precondition {
            stage: Stage::Enrich,
            missing,
        });
    }
    let mut df = df;
    let dates = date_column(&df, columns::DATA_COLETA_PARSED)?;
    let sales = f64_column(&df, columns::VALOR_VENDA)?;
    let purchases = f64_column(&df, columns::VALOR_COMPRA)?;
    let products = string_column(&df, columns::PRODUTO_NORMALIZADO)?;
    let brands = string_column(&df, columns::BANDEIRA_NORMALIZADA)?;
    let states = string_column(&df, columns::ESTADO)?;

    add_calendar_fields(&mut df, &dates)?;

    let margin_abs: Vec<Option<f64>> = sales
        .iter()
        .zip(&purchases)
        .map(|(sale, purchase)| Some((*sale)? - (*purchase)?))
        .collect();
    let margin_pct: Vec<Option<f64>> = sales
        .iter()
        .zip(&purchases)
        .map(|(sale, purchase)| margin_percent((*sale)?, (*purchase)?))
        .collect();
    set_f64_column(&mut df, columns::MARGEM_ABSOLUTA, margin_abs)?;
    set_f64_column(&mut df, columns::MARGEM_PERCENTUAL, margin_pct)?;

    let categories = products
        .iter()
        .map(|product| Some(product_category(product.as_deref()).to_string()))
        .collect();
    set_string_column(&mut df, columns::CATEGORIA_PRODUTO, categories)?;

    let brand_types = brands
        .iter()
        .map(|brand| {
            let major = brand
                .as_deref()
                .is_some_and(|b| options.major_brands.iter().any(|m| m == b));
            Some(if major { "GRANDE" } else { "REGIONAL" }.to_string())
        })
        .collect();
    set_string_column(&mut df, columns::TIPO_BANDEIRA, brand_types)?;

    let index = GasolineIndex::build(&states, &dates, &products, &sales);
    let viability: Vec<Option<bool>> = (0..df.height())
        .map(|idx| {
            if products[idx].as_deref() != Some(ETHANOL) {
                return None;
            }
            let gasoline = index.mean(states[idx].as_deref()?, dates[idx]?)?;
            Some(sales[idx]? / gasoline <= options.ethanol_viability_threshold)
        })
        .collect();
    set_bool_column(&mut df, columns::ETANOL_VIAVEL, viability)?;

    let buckets = sales
        .iter()
        .map(|sale| sale.and_then(price_bucket).map(str::to_string))
        .collect();
    set_string_column(&mut df, columns::FAIXA_PRECO, buckets)?;

    info!(
        rows = df.height(),
        gasoline_keys = index.len(),
        "enrich complete"
    );
    Ok(df)
}

fn add_calendar_fields(df: &mut DataFrame, dates: &[Option<NaiveDate>]) -> Result<()> {
    let field = |f: fn(&NaiveDate) -> i64| -> Vec<Option<i64>> {
        dates.iter().map(|date| date.as_ref().map(f)).collect()
    };
    set_i64_column(df, columns::ANO_COLETA, field(|d| i64::from(d.year())))?;
    set_i64_column(df, columns::MES_COLETA, field(|d| i64::from(d.month())))?;
    set_i64_column(df, columns::TRIMESTRE, field(|d| i64::from((d.month() - 1) / 3 + 1)))?;
    set_i64_column(
        df,
        columns::SEMESTRE,
        field(|d| if d.month() <= 6 { 1 } else { 2 }),
    )?;
    set_i64_column(
        df,
        columns::DIA_SEMANA,
        field(|d| i64::from(d.weekday().num_days_from_monday())),
    )?;
    let names = dates
        .iter()
        .map(|date| date.map(|d| d.format("%B").to_string()))
        .collect();
    set_string_column(df, columns::NOME_MES, names)?;
    Ok(())
}
