//! Normalize stage: controlled vocabularies for product, region and brand.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{info, warn};

use fuel_common::{has_column, missing_columns, set_string_column, string_column};
use fuel_model::{ColumnRule, ValidationRules, columns};

use crate::error::{Result, TransformError};
use crate::stage::Stage;

/// Raw product spelling to canonical product.
const PRODUCT_MAP: &[(&str, &str)] = &[
    ("GASOLINA", "GASOLINA COMUM"),
    ("GASOLINA COMUM", "GASOLINA COMUM"),
    ("GASOLINA ADITIVADA", "GASOLINA ADITIVADA"),
    ("ALCOOL", "ETANOL"),
    ("ETANOL", "ETANOL"),
    ("DIESEL", "ÓLEO DIESEL"),
    ("ÓLEO DIESEL", "ÓLEO DIESEL"),
    ("DIESEL S10", "ÓLEO DIESEL S10"),
    ("ÓLEO DIESEL S10", "ÓLEO DIESEL S10"),
    ("GNV", "GNV"),
    ("GLP", "GLP"),
];

/// Region code or spelling to canonical region.
const REGION_MAP: &[(&str, &str)] = &[
    ("N", "NORTE"),
    ("NORTE", "NORTE"),
    ("NE", "NORDESTE"),
    ("NORDESTE", "NORDESTE"),
    ("CO", "CENTRO-OESTE"),
    ("CENTRO-OESTE", "CENTRO-OESTE"),
    ("CENTRO OESTE", "CENTRO-OESTE"),
    ("SE", "SUDESTE"),
    ("SUDESTE", "SUDESTE"),
    ("S", "SUL"),
    ("SUL", "SUL"),
];

/// Brand tokens that denote an unbranded station.
const UNBRANDED_TOKENS: &[&str] = &["", "DA ESQUINA", "CONVENIENCIA"];
pub const UNBRANDED: &str = "BRANCA";

#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    /// Report unmapped product and region values instead of passing them silently.
    pub strict: bool,
}

impl NormalizeOptions {
    #[must_use]
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Values that fell outside the vocabularies (strict mode only).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeReport {
    pub unmapped_products: BTreeSet<String>,
    pub unmapped_regions: BTreeSet<String>,
}

impl NormalizeReport {
    pub fn has_unmapped(&self) -> bool {
        !self.unmapped_products.is_empty() || !self.unmapped_regions.is_empty()
    }
}

fn lookup(table: &[(&str, &'static str)], value: &str) -> Option<&'static str> {
    let key = value.trim().to_uppercase();
    table
        .iter()
        .find(|(raw, _)| *raw == key)
        .map(|(_, canonical)| *canonical)
}

/// Canonical product name; unknown values pass through.
pub fn normalize_product(value: &str) -> String {
    lookup(PRODUCT_MAP, value).map_or_else(|| value.to_string(), str::to_string)
}

/// Canonical region name; unknown values pass through.
pub fn normalize_region(value: &str) -> String {
    lookup(REGION_MAP, value).map_or_else(|| value.to_string(), str::to_string)
}

/// Brand with the `POSTO` token removed, or `BRANCA` for unbranded stations.
pub fn normalize_brand(value: &str) -> String {
    let mut brand = value.to_string();
    while brand.contains("POSTO") {
        brand = brand.replace("POSTO", "");
    }
    let brand = brand.trim();
    if UNBRANDED_TOKENS.contains(&brand) {
        UNBRANDED.to_string()
    } else {
        brand.to_string()
    }
}

pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Canonical product names.
pub fn canonical_products() -> BTreeSet<&'static str> {
    PRODUCT_MAP.iter().map(|(_, canonical)| *canonical).collect()
}

/// Canonical region names.
pub fn canonical_regions() -> BTreeSet<&'static str> {
    REGION_MAP.iter().map(|(_, canonical)| *canonical).collect()
}

/// Allowed-value rules over the normalized columns, for strict scoring.
pub fn vocabulary_rules() -> ValidationRules {
    let mut rules = ValidationRules::new();
    rules.insert(
        columns::PRODUTO_NORMALIZADO.to_string(),
        ColumnRule::values(canonical_products()),
    );
    rules.insert(
        columns::REGIAO_NORMALIZADA.to_string(),
        ColumnRule::values(canonical_regions()),
    );
    rules
}

/// Run the normalize stage.
pub fn normalize(df: DataFrame, options: &NormalizeOptions) -> Result<(DataFrame, NormalizeReport)> {
    let missing = missing_columns(&df, &[columns::PRODUTO, columns::REGIAO, columns::BANDEIRA]);
    if !missing.is_empty() {
        return Err(TransformError::Precondition {
            stage: Stage::Normalize,
            missing,
        });
    }
    let mut df = df;
    let mut report = NormalizeReport::default();

    let products = string_column(&df, columns::PRODUTO)?;
    if options.strict {
        collect_unmapped(&products, PRODUCT_MAP, &mut report.unmapped_products);
    }
    let normalized = products
        .iter()
        .map(|value| value.as_deref().map(normalize_product))
        .collect();
    set_string_column(&mut df, columns::PRODUTO_NORMALIZADO, normalized)?;

    let regions = string_column(&df, columns::REGIAO)?;
    if options.strict {
        collect_unmapped(&regions, REGION_MAP, &mut report.unmapped_regions);
    }
    let normalized = regions
        .iter()
        .map(|value| value.as_deref().map(normalize_region))
        .collect();
    set_string_column(&mut df, columns::REGIAO_NORMALIZADA, normalized)?;

    let brands = string_column(&df, columns::BANDEIRA)?
        .into_iter()
        .map(|value| value.as_deref().map(normalize_brand))
        .collect();
    set_string_column(&mut df, columns::BANDEIRA_NORMALIZADA, brands)?;

    if has_column(&df, columns::CNPJ) {
        let cnpj = string_column(&df, columns::CNPJ)?
            .into_iter()
            .map(|value| value.as_deref().map(digits_only))
            .collect();
        set_string_column(&mut df, columns::CNPJ_LIMPO, cnpj)?;
    }

    if report.has_unmapped() {
        warn!(
            products = ?report.unmapped_products,
            regions = ?report.unmapped_regions,
            "values outside controlled vocabulary"
        );
    }
    info!(rows = df.height(), "normalize complete");
    Ok((df, report))
}

fn collect_unmapped(
    values: &[Option<String>],
    table: &[(&str, &'static str)],
    unmapped: &mut BTreeSet<String>,
) {
    for value in values.iter().flatten() {
        if lookup(table, value).is_none() {
            unmapped.insert(value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_removes_posto_token() {
        assert_eq!(normalize_brand("POSTO SHELL"), "SHELL");
        assert_eq!(normalize_brand("POSTO"), UNBRANDED);
        assert_eq!(normalize_brand("DA ESQUINA"), UNBRANDED);
        assert_eq!(normalize_brand("POSPOSTOTO"), UNBRANDED);
    }

    #[test]
    fn cnpj_keeps_digits() {
        assert_eq!(digits_only("12.345.678/0001-90"), "12345678000190");
    }
}
