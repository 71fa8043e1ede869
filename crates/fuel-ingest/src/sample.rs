//! Synthetic survey data with realistic structure and price ranges.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use fuel_model::SourceConfig;
use fuel_model::columns::RAW_DATE_FORMAT;

/// One raw survey row, serialized with the raw column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Regiao")]
    pub regiao: String,
    #[serde(rename = "Estado")]
    pub estado: String,
    #[serde(rename = "Municipio")]
    pub municipio: String,
    #[serde(rename = "Revenda")]
    pub revenda: String,
    #[serde(rename = "CNPJ")]
    pub cnpj: String,
    #[serde(rename = "Endereco")]
    pub endereco: String,
    #[serde(rename = "Produto")]
    pub produto: String,
    #[serde(rename = "Data_Coleta")]
    pub data_coleta: String,
    #[serde(rename = "Valor_Venda")]
    pub valor_venda: f64,
    #[serde(rename = "Valor_Compra")]
    pub valor_compra: f64,
    #[serde(rename = "Unidade_Medida")]
    pub unidade_medida: String,
    #[serde(rename = "Bandeira")]
    pub bandeira: String,
}

const STATES_BY_REGION: &[(&str, &[&str])] = &[
    ("NORTE", &["AM", "RR", "AP", "PA", "TO", "RO", "AC"]),
    (
        "NORDESTE",
        &["MA", "PI", "CE", "RN", "PB", "PE", "AL", "SE", "BA"],
    ),
    ("CENTRO-OESTE", &["MT", "MS", "GO", "DF"]),
    ("SUDESTE", &["SP", "RJ", "MG", "ES"]),
    ("SUL", &["PR", "SC", "RS"]),
];

/// Products with their base sale price in R$.
const BASE_PRICES: &[(&str, f64)] = &[
    ("GASOLINA COMUM", 5.20),
    ("GASOLINA ADITIVADA", 5.50),
    ("ETANOL", 3.80),
    ("ÓLEO DIESEL", 4.80),
    ("ÓLEO DIESEL S10", 5.00),
    ("GNV", 4.20),
    ("GLP", 110.0),
];

const BRANDS: &[&str] = &[
    "PETROBRAS",
    "SHELL",
    "IPIRANGA",
    "ALESAT",
    "RAIZEN",
    "BRANCA",
    "EQUADOR",
    "TEXACO",
    "POSTO DA ESQUINA",
];

const RESELLER_SUFFIXES: &[&str] = &["CENTRAL", "SUL", "NORTE", "CENTRO"];
const STREETS: &[&str] = &["A", "B", "C", "PRINCIPAL"];

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Generate `count` records. The same seed yields the same records.
///
/// Sale prices are the product base price with up to ±20% noise; purchase
/// prices are 85-95% of the sale price.
pub fn generate_sample(count: usize, seed: u64, source: &SourceConfig) -> Vec<RawRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let first = NaiveDate::from_ymd_opt(source.start_year, 1, 1).unwrap_or_default();
    let last = NaiveDate::from_ymd_opt(source.end_year.max(source.start_year), 12, 31)
        .unwrap_or(first);
    let span_days = (last - first).num_days().max(0);

    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let (regiao, states) = pick(&mut rng, STATES_BY_REGION);
        let estado = pick(&mut rng, states);
        let municipio = format!("CIDADE-{}", rng.gen_range(1000..=9999));
        let revenda = format!("POSTO {}", pick(&mut rng, RESELLER_SUFFIXES));
        let cnpj = format!(
            "{}.{}.{}/0001-{}",
            rng.gen_range(10..=99),
            rng.gen_range(100..=999),
            rng.gen_range(100..=999),
            rng.gen_range(10..=99)
        );
        let endereco = format!(
            "RUA {}, {}",
            pick(&mut rng, STREETS),
            rng.gen_range(1..=999)
        );
        let (produto, base_price) = pick(&mut rng, BASE_PRICES);
        let bandeira = pick(&mut rng, BRANDS);
        let date = first + Duration::days(rng.gen_range(0..=span_days));
        let valor_venda = round3(base_price * rng.gen_range(0.8..1.2));
        let valor_compra = round3(valor_venda * rng.gen_range(0.85..0.95));
        let unidade_medida = if *produto == "GLP" {
            "R$ / 13Kg"
        } else {
            "R$ / litro"
        };

        records.push(RawRecord {
            regiao: (*regiao).to_string(),
            estado: (*estado).to_string(),
            municipio,
            revenda,
            cnpj,
            endereco,
            produto: (*produto).to_string(),
            data_coleta: date.format(RAW_DATE_FORMAT).to_string(),
            valor_venda,
            valor_compra,
            unidade_medida: unidade_medida.to_string(),
            bandeira: (*bandeira).to_string(),
        });
    }
    info!(records = records.len(), seed, "synthetic records generated");
    records
}
