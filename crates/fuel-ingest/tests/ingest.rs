use std::fs;

use polars::prelude::DataType;
use tempfile::TempDir;

use fuel_common::{f64_column, string_column};
use fuel_ingest::{
    IngestError, generate_sample, list_raw_files, read_raw_csv, validate_raw_schema,
    write_raw_csv,
};
use fuel_model::{SourceConfig, columns};

#[test]
fn sample_is_reproducible_per_seed() {
    let source = SourceConfig::default();
    let a = generate_sample(50, 7, &source);
    let b = generate_sample(50, 7, &source);
    let c = generate_sample(50, 8, &source);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn sample_prices_follow_price_model() {
    let source = SourceConfig::default();
    for record in generate_sample(500, 42, &source) {
        assert!(record.valor_venda > 0.0);
        // purchase is 85-95% of sale, allowing for 3-decimal rounding
        let ratio = record.valor_compra / record.valor_venda;
        assert!((0.849..=0.951).contains(&ratio), "ratio {ratio}");
        if record.produto == "GLP" {
            assert_eq!(record.unidade_medida, "R$ / 13Kg");
            assert!(record.valor_venda >= 88.0 && record.valor_venda <= 132.0);
        } else {
            assert_eq!(record.unidade_medida, "R$ / litro");
        }
    }
}

#[test]
fn sample_dates_fall_in_configured_years() {
    let source = SourceConfig {
        start_year: 2021,
        end_year: 2022,
        ..SourceConfig::default()
    };
    for record in generate_sample(200, 1, &source) {
        let year: i32 = record.data_coleta[6..].parse().expect("year");
        assert!((2021..=2022).contains(&year), "{}", record.data_coleta);
        assert_eq!(record.data_coleta.len(), 10);
    }
}

#[test]
fn written_sample_reads_back_as_text() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("transient").join("sample.csv");
    let records = generate_sample(25, 3, &SourceConfig::default());
    write_raw_csv(&path, &records).expect("write csv");

    let df = read_raw_csv(&path).expect("read csv");
    assert_eq!(df.height(), 25);
    validate_raw_schema(&df).expect("schema");
    assert!(df.get_columns().iter().all(|c| c.dtype() == &DataType::String));
    let produtos = string_column(&df, columns::PRODUTO).expect("produtos");
    assert_eq!(produtos[0].as_deref(), Some(records[0].produto.as_str()));
    let vendas = f64_column(&df, columns::VALOR_VENDA).expect("vendas");
    assert_eq!(vendas[0], Some(records[0].valor_venda));
}

#[test]
fn empty_cells_read_as_null() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("raw.csv");
    fs::write(&path, "Estado,Produto,Valor_Venda\nSP,,4.5\n,ETANOL,\n").expect("write");
    let df = read_raw_csv(&path).expect("read csv");
    assert_eq!(
        string_column(&df, columns::PRODUTO).expect("produtos"),
        vec![None, Some("ETANOL".to_string())]
    );
    assert_eq!(
        string_column(&df, columns::VALOR_VENDA).expect("vendas"),
        vec![Some("4.5".to_string()), None]
    );
}

#[test]
fn schema_check_names_missing_columns() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("raw.csv");
    fs::write(&path, "Estado,Produto,Valor_Venda\nSP,ETANOL,4.5\n").expect("write");
    let df = read_raw_csv(&path).expect("read csv");
    match validate_raw_schema(&df) {
        Err(IngestError::Schema { missing }) => {
            assert_eq!(missing.len(), 9);
            assert_eq!(missing[0], columns::REGIAO);
            assert!(!missing.contains(&columns::ESTADO.to_string()));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn missing_file_is_reported() {
    let temp = TempDir::new().expect("temp dir");
    let result = read_raw_csv(&temp.path().join("absent.csv"));
    assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
}

#[test]
fn raw_files_are_listed_sorted() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("b.csv"), "x\n").expect("write");
    fs::write(temp.path().join("a.CSV"), "x\n").expect("write");
    fs::write(temp.path().join("notes.txt"), "x\n").expect("write");
    fs::create_dir(temp.path().join("nested.csv")).expect("dir");

    let files = list_raw_files(temp.path()).expect("list");
    let names: Vec<_> = files
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(names, vec!["a.CSV", "b.csv"]);

    let missing = list_raw_files(&temp.path().join("absent"));
    assert!(matches!(missing, Err(IngestError::DirectoryNotFound { .. })));
}
