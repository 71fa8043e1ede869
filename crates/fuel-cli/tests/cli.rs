use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use fuel_cli::commands::{
    bronze_input, inspect_quality, list_partitions, load_config, run_layer, run_pipeline,
};
use fuel_cli::summary::{job_table, partition_table, quality_table};
use fuel_ingest::{generate_sample, write_raw_csv};
use fuel_model::{
    DatasetInfo, JobMetrics, JobOutcome, JobReport, Layer, PipelineConfig, PipelineStatus,
    QualityReport,
};
use fuel_store::PartitionInfo;

fn small_config(root: &std::path::Path) -> PipelineConfig {
    let mut config = load_config(None, Some(root)).unwrap();
    config.source.default_records = 200;
    config
}

#[test]
fn config_file_is_overlaid_by_lake_dir() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lake.toml");
    fs::write(
        &path,
        "[lake]\nroot = \"from-file\"\n\n[source]\ndefault_records = 10\n",
    )
    .unwrap();

    let from_file = load_config(Some(&path), None).unwrap();
    assert_eq!(from_file.lake.root, PathBuf::from("from-file"));
    assert_eq!(from_file.source.default_records, 10);

    let overridden = load_config(Some(&path), Some(dir.path())).unwrap();
    assert_eq!(overridden.lake.root, dir.path());
    assert_eq!(overridden.source.default_records, 10);

    let missing = load_config(Some(&dir.path().join("absent.toml")), None);
    assert!(missing.is_err());
}

#[test]
fn bronze_input_falls_back_to_source_settings() {
    let config = PipelineConfig::default();
    let input = bronze_input(&config.source, None, Some(25), None);
    assert_eq!(input.records, 25);
    assert_eq!(input.seed, config.source.seed);
    assert!(input.input.is_none());
}

#[test]
fn run_then_inspect_partitions() {
    let dir = TempDir::new().unwrap();
    let config = small_config(dir.path());
    let input = bronze_input(&config.source, None, None, Some(11));

    let summary = run_pipeline(&config, &input);
    assert_eq!(summary.status, PipelineStatus::Success, "{summary:?}");

    let (root, bronze) = list_partitions(&config, Layer::Bronze).unwrap();
    assert_eq!(root, config.lake.bronze_dir());
    let files: usize = bronze.iter().map(|partition| partition.files).sum();
    assert_eq!(files, summary.jobs[0].metrics().unwrap().files_written);
    assert!(bronze.iter().all(|p| p.path.to_string_lossy().starts_with("ano=")));

    assert!(list_partitions(&config, Layer::Gold).is_err());
}

#[test]
fn single_layers_report_failures() {
    let dir = TempDir::new().unwrap();
    let config = small_config(dir.path());
    let input = bronze_input(&config.source, None, None, None);

    let report = run_layer(&config, Layer::Silver, &input);
    assert!(!report.is_success());
    assert_eq!(report.job_name, "silver_transformation");
}

#[test]
fn quality_of_a_raw_file() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::default();
    let path = dir.path().join("raw.csv");
    write_raw_csv(&path, &generate_sample(50, 5, &config.source)).unwrap();

    let report = inspect_quality(&config, &path).unwrap();

    assert_eq!(report.dataset_info.total_rows, 50);
    assert_eq!(report.dataset_info.total_columns, 12);
    assert!(report.uniqueness.is_some());
    assert!(report.overall_quality_score > 0.0);
    assert!(report.overall_quality_score <= 1.0);

    let rendered = quality_table(&report).to_string();
    assert!(rendered.contains("Valor_Venda"));
    assert!(rendered.contains("float"));
}

#[test]
fn quality_rejects_a_file_without_the_raw_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("other.csv");
    fs::write(&path, "a,b\n1,2\n").unwrap();

    let error = inspect_quality(&PipelineConfig::default(), &path).unwrap_err();
    assert!(format!("{error:#}").contains("validate raw schema"));
}

#[test]
fn job_table_shows_outcomes() {
    let jobs = vec![
        JobReport {
            layer: Layer::Bronze,
            job_name: "bronze_ingestion".to_string(),
            started_at: "2024-01-01T00:00:00+00:00".to_string(),
            elapsed_seconds: 1.5,
            outcome: JobOutcome::Success(JobMetrics {
                records_input: 1200,
                records_output: 1180,
                partitions_written: 12,
                files_written: 12,
                quality_score: Some(0.934),
            }),
        },
        JobReport {
            layer: Layer::Silver,
            job_name: "silver_transformation".to_string(),
            started_at: "2024-01-01T00:00:02+00:00".to_string(),
            elapsed_seconds: 0.25,
            outcome: JobOutcome::Failure {
                error: "read bronze layer".to_string(),
            },
        },
    ];

    let rendered = job_table(&jobs).to_string();

    assert!(rendered.contains("bronze_ingestion"));
    assert!(rendered.contains("1180"));
    assert!(rendered.contains("0.934"));
    assert!(rendered.contains("FAILED"));
    assert!(rendered.contains("0.25"));
}

#[test]
fn quality_table_lists_absent_rule_columns() {
    let report = QualityReport {
        timestamp: "2024-01-01T00:00:00+00:00".to_string(),
        dataset_info: DatasetInfo {
            total_rows: 4,
            total_columns: 1,
            memory_usage_mb: 0.0,
        },
        completeness: BTreeMap::from([("Produto".to_string(), 0.75)]),
        consistency: BTreeMap::from([("Produto".to_string(), 1.0)]),
        validity: Some(BTreeMap::from([("Regiao".to_string(), 0.0)])),
        uniqueness: None,
        overall_quality_score: 0.58,
    };

    let rendered = quality_table(&report).to_string();

    assert!(rendered.contains("Produto"));
    assert!(rendered.contains("0.750"));
    assert!(rendered.contains("Regiao"));
    assert!(rendered.contains("absent"));
}

#[test]
fn partition_table_totals() {
    let partitions = vec![
        PartitionInfo {
            path: PathBuf::from("ano=2023/mes=1"),
            files: 2,
            size_mb: 0.5,
        },
        PartitionInfo {
            path: PathBuf::from("ano=2023/mes=2"),
            files: 1,
            size_mb: 0.25,
        },
    ];

    let rendered = partition_table(&partitions).to_string();

    assert!(rendered.contains("ano=2023/mes=1"));
    assert!(rendered.contains("TOTAL"));
    assert!(rendered.contains("0.750"));
}
