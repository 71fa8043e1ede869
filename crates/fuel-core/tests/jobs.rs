use std::fs;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use polars::prelude::{Column, DataFrame};
use tempfile::TempDir;

use fuel_common::{i64_column, string_column};
use fuel_core::{
    BronzeInput, BronzeJob, GoldJob, Orchestrator, SilverJob, add_technical_columns, load_raw,
    run_job, write_execution_log,
};
use fuel_ingest::{generate_sample, write_raw_csv};
use fuel_model::{ExecutionSummary, JobMetrics, Layer, PipelineConfig, PipelineStatus, columns};

fn config(root: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::default().with_lake_root(root);
    config.source.default_records = 300;
    config.source.seed = 7;
    config
}

fn parquet_files(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return found;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            found.extend(parquet_files(&path));
        } else if path.extension().is_some_and(|ext| ext == "parquet") {
            found.push(path);
        }
    }
    found
}

#[test]
fn full_run_populates_every_layer() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    let input = BronzeInput::from(&config.source);

    let summary = Orchestrator::new(&config).run(&input);

    assert_eq!(summary.status, PipelineStatus::Success, "{summary:?}");
    let layers: Vec<Layer> = summary.jobs.iter().map(|job| job.layer).collect();
    assert_eq!(layers, vec![Layer::Bronze, Layer::Silver, Layer::Gold]);
    assert!(summary.pipeline_id.starts_with("exec_"));

    let bronze = summary.jobs[0].metrics().unwrap();
    assert_eq!(bronze.records_input, 300);
    assert_eq!(bronze.records_output, 300);
    assert!(bronze.quality_score.is_some());

    let silver = summary.jobs[1].metrics().unwrap();
    assert_eq!(silver.records_input, 300);
    assert!(silver.records_output > 0);
    assert!(silver.records_output <= 300);

    let gold = summary.jobs[2].metrics().unwrap();
    assert!(gold.files_written > 0);
    let lake = &config.lake;
    assert_eq!(
        parquet_files(&lake.gold_dir().join("analytics")).len(),
        gold.files_written
    );
    assert!(lake.gold_dir().join("analytics").join("temporal").is_dir());

    let bronze_files = parquet_files(&lake.bronze_dir());
    assert_eq!(bronze_files.len(), bronze.files_written);
    assert!(bronze_files.iter().all(|path| {
        let text = path.to_string_lossy();
        text.contains("ano=") && text.contains("mes=")
    }));
    assert_eq!(parquet_files(&lake.silver_dir()).len(), silver.files_written);

    let transient: Vec<_> = fs::read_dir(lake.transient_dir()).unwrap().collect();
    assert_eq!(transient.len(), 1);

    let logs: Vec<PathBuf> = fs::read_dir(lake.logs_dir())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(logs.len(), 1);
    let logged: ExecutionSummary =
        serde_json::from_str(&fs::read_to_string(&logs[0]).unwrap()).unwrap();
    assert_eq!(logged.pipeline_id, summary.pipeline_id);
    assert_eq!(logged.jobs.len(), 3);
}

#[test]
fn bronze_ingests_a_given_csv() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir.path().join("lake"));
    let csv = dir.path().join("raw.csv");
    write_raw_csv(&csv, &generate_sample(120, 3, &config.source)).unwrap();

    let input = BronzeInput {
        input: Some(csv),
        records: 0,
        seed: 0,
    };
    let metrics = BronzeJob::new(&config).run(&input).unwrap();

    assert_eq!(metrics.records_input, 120);
    assert_eq!(metrics.records_output, 120);
    assert!(metrics.partitions_written > 0);
    assert!(!config.lake.transient_dir().exists());
}

#[test]
fn raw_directories_are_stacked() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir.path().join("lake"));
    let raw = dir.path().join("raw");
    fs::create_dir_all(&raw).unwrap();
    write_raw_csv(&raw.join("b.csv"), &generate_sample(40, 1, &config.source)).unwrap();
    write_raw_csv(&raw.join("a.csv"), &generate_sample(25, 2, &config.source)).unwrap();
    fs::write(raw.join("notes.txt"), "ignored").unwrap();

    assert_eq!(load_raw(&raw).unwrap().height(), 65);

    let input = BronzeInput {
        input: Some(raw),
        records: 0,
        seed: 0,
    };
    let metrics = BronzeJob::new(&config).run(&input).unwrap();
    assert_eq!(metrics.records_input, 65);
}

#[test]
fn empty_raw_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = load_raw(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("no CSV files"));
}

#[test]
fn missing_input_fails_bronze_and_stops_the_run() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    let input = BronzeInput {
        input: Some(dir.path().join("absent.csv")),
        records: 10,
        seed: 1,
    };

    let summary = Orchestrator::new(&config).run(&input);

    assert_eq!(summary.status, PipelineStatus::Failed);
    assert_eq!(summary.jobs.len(), 1);
    let failed = summary.failed_job().unwrap();
    assert_eq!(failed.layer, Layer::Bronze);
    assert!(failed.error().unwrap().contains("load raw data"));
    assert!(!config.lake.silver_dir().exists());
}

#[test]
fn silver_and_gold_fail_on_an_empty_lake() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());

    let silver = run_job(Layer::Silver, || SilverJob::new(&config).run());
    assert!(!silver.is_success());
    assert!(silver.error().unwrap().contains("read bronze layer"));

    let gold = run_job(Layer::Gold, || GoldJob::new(&config).run());
    assert!(gold.error().unwrap().contains("read silver layer"));
}

#[test]
fn technical_columns_follow_the_collection_date() {
    let dates = Column::new(
        columns::DATA_COLETA.into(),
        [Some("01/03/2022"), Some("2022-03-01"), None],
    );
    let df = DataFrame::new(vec![dates]).unwrap();

    let df = add_technical_columns(df, "raw.csv").unwrap();

    assert_eq!(
        i64_column(&df, columns::BRONZE_RECORD_ID).unwrap(),
        vec![Some(1), Some(2), Some(3)]
    );
    assert_eq!(
        i64_column(&df, columns::ANO).unwrap(),
        vec![Some(2022), None, None]
    );
    assert_eq!(i64_column(&df, columns::MES).unwrap(), vec![Some(3), None, None]);
    assert_eq!(
        string_column(&df, columns::BRONZE_SOURCE_FILE).unwrap(),
        vec![Some("raw.csv".to_string()); 3]
    );
    let loaded = string_column(&df, columns::BRONZE_LOAD_TIMESTAMP).unwrap();
    assert!(loaded.iter().all(Option::is_some));
}

#[test]
fn job_reports_capture_metrics_and_error_chains() {
    let ok = run_job(Layer::Gold, || {
        Ok(JobMetrics {
            records_input: 5,
            ..JobMetrics::default()
        })
    });
    assert!(ok.is_success());
    assert_eq!(ok.job_name, "gold_analytics");
    assert_eq!(ok.metrics().unwrap().records_input, 5);

    let failed = run_job(Layer::Silver, || {
        Err(anyhow!("disk full").context("write silver partitions"))
    });
    assert_eq!(failed.error(), Some("write silver partitions: disk full"));
    assert!(failed.metrics().is_none());
}

#[test]
fn execution_log_is_pretty_json() {
    let dir = TempDir::new().unwrap();
    let summary = ExecutionSummary {
        pipeline_id: "exec_20240101_120000".to_string(),
        started_at: "2024-01-01T12:00:00+00:00".to_string(),
        finished_at: "2024-01-01T12:00:05+00:00".to_string(),
        total_seconds: 5.0,
        status: PipelineStatus::Success,
        jobs: Vec::new(),
    };

    let path = write_execution_log(&summary, &dir.path().join("logs")).unwrap();

    assert!(path.ends_with("logs/pipeline_execution_exec_20240101_120000.json"));
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n  \"status\": \"success\""));
    let parsed: ExecutionSummary = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, summary);
}
