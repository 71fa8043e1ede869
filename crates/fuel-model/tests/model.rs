use fuel_model::{
    ColumnRule, DatasetInfo, JobMetrics, JobOutcome, JobReport, Layer, PipelineConfig,
    QualityReport,
};

#[test]
fn default_config_matches_documented_values() {
    let config = PipelineConfig::default();
    assert_eq!(config.lake.partition_columns, vec!["ano", "mes"]);
    assert_eq!(config.quality.min_quality_score, 0.8);
    assert_eq!(config.quality.valid_regioes.len(), 5);
    assert_eq!(config.quality.valid_produtos.len(), 7);
    assert_eq!(config.analytics.ethanol_viability_threshold, 0.7);
    assert_eq!(config.source.start_year, 2020);
    assert_eq!(config.source.end_year, 2024);
}

#[test]
fn partial_toml_keeps_defaults() {
    let config = PipelineConfig::from_toml_str(
        r#"
[lake]
root = "/tmp/lake"

[analytics]
ethanol_viability_threshold = 0.72
"#,
    )
    .expect("parse config");
    assert_eq!(config.lake.root.to_str(), Some("/tmp/lake"));
    assert_eq!(config.lake.partition_columns, vec!["ano", "mes"]);
    assert_eq!(config.analytics.ethanol_viability_threshold, 0.72);
    assert_eq!(config.analytics.major_brands.len(), 5);
    assert_eq!(config.lake.silver_dir().to_str(), Some("/tmp/lake/silver"));
}

#[test]
fn invalid_toml_is_reported() {
    let error = PipelineConfig::from_toml_str("[lake]\nroot = 3").unwrap_err();
    assert!(error.to_string().starts_with("invalid config"));
}

#[test]
fn report_omits_absent_categories() {
    let report = QualityReport {
        timestamp: "2024-01-01T00:00:00Z".to_string(),
        dataset_info: DatasetInfo {
            total_rows: 2,
            total_columns: 1,
            memory_usage_mb: 0.0,
        },
        completeness: [("A".to_string(), 1.0)].into_iter().collect(),
        consistency: [("A".to_string(), 0.5)].into_iter().collect(),
        validity: None,
        uniqueness: None,
        overall_quality_score: 0.75,
    };
    insta::assert_json_snapshot!(report, @r#"
    {
      "timestamp": "2024-01-01T00:00:00Z",
      "dataset_info": {
        "total_rows": 2,
        "total_columns": 1,
        "memory_usage_mb": 0.0
      },
      "completeness": {
        "A": 1.0
      },
      "consistency": {
        "A": 0.5
      },
      "overall_quality_score": 0.75
    }
    "#);
}

#[test]
fn rule_serializes_only_present_kind() {
    let json = serde_json::to_string(&ColumnRule::range(0.1, 15.0)).expect("serialize rule");
    assert_eq!(json, r#"{"range":{"min":0.1,"max":15.0}}"#);
}

#[test]
fn job_report_flattens_status() {
    let report = JobReport {
        layer: Layer::Silver,
        job_name: Layer::Silver.job_name().to_string(),
        started_at: "2024-01-01T00:00:00Z".to_string(),
        elapsed_seconds: 1.5,
        outcome: JobOutcome::Failure {
            error: "boom".to_string(),
        },
    };
    let value = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(value["status"], "failure");
    assert_eq!(value["error"], "boom");
    assert_eq!(value["layer"], "silver");
    assert!(!report.is_success());

    let success = JobReport {
        outcome: JobOutcome::Success(JobMetrics {
            records_input: 10,
            records_output: 8,
            ..JobMetrics::default()
        }),
        ..report
    };
    let value = serde_json::to_value(&success).expect("serialize report");
    assert_eq!(value["status"], "success");
    assert_eq!(value["records_output"], 8);
    assert_eq!(success.metrics().map(|m| m.records_input), Some(10));
}
