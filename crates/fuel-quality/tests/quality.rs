//! Integration tests for the quality checker.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use fuel_model::{ColumnRule, NumericRange, PipelineConfig, ValidationRules};
use fuel_quality::{
    QualityChecker, completeness, consistency, issues, report, schema_check, uniqueness, validity,
};

fn test_df(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.into(), values).into_column())
        .collect();
    DataFrame::new(cols).expect("build frame")
}

fn empty_df() -> DataFrame {
    test_df(vec![("A", vec![]), ("B", vec![])])
}

fn rules(entries: Vec<(&str, ColumnRule)>) -> ValidationRules {
    entries
        .into_iter()
        .map(|(name, rule)| (name.to_string(), rule))
        .collect()
}

#[test]
fn completeness_of_empty_table_is_empty() {
    assert!(completeness(&empty_df()).is_empty());
}

#[test]
fn completeness_counts_nulls_and_nan() {
    let mut df = test_df(vec![("A", vec![Some("x"), Some("y"), None, Some("z")])]);
    df.with_column(Series::new(
        "P".into(),
        vec![Some(1.0), Some(f64::NAN), None, Some(2.0)],
    ))
    .expect("add column");
    let scores = completeness(&df);
    assert_eq!(scores["A"], 0.75);
    assert_eq!(scores["P"], 0.5);
}

#[test]
fn fully_populated_column_is_complete() {
    let df = test_df(vec![("A", vec![Some("x"), Some("y")])]);
    assert_eq!(completeness(&df)["A"], 1.0);
}

#[test]
fn absent_rule_column_scores_zero() {
    let df = test_df(vec![("A", vec![Some("x")])]);
    let scores = validity(&df, &rules(vec![("MISSING", ColumnRule::range(0.0, 1.0))]));
    assert_eq!(scores["MISSING"], 0.0);

    let scores = validity(&empty_df(), &rules(vec![("MISSING", ColumnRule::range(0.0, 1.0))]));
    assert_eq!(scores.get("MISSING"), Some(&0.0));
    assert_eq!(scores.len(), 1);
}

#[test]
fn validity_range_parses_text_values() {
    let df = test_df(vec![("P", vec![Some("4.5"), Some("20"), Some("abc"), None])]);
    let scores = validity(&df, &rules(vec![("P", ColumnRule::range(0.1, 15.0))]));
    assert_eq!(scores["P"], 0.25);
}

#[test]
fn validity_uses_first_rule_kind_only() {
    let df = test_df(vec![("P", vec![Some("5"), Some("6")])]);
    // Range wins; the value list would reject every row.
    let rule = ColumnRule {
        range: Some(NumericRange::new(0.0, 10.0)),
        allowed_values: Some(vec!["X".to_string()]),
        date_format: None,
    };
    assert_eq!(validity(&df, &rules(vec![("P", rule)]))["P"], 1.0);
}

#[test]
fn validity_values_and_dates() {
    let df = test_df(vec![
        ("R", vec![Some("SUL"), Some("NORTE"), Some("XX"), Some("SUL")]),
        (
            "D",
            vec![Some("01/03/2022"), Some("2022-03-01"), Some("31/02/2022"), None],
        ),
    ]);
    let scores = validity(
        &df,
        &rules(vec![
            ("R", ColumnRule::values(["SUL", "NORTE"])),
            ("D", ColumnRule::date("%d/%m/%Y")),
        ]),
    );
    assert_eq!(scores["R"], 0.75);
    assert_eq!(scores["D"], 0.25);
}

#[test]
fn rule_without_kind_is_fully_valid() {
    let df = test_df(vec![("A", vec![Some("x"), None])]);
    assert_eq!(validity(&df, &rules(vec![("A", ColumnRule::default())]))["A"], 1.0);
}

#[test]
fn uniqueness_edge_cases() {
    let df = test_df(vec![("K", vec![Some("a"), Some("a"), Some("b"), None])]);
    let no_keys: [&str; 0] = [];
    assert_eq!(uniqueness(&df, &no_keys), 1.0);
    assert_eq!(uniqueness(&empty_df(), &no_keys), 1.0);
    assert_eq!(uniqueness(&empty_df(), &["A"]), 1.0);
    assert_eq!(uniqueness(&df, &["MISSING"]), 0.0);
    assert_eq!(uniqueness(&df, &["K"]), 0.75);
    assert_eq!(uniqueness(&df, &["K", "MISSING"]), 0.75);
}

#[test]
fn uniqueness_treats_nulls_as_equal() {
    let df = test_df(vec![
        ("K", vec![None, None, Some("a")]),
        ("L", vec![Some("1"), Some("1"), Some("1")]),
    ]);
    let score = uniqueness(&df, &["K", "L"]);
    assert!((score - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn consistency_uses_modal_length() {
    let mut df = test_df(vec![
        ("S", vec![Some("SP"), Some("RJ"), Some("MGX"), None]),
        ("E", vec![None, None, None, None]),
    ]);
    df.with_column(Series::new("N".into(), vec![Some(1.0), None, Some(3.0), Some(4.0)]))
        .expect("add column");
    let scores = consistency(&df);
    assert!((scores["S"] - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(scores["E"], 1.0);
    assert_eq!(scores["N"], 0.75);
    assert!(consistency(&empty_df()).is_empty());
}

#[test]
fn report_includes_optional_categories_only_when_given() {
    let df = test_df(vec![("A", vec![Some("x"), Some("y")])]);
    let bare = report::<&str>(&df, None, None);
    assert!(bare.validity.is_none());
    assert!(bare.uniqueness.is_none());
    assert_eq!(bare.dataset_info.total_rows, 2);

    let empty_rules = ValidationRules::new();
    let empty_keys: [&str; 0] = [];
    let still_bare = report(&df, Some(&empty_rules), Some(&empty_keys[..]));
    assert!(still_bare.validity.is_none());
    assert!(still_bare.uniqueness.is_none());

    let full = report(
        &df,
        Some(&rules(vec![("A", ColumnRule::values(["x"]))])),
        Some(&["A"][..]),
    );
    assert_eq!(full.validity.as_ref().map(|v| v["A"]), Some(0.5));
    assert_eq!(full.uniqueness, Some(1.0));
}

#[test]
fn overall_score_averages_category_means() {
    // 100 rows, one column 10% null, one fully compliant rule column.
    let sparse: Vec<Option<&str>> = (0..100)
        .map(|idx| if idx < 10 { None } else { Some("abc") })
        .collect();
    let prices: Vec<Option<&str>> = (0..100).map(|_| Some("5.0")).collect();
    let df = test_df(vec![("S", sparse), ("P", prices)]);
    let rule_set = rules(vec![("P", ColumnRule::range(0.1, 15.0))]);
    let result = report::<&str>(&df, Some(&rule_set), None);

    let completeness_mean = (0.9 + 1.0) / 2.0;
    let validity_mean = 1.0;
    let consistency_mean = (1.0 + 1.0) / 2.0;
    let expected = (completeness_mean + validity_mean + consistency_mean) / 3.0;
    assert!((result.overall_quality_score - expected).abs() < 1e-12);
    assert!(result.uniqueness.is_none());
}

#[test]
fn report_on_empty_table_scores_zero() {
    let result = report::<&str>(&empty_df(), None, None);
    assert_eq!(result.overall_quality_score, 0.0);
    assert!(result.completeness.is_empty());
}

#[test]
fn schema_check_tolerates_extra_columns() {
    let df = test_df(vec![("A", vec![Some("x")]), ("B", vec![Some("y")])]);
    assert!(schema_check(&df, &["A"]));
    assert!(!schema_check(&df, &["A", "C"]));
}

#[test]
fn issues_lists_metrics_below_thresholds() {
    let df = test_df(vec![
        ("A", vec![Some("x"), None, Some("x"), Some("x")]),
        ("K", vec![Some("1"), Some("1"), Some("2"), Some("3")]),
    ]);
    let rule_set = rules(vec![("K", ColumnRule::values(["1"]))]);
    let result = report(&df, Some(&rule_set), Some(&["K"][..]));
    insta::assert_debug_snapshot!(issues(&result), @r#"
    [
        "column 'A' has low completeness: 75.0%",
        "column 'K' has low validity: 50.0%",
        "low uniqueness detected: 75.0%",
        "overall quality score below expected: 78.1%",
    ]
    "#);
}

#[test]
fn checker_applies_configured_minimum() {
    let config = PipelineConfig::default();
    let checker = QualityChecker::new(&config.quality);
    let df = test_df(vec![("A", vec![Some("x"), None])]);
    let result = checker.report::<&str>(&df, None, None);
    assert_eq!(checker.columns_over_null_limit(&result), vec!["A".to_string()]);
    assert!(!checker.passes(&result));
    assert_eq!(checker.raw_rules().len(), 4);
    assert_eq!(checker.silver_rules().len(), 4);
}

#[test]
fn null_limit_flags_columns_of_a_passing_report() {
    let config = PipelineConfig::default();
    let checker = QualityChecker::new(&config.quality);
    let mut sparse = vec![Some("x"); 8];
    sparse.extend([None, None]);
    let df = test_df(vec![("A", sparse), ("B", vec![Some("y"); 10])]);
    let result = checker.report::<&str>(&df, None, None);
    assert!(checker.passes(&result));
    assert_eq!(checker.columns_over_null_limit(&result), vec!["A".to_string()]);
}

#[test]
fn report_serializes_to_nested_mapping() {
    let df = test_df(vec![("A", vec![Some("x")])]);
    let result = report(&df, None, Some(&["A"][..]));
    let value = serde_json::to_value(&result).expect("serialize report");
    assert_eq!(value["uniqueness"], 1.0);
    assert!(value.get("validity").is_none());
    assert_eq!(value["dataset_info"]["total_rows"], 1);
}
