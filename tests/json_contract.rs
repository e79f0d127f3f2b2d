use trendchart::models::parse_market_trend;
use trendchart::{ChartError, MarketTrendDoc, TrendSeries};

fn malformed(json: &str) -> bool {
    let err = parse_market_trend(json).unwrap_err();
    matches!(
        err.downcast_ref::<ChartError>(),
        Some(ChartError::MalformedSeries(_))
    )
}

#[test]
fn parses_backend_document() {
    let json = r#"{
        "years": [2020, 2021, 2022, 2023],
        "average_prices": [10250.0, 10600.0, 10420.5, 10890.0],
        "year_over_year_changes": [0.0, 3.41, -1.69, 4.51],
        "sample_counts": [31, 28, 35, 22],
        "street_name": "Rue des Martyrs",
        "total_sales": 116,
        "outliers_excluded": 4
    }"#;
    let s = parse_market_trend(json).unwrap();
    assert_eq!(s.len(), 4);
    assert_eq!(s.label.as_deref(), Some("Rue des Martyrs"));
    assert_eq!(s.points[0].yoy_change_percent, None);
    assert_eq!(s.points[2].yoy_change_percent, Some(-1.69));
    assert_eq!(s.points[3].sample_count, 22);
    assert_eq!(s.total_samples, 116);
    assert_eq!(s.outliers_excluded, 4);
}

#[test]
fn optional_fields_may_be_missing() {
    let json = r#"{"years":[2022],"average_prices":[5000],"year_over_year_changes":[0],
        "sample_counts":[2]}"#;
    let s = parse_market_trend(json).unwrap();
    assert_eq!(s.label, None);
    assert_eq!(s.reported_total_sales, 0);
    assert_eq!(s.outliers_excluded, 0);
}

#[test]
fn mismatched_prices_are_malformed_not_truncated() {
    assert!(malformed(
        r#"{"years":[2021,2022,2023],"average_prices":[1.0,2.0],
            "year_over_year_changes":[0,100,0],"sample_counts":[1,1,1]}"#
    ));
}

#[test]
fn mismatched_counts_are_malformed() {
    assert!(malformed(
        r#"{"years":[2021,2022],"average_prices":[1.0,2.0],
            "year_over_year_changes":[0,100],"sample_counts":[1]}"#
    ));
}

#[test]
fn mismatched_changes_are_malformed() {
    assert!(malformed(
        r#"{"years":[2021,2022,2023],"average_prices":[1.0,2.0,3.0],
            "year_over_year_changes":[100],"sample_counts":[1,1,1]}"#
    ));
}

#[test]
fn missing_changes_array_is_an_error() {
    let err = parse_market_trend(r#"{"years":[2022],"average_prices":[5000],"sample_counts":[2]}"#)
        .unwrap_err();
    assert!(err.to_string().contains("year_over_year_changes"));
}

#[test]
fn duplicate_years_are_malformed() {
    assert!(malformed(
        r#"{"years":[2021,2021],"average_prices":[1.0,2.0],
            "year_over_year_changes":[0,100],"sample_counts":[1,1]}"#
    ));
}

#[test]
fn invalid_json_is_an_error() {
    let err = parse_market_trend("{\"years\": [2020,").unwrap_err();
    assert!(err.downcast_ref::<ChartError>().is_none());
}

#[test]
fn try_from_reports_lengths() {
    let doc = MarketTrendDoc {
        years: vec![2020, 2021, 2022],
        average_prices: vec![1.0, 2.0],
        year_over_year_changes: vec![0.0, 100.0, 0.0],
        sample_counts: vec![1, 1, 1],
        street_name: None,
        total_sales: 3,
        outliers_excluded: 0,
    };
    match TrendSeries::try_from(doc) {
        Err(ChartError::MalformedSeries(msg)) => assert!(msg.contains("3 years but 2")),
        other => panic!("unexpected: {other:?}"),
    }
}
