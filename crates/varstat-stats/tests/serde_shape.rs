use serde_json::json;
use varstat_stats::{Buckets, Statistic, Summary};

#[test]
fn summary_serializes_absent_statistics_as_null() {
    let summary = Summary::from_values([Some(4.0), None]);
    let value = serde_json::to_value(&summary).expect("serialize summary");
    assert_eq!(
        value,
        json!({
            "n": 1,
            "mean": 4.0,
            "standard_deviation": null,
            "median": 4.0,
            "min": 4.0,
            "max": 4.0,
            "unknown": 1
        })
    );
    let back: Summary = serde_json::from_value(value).expect("deserialize summary");
    assert_eq!(back, summary);
}

#[test]
fn buckets_and_statistics_keep_their_names() {
    let buckets = Buckets::with_count([0.0, 10.0], 2);
    let value = serde_json::to_value(&buckets).expect("serialize buckets");
    assert_eq!(value["buckets"][1]["display_name"], "5 to 10");
    assert_eq!(value["buckets"][1]["precision"], 0);
    let back: Buckets = serde_json::from_value(value).expect("deserialize buckets");
    assert_eq!(back, buckets);

    let names = serde_json::to_value(Statistic::ALL).expect("serialize statistics");
    assert_eq!(
        names,
        json!(["N", "Mean", "StdDev", "Median", "Min", "Max", "Unknown"])
    );
}
