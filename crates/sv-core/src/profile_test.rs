use super::*;

#[test]
fn test_null_count_is_derived() {
    let profile = ColumnProfile::new("age", 3, 2, 2);
    assert_eq!(profile.null_count, 1);
    assert_eq!(profile.null_count + profile.non_null_count, 3);
}

#[test]
fn test_render_text() {
    let profile = DatasetProfile {
        dataset_name: "consumer_sample".to_string(),
        row_count: 3,
        columns: vec![
            ColumnProfile::new("id", 3, 3, 3),
            ColumnProfile::new("age", 3, 2, 2),
        ],
    };
    let text = profile.to_string();
    assert_eq!(
        text,
        "### consumer_sample: 3 rows\n- id: nulls=0, distinct=3\n- age: nulls=1, distinct=2\n"
    );
}

#[test]
fn test_json_shape() {
    let profile = DatasetProfile {
        dataset_name: "order_sample".to_string(),
        row_count: 0,
        columns: vec![ColumnProfile::new("id", 0, 0, 0)],
    };
    let json = serde_json::to_value(&profile).unwrap();
    assert_eq!(json["dataset_name"], "order_sample");
    assert_eq!(json["row_count"], 0);
    assert_eq!(json["columns"][0]["null_count"], 0);
    assert_eq!(json["columns"][0]["distinct_count"], 0);
}

#[test]
fn test_column_lookup() {
    let profile = DatasetProfile {
        dataset_name: "d".to_string(),
        row_count: 1,
        columns: vec![ColumnProfile::new("a", 1, 1, 1)],
    };
    assert!(profile.column("a").is_some());
    assert!(profile.column("b").is_none());
}
