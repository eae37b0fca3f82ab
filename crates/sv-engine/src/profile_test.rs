use super::*;
use sv_core::{DataType, Field, Value};

fn sample() -> Table {
    Table::try_from_rows(
        vec![
            Field::new("id", DataType::Integer),
            Field::new("name", DataType::Text),
            Field::new("age", DataType::Integer),
        ],
        vec![
            vec![Value::Integer(1), Value::Text("Alice".into()), Value::Integer(30)],
            vec![Value::Integer(2), Value::Text("Bob".into()), Value::Null],
            vec![Value::Integer(3), Value::Text("Alice".into()), Value::Integer(30)],
        ],
    )
    .unwrap()
}

#[test]
fn test_null_and_distinct_counts() {
    let profile = profile_table("people", &sample(), 10);
    assert_eq!(profile.dataset_name, "people");
    assert_eq!(profile.row_count, 3);

    let name = profile.column("name").unwrap();
    assert_eq!((name.null_count, name.distinct_count), (0, 2));
    let age = profile.column("age").unwrap();
    assert_eq!((age.null_count, age.distinct_count), (1, 1));
    let id = profile.column("id").unwrap();
    assert_eq!(id.distinct_count, 3);
}

#[test]
fn test_max_cols_limits_to_leading_columns() {
    let profile = profile_table("people", &sample(), 2);
    let names: Vec<&str> = profile.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name"]);
}

#[test]
fn test_empty_table() {
    let table = Table::new(vec![Field::new("x", DataType::Text)]);
    let profile = profile_table("empty", &table, 10);
    assert_eq!(profile.row_count, 0);
    assert_eq!(profile.columns[0].null_count, 0);
    assert_eq!(profile.columns[0].distinct_count, 0);
}

#[test]
fn test_float_zero_signs_count_once() {
    let table = Table::try_from_rows(
        vec![Field::new("f", DataType::Float)],
        vec![vec![Value::Float(0.0)], vec![Value::Float(-0.0)]],
    )
    .unwrap();
    assert_eq!(profile_table("f", &table, 1).columns[0].distinct_count, 1);
}
