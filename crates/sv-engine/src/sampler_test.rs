use super::*;
use sv_core::{DataType, Field, Value};

fn numbers(n: i64) -> Table {
    Table::try_from_rows(
        vec![Field::new("n", DataType::Integer)],
        (0..n).map(|i| vec![Value::Integer(i)]).collect(),
    )
    .unwrap()
}

fn kept(table: &Table, mask: &[bool]) -> Vec<i64> {
    table
        .rows()
        .iter()
        .zip(mask)
        .filter(|(_, keep)| **keep)
        .map(|(row, _)| match row[0] {
            Value::Integer(i) => i,
            ref other => panic!("unexpected {:?}", other),
        })
        .collect()
}

#[test]
fn test_draw_is_in_unit_interval_and_stable() {
    let digest = row_digest(b"row");
    let a = draw(42, &digest, 0);
    assert!((0.0..1.0).contains(&a));
    assert_eq!(a, draw(42, &digest, 0));
    assert_ne!(a, draw(43, &digest, 0));
    assert_ne!(a, draw(42, &digest, 1));
}

#[test]
fn test_full_fraction_keeps_everything() {
    let table = numbers(50);
    assert!(inclusion_mask(&table, 1, 1.0).iter().all(|k| *k));
}

#[test]
fn test_mask_is_independent_of_row_order() {
    let table = numbers(2_000);
    let mut reversed_rows = table.rows().to_vec();
    reversed_rows.reverse();
    let reversed = Table::try_from_rows(table.fields().to_vec(), reversed_rows).unwrap();

    let mut forward = kept(&table, &inclusion_mask(&table, 7, 0.1));
    let mut backward = kept(&reversed, &inclusion_mask(&reversed, 7, 0.1));
    forward.sort_unstable();
    backward.sort_unstable();
    assert_eq!(forward, backward);
}

#[test]
fn test_mask_is_independent_of_thread_count() {
    let table = numbers(5_000);
    let run = |threads: usize| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
            .install(|| inclusion_mask(&table, 99, 0.05))
    };
    assert_eq!(run(1), run(4));
}

#[test]
fn test_different_seeds_select_different_rows() {
    let table = numbers(2_000);
    assert_ne!(
        inclusion_mask(&table, 1, 0.1),
        inclusion_mask(&table, 2, 0.1)
    );
}

#[test]
fn test_duplicate_rows_draw_independently() {
    let table = Table::try_from_rows(
        vec![Field::new("n", DataType::Integer)],
        vec![vec![Value::Integer(1)]; 1_000],
    )
    .unwrap();
    let digests = row_digests(&table);
    assert_eq!(occurrence_ordinals(&digests)[999], 999);

    let count = inclusion_mask(&table, 5, 0.5).iter().filter(|k| **k).count();
    assert!(count > 400 && count < 600, "kept {}", count);
}

#[test]
fn test_sample_size_is_near_expected() {
    let table = numbers(100_000);
    let count = inclusion_mask(&table, 42, 0.01).iter().filter(|k| **k).count();
    // mean 1000, sd ~31.5
    assert!((850..=1150).contains(&count), "kept {}", count);
}
