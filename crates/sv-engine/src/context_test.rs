use super::*;
use std::fmt::Write as _;
use sv_core::{DatasetName, Format};
use tempfile::TempDir;

fn csv_dataset(dir: &TempDir, rows: usize) -> DatasetDescriptor {
    let mut content = String::from("id,group\n");
    for i in 0..rows {
        writeln!(content, "{},{}", i, i % 7).unwrap();
    }
    let path = dir.path().join("numbers.csv");
    std::fs::write(&path, content).unwrap();
    DatasetDescriptor::new(DatasetName::try_new("numbers").unwrap(), path, Format::Csv)
}

#[test]
fn test_read_is_lazy() {
    let ctx = ExecutionContext::new(1).unwrap();
    let missing = DatasetDescriptor::new(
        DatasetName::try_new("missing").unwrap(),
        "/nonexistent/missing.csv",
        Format::Csv,
    );
    let frame = ctx.read(&missing).sample(0.5, 1).limit(10);
    let err = ctx.collect(&frame).unwrap_err();
    assert!(matches!(err, EngineError::SourceUnavailable { .. }));
}

#[test]
fn test_collect_scan_reports_counts() {
    let dir = TempDir::new().unwrap();
    let ctx = ExecutionContext::new(2).unwrap();
    assert_eq!(ctx.workers(), 2);
    let collected = ctx.collect(&ctx.read(&csv_dataset(&dir, 25))).unwrap();
    assert_eq!(collected.scanned_rows, 25);
    assert_eq!(collected.table.num_rows(), 25);
    assert_eq!(collected.malformed_records, 0);
}

#[test]
fn test_sample_is_deterministic_across_worker_counts() {
    let dir = TempDir::new().unwrap();
    let dataset = csv_dataset(&dir, 3_000);
    let run = |workers: usize| {
        let ctx = ExecutionContext::new(workers).unwrap();
        ctx.collect(&ctx.read(&dataset).sample(0.1, 42)).unwrap().table
    };
    let one = run(1);
    let four = run(4);
    assert!(one.same_content(&four));
    assert!(one.num_rows() > 0 && one.num_rows() < 3_000);
}

#[test]
fn test_limit_truncates_after_sampling() {
    let dir = TempDir::new().unwrap();
    let dataset = csv_dataset(&dir, 1_000);
    let ctx = ExecutionContext::new(0).unwrap();

    let sampled = ctx.collect(&ctx.read(&dataset).sample(0.5, 9)).unwrap().table;
    let limited = ctx
        .collect(&ctx.read(&dataset).sample(0.5, 9).limit(10))
        .unwrap()
        .table;
    assert_eq!(limited.num_rows(), 10);
    assert_eq!(limited.rows(), &sampled.rows()[..10]);
}

#[test]
fn test_invalid_plan_is_rejected_before_reading() {
    let dir = TempDir::new().unwrap();
    let ctx = ExecutionContext::new(1).unwrap();
    let err = ctx
        .collect(&ctx.read(&csv_dataset(&dir, 5)).sample(2.0, 1))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidPlan(_)));
}
