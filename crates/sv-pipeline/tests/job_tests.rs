//! End-to-end sampling jobs over files on disk

use std::fmt::Write as _;
use std::path::Path;
use sv_core::{Config, DatasetDescriptor, DatasetName, Format};
use sv_engine::read_artifact;
use sv_pipeline::{run_job, DuckDbProfiler, JobConfig, NativeProfiler, PipelineError};
use tempfile::TempDir;

fn csv(dir: &Path, name: &str, content: &str) -> DatasetDescriptor {
    let path = dir.join("raw").join(name).join(format!("{}.csv", name));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    DatasetDescriptor::new(DatasetName::try_new(name).unwrap(), path, Format::Csv)
}

fn job_config(root: &Path, fraction: f64, cap: usize) -> JobConfig {
    let mut config = JobConfig::from_config(&Config::default(), root);
    config.sampling.fraction = fraction;
    config.sampling.cap = cap;
    config
}

#[tokio::test]
async fn test_id_name_age_profile() {
    let dir = TempDir::new().unwrap();
    let people = csv(dir.path(), "people", "id,name,age\n1,Alice,30\n2,Bob,25\n3,Carol,\n");
    let config = job_config(dir.path(), 1.0, 100);

    let summary = run_job(&config, &[people], &NativeProfiler, |_| {})
        .await
        .unwrap();
    let report = summary.outcomes[0].result.as_ref().unwrap();
    let age = report.profile.column("age").unwrap();
    assert_eq!((age.null_count, age.distinct_count), (1, 2));
    assert_eq!(report.profile.row_count, 3);
}

#[tokio::test]
async fn test_empty_raw_table() {
    let dir = TempDir::new().unwrap();
    let empty = csv(dir.path(), "empty", "id,name\n");
    let config = job_config(dir.path(), 0.5, 100);
    let profiler = DuckDbProfiler::in_memory().unwrap();

    let summary = run_job(&config, &[empty], &profiler, |_| {}).await.unwrap();
    let report = summary.outcomes[0].result.as_ref().unwrap();
    assert_eq!(report.sampled_rows, 0);
    assert_eq!(report.profile.row_count, 0);
    for column in &report.profile.columns {
        assert_eq!((column.null_count, column.distinct_count), (0, 0));
    }
    assert!(report.artifact.join("_SUCCESS").is_file());
}

#[tokio::test]
async fn test_million_rows_sample_size() {
    let dir = TempDir::new().unwrap();
    let mut content = String::from("id,bucket\n");
    for i in 0..1_000_000u32 {
        writeln!(content, "{},{}", i, i % 97).unwrap();
    }
    let big = csv(dir.path(), "big", &content);
    let mut config = job_config(dir.path(), 0.01, 100_000);
    config.sampling.seed = 42;

    let summary = run_job(&config, &[big], &NativeProfiler, |_| {})
        .await
        .unwrap();
    let report = summary.outcomes[0].result.as_ref().unwrap();
    assert_eq!(report.scanned_rows, 1_000_000);
    // mean 10,000, sd ~99.5; five sigma either way
    assert!(
        (9_500..=10_500).contains(&report.sampled_rows),
        "sampled {}",
        report.sampled_rows
    );
    assert_eq!(report.profile.row_count as usize, report.sampled_rows);
}

#[tokio::test]
async fn test_cap_bounds_sample() {
    let dir = TempDir::new().unwrap();
    let mut content = String::from("n\n");
    for i in 0..5_000 {
        writeln!(content, "{}", i).unwrap();
    }
    let numbers = csv(dir.path(), "numbers", &content);
    let config = job_config(dir.path(), 0.5, 100);

    let summary = run_job(&config, &[numbers], &NativeProfiler, |_| {})
        .await
        .unwrap();
    let report = summary.outcomes[0].result.as_ref().unwrap();
    assert_eq!(report.sampled_rows, 100);
    assert_eq!(read_artifact(&report.artifact).unwrap().num_rows(), 100);
}

#[tokio::test]
async fn test_zero_cap_writes_empty_artifact() {
    let dir = TempDir::new().unwrap();
    let numbers = csv(dir.path(), "numbers", "n,label\n1,a\n2,b\n3,c\n");
    let config = job_config(dir.path(), 1.0, 0);
    let profiler = DuckDbProfiler::in_memory().unwrap();

    let summary = run_job(&config, &[numbers], &profiler, |_| {})
        .await
        .unwrap();
    let report = summary.outcomes[0].result.as_ref().unwrap();
    assert_eq!(report.scanned_rows, 3);
    assert_eq!(report.sampled_rows, 0);
    assert_eq!(report.profile.row_count, 0);
    assert_eq!(report.profile.columns.len(), 2);

    let artifact = read_artifact(&report.artifact).unwrap();
    assert_eq!(artifact.num_rows(), 0);
    assert_eq!(artifact.column_names(), vec!["n", "label"]);
}

#[tokio::test]
async fn test_case_only_header_profiles_each_column() {
    let dir = TempDir::new().unwrap();
    let ids = csv(dir.path(), "ids", "ID,id\n1,\n2,\n3,\n");
    let config = job_config(dir.path(), 1.0, 100);
    let profiler = DuckDbProfiler::in_memory().unwrap();

    let summary = run_job(&config, &[ids], &profiler, |_| {}).await.unwrap();
    let profile = &summary.outcomes[0].result.as_ref().unwrap().profile;
    let counts: Vec<(&str, u64, u64)> = profile
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.null_count, c.distinct_count))
        .collect();
    assert_eq!(counts, vec![("ID", 0, 3), ("id", 3, 0)]);
}

#[tokio::test]
async fn test_reruns_produce_identical_artifacts() {
    let dir = TempDir::new().unwrap();
    let mut content = String::from("id,city\n");
    for i in 0..10_000 {
        writeln!(content, "{},c{}", i, i % 11).unwrap();
    }
    let consumer = csv(dir.path(), "consumer", &content);

    let mut tables = Vec::new();
    for workers in [1, 4] {
        let mut config = job_config(dir.path(), 0.05, 100_000);
        config.sampling.workers = workers;
        let summary = run_job(&config, &[consumer.clone()], &NativeProfiler, |_| {})
            .await
            .unwrap();
        let report = summary.outcomes[0].result.as_ref().unwrap();
        tables.push(read_artifact(&report.artifact).unwrap());
    }
    assert!(tables[0].same_content(&tables[1]));

    let leftovers: Vec<String> = std::fs::read_dir(dir.path().join("data/processed/samples"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(leftovers, vec!["consumer_sample".to_string()]);
}

#[tokio::test]
async fn test_missing_source_is_skipped() {
    let dir = TempDir::new().unwrap();
    let missing = DatasetDescriptor::new(
        DatasetName::try_new("order").unwrap(),
        dir.path().join("raw/order/order.json"),
        Format::Json,
    );
    let present = csv(dir.path(), "restaurant", "id,cuisine\n1,thai\n2,\n");
    let config = job_config(dir.path(), 1.0, 100);

    let summary = run_job(&config, &[missing, present], &NativeProfiler, |_| {})
        .await
        .unwrap();
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.succeeded(), 1);
    assert!(matches!(
        summary.outcomes[0].result,
        Err(PipelineError::Engine(sv_engine::EngineError::SourceUnavailable { .. }))
    ));
    assert!(!dir
        .path()
        .join("data/processed/samples/order_sample")
        .exists());
    assert_eq!(summary.outcomes[1].name, "restaurant");
}
