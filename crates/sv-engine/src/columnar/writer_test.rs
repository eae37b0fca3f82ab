use super::*;
use crate::columnar::{read_artifact, read_schema};
use sv_core::{DataType, Field, Value};
use tempfile::TempDir;

fn people(n: i64) -> Table {
    Table::try_from_rows(
        vec![
            Field::new("id", DataType::Integer),
            Field::new("name", DataType::Text),
        ],
        (0..n)
            .map(|i| vec![Value::Integer(i), Value::Text(format!("person-{}", i))])
            .collect(),
    )
    .unwrap()
}

fn writer() -> ArtifactWriter {
    ArtifactWriter::new(&WriterConfig::default())
}

#[test]
fn test_write_layout_and_read_back() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("samples").join("people_sample");
    let table = people(10);

    let info = writer().write(&table, &dest).unwrap();
    assert_eq!(info.rows, 10);
    assert!(info.bytes > 0);
    assert!(dest.join(PART_FILE).is_file());
    assert!(dest.join(SUCCESS_MARKER).is_file());

    let back = read_artifact(&dest).unwrap();
    assert!(back.same_content(&table));
    assert_eq!(read_schema(&dest).unwrap(), table.fields());
}

#[test]
fn test_empty_table_keeps_schema() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("empty_sample");
    writer().write(&people(0), &dest).unwrap();

    let back = read_artifact(&dest).unwrap();
    assert_eq!(back.num_rows(), 0);
    assert_eq!(back.column_names(), vec!["id", "name"]);
}

#[test]
fn test_rewrite_replaces_previous_artifact() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("people_sample");
    writer().write(&people(10), &dest).unwrap();
    writer().write(&people(3), &dest).unwrap();

    assert_eq!(read_artifact(&dest).unwrap().num_rows(), 3);
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 1, "{:?}", leftovers);
}

fn sibling_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_table_without_columns_is_rejected() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("people_sample");
    writer().write(&people(5), &dest).unwrap();

    let err = writer().write(&Table::default(), &dest).unwrap_err();
    assert!(err.to_string().contains("[W001]"));
    assert_eq!(read_artifact(&dest).unwrap().num_rows(), 5);
}

#[test]
fn test_unwritable_parent_is_write_failure() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("samples");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let err = writer()
        .write(&people(3), &blocker.join("people_sample"))
        .unwrap_err();
    assert!(matches!(err, EngineError::WriteFailure { .. }), "{}", err);
    assert_eq!(sibling_names(dir.path()), vec!["samples"]);
}

#[cfg(unix)]
#[test]
fn test_failed_write_keeps_previous_artifact() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let parent = dir.path().join("samples");
    let dest = parent.join("people_sample");
    writer().write(&people(5), &dest).unwrap();

    std::fs::set_permissions(&parent, std::fs::Permissions::from_mode(0o555)).unwrap();
    // Permission bits do not bind a privileged user
    if std::fs::create_dir(parent.join("writable-check")).is_ok() {
        std::fs::set_permissions(&parent, std::fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }
    let result = writer().write(&people(2), &dest);
    std::fs::set_permissions(&parent, std::fs::Permissions::from_mode(0o755)).unwrap();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("[W001]"), "{}", err);
    assert_eq!(read_artifact(&dest).unwrap().num_rows(), 5);
    assert_eq!(sibling_names(&parent), vec!["people_sample"]);
}

#[test]
fn test_interrupted_swap_is_recovered_on_next_write() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("people_sample");
    writer().write(&people(5), &dest).unwrap();

    // State left by a crash between moving the old artifact aside and
    // publishing the new one
    let backup = dir.path().join(".people_sample.old-1234");
    std::fs::rename(&dest, &backup).unwrap();
    let staging = dir.path().join(".people_sample.staging-5678");
    std::fs::create_dir(&staging).unwrap();
    std::fs::write(staging.join(PART_FILE), b"partial").unwrap();

    writer().write(&people(2), &dest).unwrap();
    assert_eq!(read_artifact(&dest).unwrap().num_rows(), 2);
    assert_eq!(sibling_names(dir.path()), vec!["people_sample"]);
}

#[test]
fn test_stale_siblings_of_other_artifacts_are_left_alone() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join(".orders_sample.staging-1");
    std::fs::create_dir(&other).unwrap();

    writer()
        .write(&people(1), &dir.path().join("people_sample"))
        .unwrap();
    assert!(other.is_dir());
}

#[test]
fn test_every_codec_round_trips() {
    let dir = TempDir::new().unwrap();
    let table = people(50);
    for (i, compression) in [
        WriterCompression::Snappy,
        WriterCompression::Zstd,
        WriterCompression::Lz4,
        WriterCompression::Gzip,
        WriterCompression::None,
    ]
    .into_iter()
    .enumerate()
    {
        let config = WriterConfig {
            compression,
            row_group_size: 7,
        };
        let dest = dir.path().join(format!("codec{}_sample", i));
        ArtifactWriter::new(&config).write(&table, &dest).unwrap();
        assert!(read_artifact(&dest).unwrap().same_content(&table));
    }
}

#[test]
fn test_directory_without_marker_is_incomplete() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("people_sample");
    writer().write(&people(2), &dest).unwrap();
    std::fs::remove_file(dest.join(SUCCESS_MARKER)).unwrap();

    let err = read_artifact(&dest).unwrap_err();
    assert!(matches!(err, EngineError::IncompleteArtifact { .. }));
    assert!(read_schema(&dest).is_err());
}
