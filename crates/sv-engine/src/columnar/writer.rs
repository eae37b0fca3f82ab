//! Atomic Parquet artifact writer
//!
//! Lifecycle: stage into a hidden sibling directory, write the part file,
//! fsync, drop the `_SUCCESS` marker, then rename over the destination.
//! A failed write leaves the previous artifact untouched.

use super::{convert, PART_FILE, SUCCESS_MARKER};
use crate::error::{EngineError, EngineResult};
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::{WriterProperties, WriterVersion};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sv_core::{Table, WriterCompression, WriterConfig};

/// What a successful write produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactInfo {
    /// Artifact directory
    pub path: PathBuf,

    /// Rows written
    pub rows: usize,

    /// Size of the part file in bytes
    pub bytes: u64,
}

/// Writes tables as Parquet artifact directories
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    config: WriterConfig,
}

impl ArtifactWriter {
    pub fn new(config: &WriterConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn properties(&self) -> WriterProperties {
        let compression = match self.config.compression {
            WriterCompression::Snappy => Compression::SNAPPY,
            WriterCompression::Zstd => Compression::ZSTD(ZstdLevel::default()),
            WriterCompression::Lz4 => Compression::LZ4_RAW,
            WriterCompression::Gzip => Compression::GZIP(GzipLevel::default()),
            WriterCompression::None => Compression::UNCOMPRESSED,
        };
        WriterProperties::builder()
            .set_writer_version(WriterVersion::PARQUET_2_0)
            .set_compression(compression)
            .set_max_row_group_size(self.config.row_group_size.max(1))
            .build()
    }

    /// Write `table` to the artifact directory `dest`, replacing any
    /// previous artifact there
    pub fn write(&self, table: &Table, dest: &Path) -> EngineResult<ArtifactInfo> {
        let fail = |message: String| EngineError::WriteFailure {
            path: dest.display().to_string(),
            message,
        };

        if table.num_columns() == 0 {
            return Err(fail("table has no columns".to_string()));
        }

        let parent = dest
            .parent()
            .ok_or_else(|| fail("destination has no parent directory".to_string()))?;
        let name = dest
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| fail("destination has no file name".to_string()))?;
        fs::create_dir_all(parent)
            .map_err(|e| fail(format!("failed to create {}: {}", parent.display(), e)))?;
        recover_interrupted(parent, name, dest);

        let staging = parent.join(format!(".{}.staging-{}", name, uuid::Uuid::new_v4()));
        let result = self
            .write_staged(table, &staging)
            .and_then(|bytes| replace_dir(&staging, dest, parent, name).map(|()| bytes));

        match result {
            Ok(bytes) => {
                log::debug!(
                    "Wrote {} rows ({} bytes) to {}",
                    table.num_rows(),
                    bytes,
                    dest.display()
                );
                Ok(ArtifactInfo {
                    path: dest.to_path_buf(),
                    rows: table.num_rows(),
                    bytes,
                })
            }
            Err(message) => {
                if staging.exists() {
                    if let Err(e) = fs::remove_dir_all(&staging) {
                        log::warn!("Failed to clean up {}: {}", staging.display(), e);
                    }
                }
                Err(fail(message))
            }
        }
    }

    fn write_staged(&self, table: &Table, staging: &Path) -> Result<u64, String> {
        fs::create_dir(staging)
            .map_err(|e| format!("failed to create {}: {}", staging.display(), e))?;

        let part = staging.join(PART_FILE);
        let file = File::create(&part)
            .map_err(|e| format!("failed to create {}: {}", part.display(), e))?;

        let schema = Arc::new(convert::to_arrow_schema(table.fields()));
        let mut writer = ArrowWriter::try_new(file, schema, Some(self.properties()))
            .map_err(|e| e.to_string())?;
        if table.num_rows() > 0 {
            let batch = convert::to_record_batch(table).map_err(|e| e.to_string())?;
            writer.write(&batch).map_err(|e| e.to_string())?;
        }
        let file = writer.into_inner().map_err(|e| e.to_string())?;
        file.sync_all().map_err(|e| e.to_string())?;
        let bytes = file.metadata().map_err(|e| e.to_string())?.len();

        File::create(staging.join(SUCCESS_MARKER))
            .and_then(|marker| marker.sync_all())
            .map_err(|e| format!("failed to write {}: {}", SUCCESS_MARKER, e))?;

        Ok(bytes)
    }
}

/// Clean up after a write that was interrupted mid-way.
///
/// A backup holding a complete artifact is moved back when `dest` is
/// missing; every other `.<name>.staging-*` / `.<name>.old-*` sibling is
/// removed.
fn recover_interrupted(parent: &Path, name: &str, dest: &Path) {
    let entries = match fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Failed to list {}: {}", parent.display(), e);
            return;
        }
    };
    let staging_prefix = format!(".{}.staging-", name);
    let backup_prefix = format!(".{}.old-", name);

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let path = entry.path();
        let is_backup = file_name.starts_with(&backup_prefix);
        if !is_backup && !file_name.starts_with(&staging_prefix) {
            continue;
        }

        if is_backup && !dest.exists() && path.join(SUCCESS_MARKER).is_file() {
            match fs::rename(&path, dest) {
                Ok(()) => {
                    log::warn!("Restored {} from {}", dest.display(), path.display());
                    continue;
                }
                Err(e) => log::warn!("Failed to restore {}: {}", dest.display(), e),
            }
        }
        log::warn!("Removing leftover {}", path.display());
        if let Err(e) = fs::remove_dir_all(&path) {
            log::warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

/// Move `staging` to `dest`, keeping the old `dest` until the move succeeded
fn replace_dir(staging: &Path, dest: &Path, parent: &Path, name: &str) -> Result<(), String> {
    if !dest.exists() {
        return fs::rename(staging, dest)
            .map_err(|e| format!("failed to publish {}: {}", dest.display(), e));
    }

    let backup = parent.join(format!(".{}.old-{}", name, uuid::Uuid::new_v4()));
    fs::rename(dest, &backup)
        .map_err(|e| format!("failed to move aside {}: {}", dest.display(), e))?;

    if let Err(e) = fs::rename(staging, dest) {
        if let Err(restore) = fs::rename(&backup, dest) {
            log::error!(
                "Failed to restore {} from {}: {}",
                dest.display(),
                backup.display(),
                restore
            );
        }
        return Err(format!("failed to publish {}: {}", dest.display(), e));
    }

    if let Err(e) = fs::remove_dir_all(&backup) {
        log::warn!("Failed to remove old artifact {}: {}", backup.display(), e);
    }
    Ok(())
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod tests;
