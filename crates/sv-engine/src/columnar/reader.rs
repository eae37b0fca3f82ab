//! Artifact reader

use super::{convert, SUCCESS_MARKER};
use crate::error::{EngineError, EngineResult};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use sv_core::{Field, Table};

/// Read a complete artifact back into a table
pub fn read_artifact(dir: &Path) -> EngineResult<Table> {
    let parts = artifact_parts(dir)?;
    let mut fields: Option<Vec<Field>> = None;
    let mut rows = Vec::new();

    for part in &parts {
        let builder = open_part(dir, part)?;
        let part_fields =
            convert::from_arrow_schema(builder.schema()).map_err(|e| read_error(dir, e))?;
        match &fields {
            Some(existing) if *existing != part_fields => {
                return Err(read_error(
                    dir,
                    format!("{} has a different schema", part.display()),
                ))
            }
            Some(_) => {}
            None => fields = Some(part_fields.clone()),
        }

        let reader = builder.build().map_err(|e| read_error(dir, e))?;
        for batch in reader {
            let batch = batch.map_err(|e| read_error(dir, e))?;
            convert::from_record_batch(&batch, &part_fields, &mut rows)
                .map_err(|e| read_error(dir, e))?;
        }
    }

    let fields = fields.ok_or_else(|| read_error(dir, "no part files"))?;
    Ok(Table::try_from_rows(fields, rows)?)
}

/// Schema of a complete artifact, without reading any rows
pub fn read_schema(dir: &Path) -> EngineResult<Vec<Field>> {
    let parts = artifact_parts(dir)?;
    let first = parts
        .first()
        .ok_or_else(|| read_error(dir, "no part files"))?;
    let builder = open_part(dir, first)?;
    convert::from_arrow_schema(builder.schema()).map_err(|e| read_error(dir, e))
}

/// Sorted `*.parquet` part files of a complete artifact
pub fn artifact_parts(dir: &Path) -> EngineResult<Vec<PathBuf>> {
    if !dir.join(SUCCESS_MARKER).is_file() {
        return Err(EngineError::IncompleteArtifact {
            path: dir.display().to_string(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|e| read_error(dir, e))?;
    let mut parts = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| read_error(dir, e))?.path();
        if path.extension().is_some_and(|ext| ext == "parquet") {
            parts.push(path);
        }
    }
    parts.sort();
    Ok(parts)
}

fn open_part(dir: &Path, part: &Path) -> EngineResult<ParquetRecordBatchReaderBuilder<File>> {
    let file = File::open(part).map_err(|e| read_error(dir, e))?;
    ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| read_error(dir, e))
}

fn read_error(dir: &Path, message: impl ToString) -> EngineError {
    EngineError::ArtifactRead {
        path: dir.display().to_string(),
        message: message.to_string(),
    }
}
