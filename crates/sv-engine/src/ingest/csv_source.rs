//! Permissive CSV reader
//!
//! The first record is the header. Ragged rows are padded with nulls or
//! truncated to the header width and counted as malformed. Column types are
//! inferred over the whole file before any cell is converted.

use crate::error::{EngineError, EngineResult};
use crate::ingest::Ingested;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use sv_core::{DataType, Field, Table, Value};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse CSV bytes into a raw table
pub fn parse_csv(bytes: &[u8], path: &Path) -> EngineResult<Ingested> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    read_csv(bytes, path)
}

pub(super) fn read_csv<R: Read>(input: R, path: &Path) -> EngineResult<Ingested> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut records = reader.byte_records();
    let header = match records.next() {
        Some(Ok(header)) => header,
        Some(Err(e)) => {
            log::debug!("{}: unreadable header: {}", path.display(), e);
            return Err(empty(path));
        }
        None => return Err(empty(path)),
    };
    let names = column_names(header.iter().map(|h| String::from_utf8_lossy(h).into_owned()));
    if names.is_empty() {
        return Err(empty(path));
    }
    let width = names.len();

    let mut malformed = 0usize;
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in records {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::debug!("{}: unreadable record kept as nulls: {}", path.display(), e);
                malformed += 1;
                raw_rows.push(vec![String::new(); width]);
                continue;
            }
        };
        // A blank line parses as a single empty field
        if record.len() == 1 && record.get(0).is_some_and(|f| f.is_empty()) && width > 1 {
            continue;
        }
        if record.len() != width {
            malformed += 1;
        }
        let mut cells: Vec<String> = record
            .iter()
            .take(width)
            .map(|f| String::from_utf8_lossy(f).into_owned())
            .collect();
        cells.resize(width, String::new());
        raw_rows.push(cells);
    }

    let mut types: Vec<Option<DataType>> = vec![None; width];
    for row in &raw_rows {
        for (ty, cell) in types.iter_mut().zip(row) {
            *ty = DataType::unify_opt(*ty, DataType::infer_from_str(cell));
        }
    }
    let types: Vec<DataType> = types
        .into_iter()
        .map(|t| t.unwrap_or(DataType::Text))
        .collect();

    let fields = names
        .into_iter()
        .zip(&types)
        .map(|(name, ty)| Field::new(name, *ty))
        .collect();
    let mut table = Table::new(fields);
    for row in raw_rows {
        let values = row
            .iter()
            .zip(&types)
            .map(|(cell, ty)| Value::parse_as(cell, *ty))
            .collect();
        table.push_row(values)?;
    }

    Ok(Ingested {
        table,
        malformed_records: malformed,
    })
}

/// Header cells to unique column names.
///
/// Empty names become `_c<index>`; a repeated name gets its index appended.
fn column_names(header: impl Iterator<Item = String>) -> Vec<String> {
    let raw: Vec<String> = header.map(|h| h.trim().to_string()).collect();
    if raw.len() == 1 && raw[0].is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(raw.len());
    for (idx, name) in raw.iter().enumerate() {
        let base = if name.is_empty() {
            format!("_c{}", idx)
        } else {
            name.clone()
        };
        let repeated = raw.iter().filter(|other| *other == name).count() > 1;
        let mut candidate = if repeated && !name.is_empty() {
            format!("{}{}", base, idx)
        } else {
            base
        };
        while !seen.insert(candidate.clone()) {
            candidate.push('_');
        }
        names.push(candidate);
    }
    names
}

fn empty(path: &Path) -> EngineError {
    EngineError::EmptySource {
        path: path.display().to_string(),
    }
}
