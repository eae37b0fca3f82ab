//! Permissive JSON reader
//!
//! Accepts JSON Lines (one object per line) or a single top-level array of
//! objects. Columns appear in order of first appearance.

use crate::error::{EngineError, EngineResult};
use crate::ingest::Ingested;
use std::collections::HashMap;
use std::path::Path;
use sv_core::{DataType, Field, Table, Value, CORRUPT_RECORD_COLUMN};

/// Parse JSON records into a raw table
pub fn parse_json(bytes: &[u8], path: &Path) -> EngineResult<Ingested> {
    let text = String::from_utf8_lossy(bytes);
    let mut builder = RecordBuilder::default();

    let trimmed = text.trim();
    let parsed_as_array = trimmed.starts_with('[')
        && match serde_json::from_str::<Vec<serde_json::Value>>(trimmed) {
            Ok(records) => {
                for record in records {
                    builder.push_json(record);
                }
                true
            }
            Err(e) => match split_array(trimmed) {
                Some(elements) => {
                    log::debug!(
                        "{}: malformed JSON array ({}), parsing elements one by one",
                        path.display(),
                        e
                    );
                    for raw in elements {
                        match serde_json::from_str::<serde_json::Value>(raw) {
                            Ok(record) => builder.push_json_line(record, raw),
                            Err(_) => builder.push_corrupt(raw.to_string()),
                        }
                    }
                    true
                }
                None => {
                    log::debug!(
                        "{} is not a JSON array ({}), reading it line by line",
                        path.display(),
                        e
                    );
                    false
                }
            },
        };

    if !parsed_as_array {
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<serde_json::Value>(line) {
                Ok(record) => builder.push_json_line(record, line),
                Err(_) => builder.push_corrupt(line.to_string()),
            }
        }
    }

    builder.finish(path)
}

/// Raw top-level elements of a JSON array, split at depth-one commas.
///
/// Only strings and bracket depth are tracked, so a malformed element stays
/// confined to its own slice. An unterminated array yields what it has.
/// Returns `None` when non-whitespace follows the closing bracket, meaning
/// the text is not a single array (JSON Lines whose first record is one).
fn split_array(text: &str) -> Option<Vec<&str>> {
    let bytes = text.as_bytes();
    let mut elements = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 1;
    let mut end = None;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => depth += 1,
            b']' | b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    elements.push(&text[start..i]);
                    end = Some(i);
                    break;
                }
            }
            b',' if depth == 1 => {
                elements.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    match end {
        Some(i) if !text[i + 1..].trim().is_empty() => return None,
        Some(_) => {}
        None => elements.push(&text[start.min(text.len())..]),
    }
    Some(
        elements
            .into_iter()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .collect(),
    )
}

/// Accumulates heterogeneous records, growing the schema as new keys appear
#[derive(Default)]
struct RecordBuilder {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    types: Vec<Option<DataType>>,
    rows: Vec<Vec<Value>>,
    corrupt: Vec<Option<String>>,
    malformed: usize,
}

impl RecordBuilder {
    fn push_json(&mut self, record: serde_json::Value) {
        match record {
            serde_json::Value::Object(map) => self.push_object(map),
            other => self.push_corrupt(other.to_string()),
        }
    }

    fn push_json_line(&mut self, record: serde_json::Value, raw: &str) {
        match record {
            serde_json::Value::Object(map) => self.push_object(map),
            _ => self.push_corrupt(raw.to_string()),
        }
    }

    fn push_object(&mut self, map: serde_json::Map<String, serde_json::Value>) {
        let mut row = vec![Value::Null; self.columns.len()];
        for (key, json) in map {
            let idx = self.column_slot(key);
            if idx >= row.len() {
                row.resize(idx + 1, Value::Null);
            }
            let value = json_to_value(json);
            self.types[idx] = DataType::unify_opt(self.types[idx], value.data_type());
            row[idx] = value;
        }
        self.rows.push(row);
        self.corrupt.push(None);
    }

    fn push_corrupt(&mut self, raw: String) {
        self.rows.push(Vec::new());
        self.corrupt.push(Some(raw));
        self.malformed += 1;
    }

    fn column_slot(&mut self, key: String) -> usize {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.columns.len();
        self.index.insert(key.clone(), idx);
        self.columns.push(key);
        self.types.push(None);
        idx
    }

    fn finish(self, path: &Path) -> EngineResult<Ingested> {
        let has_corrupt = self.malformed > 0;
        let width = self.columns.len();

        let mut fields: Vec<Field> = self
            .columns
            .into_iter()
            .zip(&self.types)
            .map(|(name, ty)| Field::new(name, ty.unwrap_or(DataType::Text)))
            .collect();
        if has_corrupt {
            let name = unused_name(CORRUPT_RECORD_COLUMN, &self.index);
            fields.push(Field::new(name, DataType::Corrupt));
        }
        if fields.is_empty() {
            return Err(EngineError::EmptySource {
                path: path.display().to_string(),
            });
        }

        let column_types: Vec<DataType> = fields.iter().map(|f| f.data_type).collect();
        let mut table = Table::new(fields);
        for (row, corrupt) in self.rows.into_iter().zip(self.corrupt) {
            let mut cells: Vec<Value> = row
                .into_iter()
                .chain(std::iter::repeat(Value::Null))
                .take(width)
                .zip(&column_types)
                .map(|(value, ty)| value.coerce(*ty))
                .collect();
            if has_corrupt {
                cells.push(corrupt.map_or(Value::Null, Value::Corrupt));
            }
            table.push_row(cells)?;
        }

        Ok(Ingested {
            table,
            malformed_records: self.malformed,
        })
    }
}

/// `base`, or `base` suffixed with the first free column index
fn unused_name(base: &str, taken: &HashMap<String, usize>) -> String {
    if !taken.contains_key(base) {
        return base.to_string();
    }
    (taken.len()..)
        .map(|idx| format!("{}{}", base, idx))
        .find(|candidate| !taken.contains_key(candidate))
        .unwrap_or_else(|| base.to_string())
}

fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::Integer(i),
            (None, Some(f)) => Value::Float(f),
            (None, None) => Value::Text(n.to_string()),
        },
        serde_json::Value::String(s) => Value::Text(s),
        nested => Value::Text(nested.to_string()),
    }
}
