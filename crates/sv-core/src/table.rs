//! In-memory tables built from tagged values

use crate::error::{CoreError, CoreResult};
use crate::value::{DataType, Value};
use serde::{Deserialize, Serialize};

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name
    pub name: String,

    /// Column type; every non-null cell has this type
    pub data_type: DataType,
}

impl Field {
    /// Create a new field
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Row-major table with an ordered schema.
///
/// Used both for raw tables parsed from source files and for the sample
/// tables derived from them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    fields: Vec<Field>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given schema
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            rows: Vec::new(),
        }
    }

    /// Create a table from rows, checking every row against the schema width
    pub fn try_from_rows(fields: Vec<Field>, rows: Vec<Vec<Value>>) -> CoreResult<Self> {
        let mut table = Self::new(fields);
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<Value>) -> CoreResult<()> {
        if row.len() != self.fields.len() {
            return Err(CoreError::RowArity {
                row: self.rows.len(),
                expected: self.fields.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Iterate the cells of one column
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only the rows whose mask entry is `true`, preserving order
    pub fn retain_mask(&mut self, mask: &[bool]) {
        debug_assert_eq!(mask.len(), self.rows.len());
        let mut keep = mask.iter();
        self.rows.retain(|_| keep.next().copied().unwrap_or(false));
    }

    /// Keep at most `n` rows
    pub fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
    }

    /// Split into schema and rows
    pub fn into_parts(self) -> (Vec<Field>, Vec<Vec<Value>>) {
        (self.fields, self.rows)
    }

    /// Canonical byte encoding of one row
    pub fn encode_row(row: &[Value]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(row.len() * 9);
        for value in row {
            value.encode_canonical(&mut buf);
        }
        buf
    }

    /// True if both tables have the same schema and the same multiset of rows.
    ///
    /// Row order is ignored; column order is not.
    pub fn same_content(&self, other: &Table) -> bool {
        if self.fields != other.fields || self.rows.len() != other.rows.len() {
            return false;
        }
        let mut left: Vec<Vec<u8>> = self.rows.iter().map(|r| Self::encode_row(r)).collect();
        let mut right: Vec<Vec<u8>> = other.rows.iter().map(|r| Self::encode_row(r)).collect();
        left.sort_unstable();
        right.sort_unstable();
        left == right
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
