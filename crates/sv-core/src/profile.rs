//! Column profile report types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary statistics for one column of a materialized sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name
    pub name: String,

    /// Number of non-null cells
    pub non_null_count: u64,

    /// Number of distinct non-null values
    pub distinct_count: u64,

    /// `row_count - non_null_count`
    pub null_count: u64,
}

impl ColumnProfile {
    /// Build a profile, deriving the null count from the row count
    pub fn new(name: impl Into<String>, row_count: u64, non_null_count: u64, distinct_count: u64) -> Self {
        Self {
            name: name.into(),
            non_null_count,
            distinct_count,
            null_count: row_count.saturating_sub(non_null_count),
        }
    }
}

/// Profile of one persisted sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetProfile {
    /// Logical dataset name
    pub dataset_name: String,

    /// Rows in the persisted sample
    pub row_count: u64,

    /// Profiled columns, in table order
    pub columns: Vec<ColumnProfile>,
}

impl DatasetProfile {
    /// Look up a column profile by name
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl fmt::Display for DatasetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {}: {} rows", self.dataset_name, self.row_count)?;
        for column in &self.columns {
            writeln!(
                f,
                "- {}: nulls={}, distinct={}",
                column.name, column.null_count, column.distinct_count
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
