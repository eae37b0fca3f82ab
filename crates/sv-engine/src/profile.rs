//! In-memory column profiling

use std::collections::HashSet;
use sv_core::{ColumnProfile, DatasetProfile, Table};

/// Null and distinct counts for the first `max_cols` columns of a table.
///
/// Distinct counts are exact and exclude nulls.
pub fn profile_table(name: &str, table: &Table, max_cols: usize) -> DatasetProfile {
    let row_count = table.num_rows() as u64;
    let columns = table
        .fields()
        .iter()
        .take(max_cols)
        .enumerate()
        .map(|(idx, field)| {
            let mut distinct = HashSet::new();
            let mut non_null = 0u64;
            for key in table.column(idx).filter_map(|v| v.key()) {
                non_null += 1;
                distinct.insert(key);
            }
            ColumnProfile::new(field.name.clone(), row_count, non_null, distinct.len() as u64)
        })
        .collect();

    DatasetProfile {
        dataset_name: name.to_string(),
        row_count,
        columns,
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
