//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{ColumnCounts, Database, RelationCounts};
use async_trait::async_trait;
use duckdb::Connection;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn column_counts_sync(
        &self,
        relation: &str,
        width: usize,
        count: usize,
    ) -> DbResult<RelationCounts> {
        let count = count.min(width);
        let mut select = vec!["COUNT(*)".to_string()];
        for idx in 0..count {
            let ident = positional_ident(idx);
            select.push(format!("COUNT({ident})"));
            select.push(format!("COUNT(DISTINCT {ident})"));
        }
        // DuckDB resolves identifiers case-insensitively; rename every column
        // positionally so `ID` and `id` stay distinct
        let source = if width == 0 {
            relation.to_string()
        } else {
            let aliases: Vec<String> = (0..width).map(positional_ident).collect();
            format!("{} AS t({})", relation, aliases.join(", "))
        };
        let sql = format!("SELECT {} FROM {}", select.join(", "), source);
        log::debug!("Profile query: {}", sql);

        let conn = self.lock()?;
        let counts: Vec<i64> = conn.query_row(&sql, [], |row| {
            (0..select.len()).map(|i| row.get::<_, i64>(i)).collect()
        })?;

        let columns = counts[1..]
            .chunks_exact(2)
            .map(|pair| ColumnCounts {
                non_null: pair[0] as u64,
                distinct: pair[1] as u64,
            })
            .collect();
        Ok(RelationCounts {
            row_count: counts[0] as u64,
            columns,
        })
    }
}

fn positional_ident(idx: usize) -> String {
    format!("c{}", idx)
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn column_counts(
        &self,
        relation: &str,
        width: usize,
        count: usize,
    ) -> DbResult<RelationCounts> {
        self.column_counts_sync(relation, width, count)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
