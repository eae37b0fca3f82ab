//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Non-null and distinct counts of one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCounts {
    pub non_null: u64,
    pub distinct: u64,
}

/// Row count plus per-column counts of a relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationCounts {
    pub row_count: u64,

    /// One entry per counted column, in column order
    pub columns: Vec<ColumnCounts>,
}

/// Database abstraction trait for Sieve
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Row count and non-null / distinct counts of the first `count` of the
    /// `width` columns of `relation`, computed in a single scan.
    ///
    /// Columns are addressed by position, so names that differ only in case
    /// are counted separately. Distinct counts exclude nulls.
    async fn column_counts(
        &self,
        relation: &str,
        width: usize,
        count: usize,
    ) -> DbResult<RelationCounts>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
