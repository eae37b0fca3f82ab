//! Column profilers over persisted artifacts
//!
//! Profiles are always computed from the artifact on disk, never from the
//! in-memory sample, so they describe exactly what a consumer will read.

use crate::error::PipelineResult;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use sv_core::{ColumnProfile, DatasetProfile, ProfileBackend};
use sv_db::{parquet_relation, Database, DuckDbBackend};
use sv_engine::{artifact_parts, profile_table, read_artifact, read_schema};

/// Computes a [`DatasetProfile`] for an artifact directory
#[async_trait]
pub trait Profiler: Send + Sync {
    /// Profile the first `max_cols` columns of the artifact at `dir`
    async fn profile(&self, name: &str, dir: &Path, max_cols: usize)
        -> PipelineResult<DatasetProfile>;

    /// Backend identifier for logging
    fn backend(&self) -> ProfileBackend;
}

/// Reads the artifact back into memory and counts there
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeProfiler;

#[async_trait]
impl Profiler for NativeProfiler {
    async fn profile(
        &self,
        name: &str,
        dir: &Path,
        max_cols: usize,
    ) -> PipelineResult<DatasetProfile> {
        let table = read_artifact(dir)?;
        Ok(profile_table(name, &table, max_cols))
    }

    fn backend(&self) -> ProfileBackend {
        ProfileBackend::Native
    }
}

/// Runs one aggregate query over the Parquet files of the artifact
pub struct DuckDbProfiler {
    db: Arc<dyn Database>,
}

impl DuckDbProfiler {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Profiler backed by a fresh in-memory DuckDB connection
    pub fn in_memory() -> PipelineResult<Self> {
        Ok(Self::new(Arc::new(DuckDbBackend::in_memory()?)))
    }
}

#[async_trait]
impl Profiler for DuckDbProfiler {
    async fn profile(
        &self,
        name: &str,
        dir: &Path,
        max_cols: usize,
    ) -> PipelineResult<DatasetProfile> {
        // Both check the completion marker
        let parts = artifact_parts(dir)?;
        let fields = read_schema(dir)?;
        let width = fields.len();
        let columns: Vec<String> = fields
            .into_iter()
            .take(max_cols)
            .map(|f| f.name)
            .collect();

        let counts = self
            .db
            .column_counts(&parquet_relation(&parts), width, columns.len())
            .await?;
        log::debug!(
            "{}: profiled {} columns with {}",
            name,
            columns.len(),
            self.db.db_type()
        );

        let columns = columns
            .into_iter()
            .zip(counts.columns)
            .map(|(column, c)| ColumnProfile::new(column, counts.row_count, c.non_null, c.distinct))
            .collect();
        Ok(DatasetProfile {
            dataset_name: name.to_string(),
            row_count: counts.row_count,
            columns,
        })
    }

    fn backend(&self) -> ProfileBackend {
        ProfileBackend::DuckDb
    }
}

/// Build the profiler selected in configuration
pub fn profiler_for(backend: ProfileBackend) -> PipelineResult<Arc<dyn Profiler>> {
    Ok(match backend {
        ProfileBackend::DuckDb => Arc::new(DuckDbProfiler::in_memory()?),
        ProfileBackend::Native => Arc::new(NativeProfiler),
    })
}

#[cfg(test)]
#[path = "profiler_test.rs"]
mod tests;
