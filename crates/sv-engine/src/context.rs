//! Plan execution

use crate::error::{EngineError, EngineResult};
use crate::ingest::ingest;
use crate::plan::{LazyFrame, LogicalPlan};
use crate::sampler;
use sv_core::{DatasetDescriptor, Table};

/// Result of executing a plan
#[derive(Debug, Clone)]
pub struct Collected {
    /// The materialized table
    pub table: Table,

    /// Malformed records seen while scanning
    pub malformed_records: usize,

    /// Rows in the raw table before sampling
    pub scanned_rows: usize,
}

/// Owns the worker pool that executes plans.
///
/// Create one per job and reuse it across datasets.
pub struct ExecutionContext {
    pool: rayon::ThreadPool,
}

impl ExecutionContext {
    /// Create a context with `workers` threads; 0 uses all available cores
    pub fn new(workers: usize) -> EngineResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("sieve-worker-{}", i))
            .build()
            .map_err(|e| EngineError::WorkerPool(e.to_string()))?;
        log::debug!("Execution context started with {} workers", pool.current_num_threads());
        Ok(Self { pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Plan a scan of a dataset. Nothing is read until `collect`.
    pub fn read(&self, dataset: &DatasetDescriptor) -> LazyFrame {
        LazyFrame::scan(dataset.clone())
    }

    /// Execute a plan and materialize its table
    pub fn collect(&self, frame: &LazyFrame) -> EngineResult<Collected> {
        let plan = frame.plan();
        plan.validate()?;
        log::debug!("Executing plan:\n{}", plan);
        self.pool.install(|| execute(plan))
    }
}

fn execute(plan: &LogicalPlan) -> EngineResult<Collected> {
    match plan {
        LogicalPlan::Scan { dataset } => {
            let ingested = ingest(dataset)?;
            Ok(Collected {
                scanned_rows: ingested.table.num_rows(),
                malformed_records: ingested.malformed_records,
                table: ingested.table,
            })
        }
        LogicalPlan::Sample {
            input,
            fraction,
            seed,
        } => {
            let mut collected = execute(input)?;
            let mask = sampler::inclusion_mask(&collected.table, *seed, *fraction);
            collected.table.retain_mask(&mask);
            Ok(collected)
        }
        LogicalPlan::Limit { input, n } => {
            let mut collected = execute(input)?;
            collected.table.truncate(*n);
            Ok(collected)
        }
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
