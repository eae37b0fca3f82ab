//! sv-pipeline - Sampling jobs for Sieve
//!
//! A job runs every configured dataset through read, sample, cap, persist
//! and profile. Datasets are independent: one failing is reported and the
//! job moves on to the next.

pub mod error;
pub mod job;
pub mod profiler;

pub use error::{PipelineError, PipelineResult};
pub use job::{
    run_job, select_datasets, DatasetOutcome, DatasetReport, JobConfig, JobEvent, JobSummary,
    SampleJob,
};
pub use profiler::{profiler_for, DuckDbProfiler, NativeProfiler, Profiler};
