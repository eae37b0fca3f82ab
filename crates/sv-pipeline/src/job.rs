//! The sampling job
//!
//! Per dataset: read, sample, cap, persist, profile. Datasets run one after
//! another in declared order; parallelism lives inside the sampler.

use crate::error::{PipelineError, PipelineResult};
use crate::profiler::Profiler;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sv_core::{
    Config, DatasetDescriptor, DatasetName, DatasetProfile, SamplingConfig, WriterConfig,
};
use sv_engine::{ArtifactWriter, ExecutionContext};

/// Everything a job needs, resolved from [`Config`] once at startup
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub sampling: SamplingConfig,
    pub writer: WriterConfig,

    /// Columns to profile per dataset
    pub max_cols: usize,

    /// Absolute directory receiving `<name>_sample/` artifacts
    pub output_dir: PathBuf,
}

impl JobConfig {
    pub fn from_config(config: &Config, root: &Path) -> Self {
        Self {
            sampling: config.sampling.clone(),
            writer: config.writer.clone(),
            max_cols: config.profile.max_cols,
            output_dir: config.output_dir_absolute(root),
        }
    }

    /// Artifact directory of a dataset
    pub fn artifact_dir(&self, dataset: &DatasetDescriptor) -> PathBuf {
        self.output_dir.join(dataset.artifact_dir_name())
    }
}

/// A successful dataset run
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    /// Artifact directory written
    pub artifact: PathBuf,

    /// Rows in the raw table
    pub scanned_rows: usize,

    /// Malformed raw records that were kept
    pub malformed_records: usize,

    /// Rows in the persisted sample
    pub sampled_rows: usize,

    /// Size of the written part file
    pub bytes_written: u64,

    pub profile: DatasetProfile,

    #[serde(skip)]
    pub duration: Duration,
}

/// Result of one dataset run
#[derive(Debug)]
pub struct DatasetOutcome {
    pub name: DatasetName,
    pub result: PipelineResult<DatasetReport>,
}

impl DatasetOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Progress notifications emitted while a job runs
#[derive(Debug)]
pub enum JobEvent<'a> {
    /// A dataset is about to be processed
    Started {
        name: &'a DatasetName,
        index: usize,
        total: usize,
    },
    /// A dataset finished, successfully or not
    Finished(&'a DatasetOutcome),
}

/// Outcomes of all datasets, in processing order
#[derive(Debug, Default)]
pub struct JobSummary {
    pub outcomes: Vec<DatasetOutcome>,
}

impl JobSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// True if every dataset succeeded
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// A configured job, holding the worker pool across datasets
pub struct SampleJob<'a> {
    config: &'a JobConfig,
    context: ExecutionContext,
    writer: ArtifactWriter,
    profiler: &'a dyn Profiler,
}

impl<'a> SampleJob<'a> {
    pub fn new(config: &'a JobConfig, profiler: &'a dyn Profiler) -> PipelineResult<Self> {
        Ok(Self {
            config,
            context: ExecutionContext::new(config.sampling.workers)?,
            writer: ArtifactWriter::new(&config.writer),
            profiler,
        })
    }

    /// Process one dataset end to end
    pub async fn run_one(&self, dataset: &DatasetDescriptor) -> PipelineResult<DatasetReport> {
        let start = Instant::now();
        let sampling = &self.config.sampling;

        let frame = self
            .context
            .read(dataset)
            .sample(sampling.fraction, sampling.seed)
            .limit(sampling.cap);
        let collected = self.context.collect(&frame)?;

        let dest = self.config.artifact_dir(dataset);
        let info = self.writer.write(&collected.table, &dest)?;

        let profile = self
            .profiler
            .profile(dataset.name.as_str(), &dest, self.config.max_cols)
            .await?;

        Ok(DatasetReport {
            artifact: info.path,
            scanned_rows: collected.scanned_rows,
            malformed_records: collected.malformed_records,
            sampled_rows: info.rows,
            bytes_written: info.bytes,
            profile,
            duration: start.elapsed(),
        })
    }

    /// Process datasets in order, continuing past failures
    pub async fn run<F>(&self, datasets: &[DatasetDescriptor], mut on_event: F) -> JobSummary
    where
        F: FnMut(JobEvent<'_>),
    {
        let total = datasets.len();
        let mut summary = JobSummary::default();

        for (index, dataset) in datasets.iter().enumerate() {
            on_event(JobEvent::Started {
                name: &dataset.name,
                index,
                total,
            });
            log::info!(
                "Sampling {} ({}/{}) from {}",
                dataset.name,
                index + 1,
                total,
                dataset.source_path.display()
            );

            let result = self.run_one(dataset).await;
            match &result {
                Ok(report) => log::info!(
                    "{}: {} of {} rows -> {}",
                    dataset.name,
                    report.sampled_rows,
                    report.scanned_rows,
                    report.artifact.display()
                ),
                Err(e) => log::warn!("{}: skipped: {}", dataset.name, e),
            }

            let outcome = DatasetOutcome {
                name: dataset.name.clone(),
                result,
            };
            on_event(JobEvent::Finished(&outcome));
            summary.outcomes.push(outcome);
        }
        summary
    }
}

/// Run a job over `datasets`.
///
/// Only a failure to set up the job is returned as an error; dataset
/// failures are reported in the summary.
pub async fn run_job<F>(
    config: &JobConfig,
    datasets: &[DatasetDescriptor],
    profiler: &dyn Profiler,
    on_event: F,
) -> PipelineResult<JobSummary>
where
    F: FnMut(JobEvent<'_>),
{
    let job = SampleJob::new(config, profiler)?;
    Ok(job.run(datasets, on_event).await)
}

/// Keep only the datasets named in `filter`, in configured order
pub fn select_datasets(
    datasets: Vec<DatasetDescriptor>,
    filter: &[String],
) -> Result<Vec<DatasetDescriptor>, PipelineError> {
    if filter.is_empty() {
        return Ok(datasets);
    }
    if let Some(unknown) = filter
        .iter()
        .find(|name| !datasets.iter().any(|d| d.name == name.as_str()))
    {
        return Err(PipelineError::Core(sv_core::CoreError::ConfigInvalid {
            message: format!("unknown dataset '{}'", unknown),
        }));
    }
    Ok(datasets
        .into_iter()
        .filter(|d| filter.iter().any(|name| d.name == name.as_str()))
        .collect())
}

#[cfg(test)]
#[path = "job_test.rs"]
mod tests;
