//! Sample command implementation

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use sv_core::DatasetProfile;
use sv_pipeline::{
    profiler_for, run_job, select_datasets, DatasetOutcome, DatasetReport, JobConfig, JobEvent,
};

use crate::cli::{GlobalArgs, OutputFormat, SampleArgs};
use crate::commands::common::{
    format_bytes, load_project, parse_list, ExitCode, EXIT_PARTIAL_FAILURE,
};

/// Per-dataset entry of the JSON report
#[derive(Debug, Serialize)]
struct DatasetResult<'a> {
    dataset: &'a str,
    status: &'static str,
    #[serde(flatten)]
    report: Option<&'a DatasetReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the sample command
pub async fn execute(args: &SampleArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let config = &project.config;
    let text = args.output == OutputFormat::Text;

    let descriptors = config
        .descriptors(&project.root)
        .context("Failed to resolve datasets")?;
    let datasets = select_datasets(descriptors, &parse_list(&args.datasets))?;
    let job_config = JobConfig::from_config(config, &project.root);
    let profiler = profiler_for(config.profile.backend)
        .context("Failed to initialize profiler")?;

    if global.verbose {
        eprintln!(
            "[verbose] Profiling backend: {}, output: {}",
            profiler.backend(),
            job_config.output_dir.display()
        );
    }
    if text {
        println!(
            "Sampling {} datasets (fraction={}, seed={}, cap={})\n",
            datasets.len(),
            config.sampling.fraction,
            config.sampling.seed,
            config.sampling.cap
        );
    }

    let progress = if text {
        let pb = ProgressBar::new(datasets.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let summary = run_job(&job_config, &datasets, profiler.as_ref(), |event| {
        let Some(pb) = &progress else {
            return;
        };
        match event {
            JobEvent::Started { name, .. } => pb.set_message(name.to_string()),
            JobEvent::Finished(outcome) => {
                pb.suspend(|| print_outcome(outcome));
                pb.inc(1);
            }
        }
    })
    .await?;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if text {
        let total_rows: usize = summary
            .outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| r.sampled_rows)
            .sum();
        println!();
        println!(
            "Sampled {} of {} datasets ({} total rows), {} failed",
            summary.succeeded(),
            summary.outcomes.len(),
            total_rows,
            summary.failed()
        );
    } else {
        let results: Vec<DatasetResult<'_>> = summary
            .outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(report) => DatasetResult {
                    dataset: outcome.name.as_str(),
                    status: "success",
                    report: Some(report),
                    error: None,
                },
                Err(e) => DatasetResult {
                    dataset: outcome.name.as_str(),
                    status: "error",
                    report: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    if !summary.is_success() {
        return Err(ExitCode(EXIT_PARTIAL_FAILURE).into());
    }
    Ok(())
}

fn print_outcome(outcome: &DatasetOutcome) {
    match &outcome.result {
        Ok(report) => {
            println!(
                "  ✓ {} ({} of {} rows, {}) → {} [{}ms]",
                outcome.name,
                report.sampled_rows,
                report.scanned_rows,
                format_bytes(report.bytes_written),
                report.artifact.display(),
                report.duration.as_millis()
            );
            if report.malformed_records > 0 {
                println!("      {} malformed records kept", report.malformed_records);
            }
            print_profile(&report.profile);
        }
        Err(e) => println!("  ✗ {} - {}", outcome.name, e),
    }
}

fn print_profile(profile: &DatasetProfile) {
    for column in &profile.columns {
        println!(
            "      - {}: nulls={}, distinct={}",
            column.name, column.null_count, column.distinct_count
        );
    }
}
