//! Profile command implementation

use anyhow::{bail, Context, Result};
use sv_pipeline::profiler_for;

use crate::cli::{GlobalArgs, OutputFormat, ProfileArgs};
use crate::commands::common::load_project;

/// Execute the profile command
pub async fn execute(args: &ProfileArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let config = &project.config;

    let Some(spec) = config.get_dataset(&args.dataset) else {
        bail!("Unknown dataset '{}'", args.dataset);
    };
    let dir = config.artifact_dir(&project.root, &spec.name);
    let max_cols = args.max_cols.unwrap_or(config.profile.max_cols);

    if global.verbose {
        eprintln!(
            "[verbose] Profiling {} with {} backend",
            dir.display(),
            config.profile.backend
        );
    }

    let profiler = profiler_for(config.profile.backend)
        .context("Failed to initialize profiler")?;
    let profile = profiler
        .profile(spec.name.as_str(), &dir, max_cols)
        .await
        .with_context(|| format!("Failed to profile {}", spec.name))?;

    match args.output {
        OutputFormat::Text => print!("{}", profile),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profile)?),
    }
    Ok(())
}
