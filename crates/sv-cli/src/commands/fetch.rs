//! Fetch command implementation

use anyhow::{bail, Context, Result};
use sv_core::Resource;
use sv_fetch::Fetcher;

use crate::cli::{FetchArgs, GlobalArgs};
use crate::commands::common::{
    format_bytes, load_project, parse_list, ExitCode, EXIT_PARTIAL_FAILURE,
};

/// Execute the fetch command
pub async fn execute(args: &FetchArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let config = &project.config;

    let filter = parse_list(&args.resources);
    if let Some(unknown) = filter
        .iter()
        .find(|name| !config.resources.iter().any(|r| &r.name == *name))
    {
        bail!("Unknown resource '{}'", unknown);
    }
    let resources: Vec<&Resource> = config
        .resources
        .iter()
        .filter(|r| filter.is_empty() || filter.contains(&r.name))
        .collect();

    let fetcher = Fetcher::new(&config.fetch)
        .context("Failed to create downloader")?
        .with_resume(args.resume || config.fetch.resume)
        .with_progress(true);

    println!("Fetching {} resources...\n", resources.len());

    let mut success_count = 0;
    let mut failure_count = 0;
    let mut total_bytes = 0u64;

    for resource in resources {
        let dest = config.resource_path(&project.root, resource);
        if global.verbose {
            eprintln!("[verbose] {} -> {}", resource.url, dest.display());
        }

        match fetcher.fetch(&resource.url, &dest).await {
            Ok(report) => {
                success_count += 1;
                total_bytes += report.bytes_written;
                println!(
                    "  ✓ {} ({}{}) → {}",
                    resource.name,
                    format_bytes(report.bytes_written),
                    if report.resumed { ", resumed" } else { "" },
                    report.path.display()
                );
            }
            Err(e) => {
                failure_count += 1;
                log::warn!("{}: download failed: {}", resource.name, e);
                println!("  ✗ {} - {}", resource.name, e);
            }
        }
    }

    println!();
    println!(
        "Fetched {} resources ({}), {} failed",
        success_count,
        format_bytes(total_bytes),
        failure_count
    );

    if failure_count > 0 {
        return Err(ExitCode(EXIT_PARTIAL_FAILURE).into());
    }
    Ok(())
}
