//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use sv_core::Config;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main.rs never prints it
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Exit code when at least one dataset or resource failed
pub(crate) const EXIT_PARTIAL_FAILURE: i32 = 2;

/// A loaded configuration and the project root it is relative to
pub(crate) struct Project {
    pub root: PathBuf,
    pub config: Config,
}

/// Load configuration from `--config` or the project directory
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = global.project_dir.clone();
    let config = match &global.config {
        Some(path) => Config::load(path),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load configuration")?;

    if global.verbose {
        eprintln!(
            "[verbose] Project root: {} ({} datasets, {} resources)",
            root.display(),
            config.datasets.len(),
            config.resources.len()
        );
    }
    Ok(Project { root, config })
}

/// Split a comma-separated CLI list, dropping empty items
pub(crate) fn parse_list(arg: &Option<String>) -> Vec<String> {
    arg.as_deref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Human-readable byte count
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
