//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sieve - deterministic sampling and profiling of raw datasets
#[derive(Parser, Debug)]
#[command(name = "sieve")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download raw source files
    Fetch(FetchArgs),

    /// Sample every dataset, persist the samples and profile them
    Sample(SampleArgs),

    /// Profile an existing sample without resampling
    Profile(ProfileArgs),
}

/// Arguments for the fetch command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Resource names to download (comma-separated, default: all)
    #[arg(short, long)]
    pub resources: Option<String>,

    /// Continue partial downloads
    #[arg(long)]
    pub resume: bool,
}

/// Arguments for the sample command
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Dataset names to sample (comma-separated, default: all)
    #[arg(short, long)]
    pub datasets: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the profile command
#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Dataset whose sample to profile
    pub dataset: String,

    /// Profile at most this many leading columns
    #[arg(long)]
    pub max_cols: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Report formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// JSON document on stdout
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
