//! Configuration types and parsing for sieve.yml

use crate::dataset::{DatasetDescriptor, DatasetName, DatasetSpec, Format};
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// File names searched for in the project directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["sieve.yml", "sieve.yaml"];

/// Main configuration from sieve.yml
///
/// Every field has a default, so an empty file (or no file at all) yields the
/// built-in job: the four public datasets sampled at 1% with seed 42.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding raw downloads, relative to the project root
    #[serde(default = "default_raw_dir")]
    pub raw_dir: String,

    /// Directory receiving one `<name>_sample/` artifact per dataset
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Sampling policy shared by all datasets
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Column profiling settings
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Columnar writer settings
    #[serde(default)]
    pub writer: WriterConfig,

    /// Datasets to sample, processed in declared order
    #[serde(default = "default_datasets")]
    pub datasets: Vec<DatasetSpec>,

    /// Remote resources downloaded by `sieve fetch`
    #[serde(default = "default_resources")]
    pub resources: Vec<Resource>,

    /// Download settings
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Sampling policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    /// Inclusion probability per row, in (0, 1]
    pub fraction: f64,

    /// Seed of the per-row inclusion draw
    pub seed: u64,

    /// Absolute row ceiling applied after sampling
    pub cap: usize,

    /// Sampler threads; 0 uses all available cores
    pub workers: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            fraction: 0.01,
            seed: 42,
            cap: 100_000,
            workers: 0,
        }
    }
}

/// Which engine computes column profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileBackend {
    /// Aggregate queries in DuckDB over the persisted Parquet files
    #[default]
    DuckDb,
    /// In-process counting over the artifact read back into memory
    Native,
}

impl fmt::Display for ProfileBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileBackend::DuckDb => write!(f, "duckdb"),
            ProfileBackend::Native => write!(f, "native"),
        }
    }
}

/// Column profiling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// Profile at most this many leading columns
    pub max_cols: usize,

    /// Aggregation backend
    pub backend: ProfileBackend,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            max_cols: 10,
            backend: ProfileBackend::default(),
        }
    }
}

/// Parquet compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriterCompression {
    #[default]
    Snappy,
    Zstd,
    Lz4,
    Gzip,
    None,
}

/// Columnar writer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterConfig {
    /// Compression codec for data pages
    pub compression: WriterCompression,

    /// Maximum rows per Parquet row group
    pub row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: WriterCompression::default(),
            row_group_size: 100_000,
        }
    }
}

/// A named remote file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Resource {
    /// File name under the raw directory
    pub name: String,

    /// Source URL
    pub url: String,
}

/// Download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Continue partial downloads with HTTP range requests
    pub resume: bool,

    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            resume: false,
            connect_timeout_secs: 30,
        }
    }
}

fn default_raw_dir() -> String {
    "data/raw".to_string()
}

fn default_output_dir() -> String {
    "data/processed/samples".to_string()
}

fn builtin_name(name: &str) -> DatasetName {
    DatasetName::try_new(name).unwrap_or_else(|| unreachable!("built-in dataset name {name}"))
}

fn default_datasets() -> Vec<DatasetSpec> {
    vec![
        DatasetSpec::new(builtin_name("order"), Format::Json),
        DatasetSpec::new(builtin_name("consumer"), Format::Csv),
        DatasetSpec::new(builtin_name("restaurant"), Format::Csv),
        DatasetSpec::with_path(
            builtin_name("ab_test"),
            "data/raw/ab_test_ref/ab_test_ref.csv",
            Format::Csv,
        ),
    ]
}

const SOURCE_BUCKET: &str = "https://data-architect-test-source.s3-sa-east-1.amazonaws.com";

fn default_resources() -> Vec<Resource> {
    vec![Resource {
        name: "consumer.csv.gz".to_string(),
        url: format!("{}/consumer.csv.gz", SOURCE_BUCKET),
    }]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
            output_dir: default_output_dir(),
            sampling: SamplingConfig::default(),
            profile: ProfileConfig::default(),
            writer: WriterConfig::default(),
            datasets: default_datasets(),
            resources: default_resources(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

        let config = Self::from_yaml(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        // An empty document deserializes to unit, not to an empty mapping
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory, falling back to defaults
    /// when no sieve.yml / sieve.yaml is present
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        log::debug!(
            "No config file in {}, using built-in defaults",
            dir.display()
        );
        Ok(Self::default())
    }

    /// Check value ranges and name uniqueness
    pub fn validate(&self) -> CoreResult<()> {
        let fraction = self.sampling.fraction;
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(invalid(format!(
                "sampling.fraction must be in (0, 1], got {}",
                fraction
            )));
        }

        if self.writer.row_group_size == 0 {
            return Err(invalid("writer.row_group_size must be positive".to_string()));
        }

        let mut names = HashSet::new();
        for dataset in &self.datasets {
            if !names.insert(dataset.name.as_str()) {
                return Err(invalid(format!("duplicate dataset name '{}'", dataset.name)));
            }
        }

        let mut resources = HashSet::new();
        for resource in &self.resources {
            if resource.name.is_empty()
                || resource.name.starts_with('.')
                || resource.name.contains(['/', '\\'])
            {
                return Err(invalid(format!(
                    "resource name '{}' must be a plain file name",
                    resource.name
                )));
            }
            if !(resource.url.starts_with("http://") || resource.url.starts_with("https://")) {
                return Err(invalid(format!(
                    "resource '{}' has unsupported url '{}'",
                    resource.name, resource.url
                )));
            }
            if !resources.insert(resource.name.as_str()) {
                return Err(invalid(format!("duplicate resource name '{}'", resource.name)));
            }
        }

        Ok(())
    }

    /// Absolute raw directory for a project root
    pub fn raw_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.raw_dir)
    }

    /// Absolute output directory for a project root
    pub fn output_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }

    /// Artifact directory of a dataset: `<output_dir>/<name>_sample`
    pub fn artifact_dir(&self, root: &Path, name: &DatasetName) -> PathBuf {
        self.output_dir_absolute(root)
            .join(format!("{}_sample", name))
    }

    /// Destination of a downloaded resource
    pub fn resource_path(&self, root: &Path, resource: &Resource) -> PathBuf {
        self.raw_dir_absolute(root).join(&resource.name)
    }

    /// Resolve all datasets in declared order
    pub fn descriptors(&self, root: &Path) -> CoreResult<Vec<DatasetDescriptor>> {
        self.datasets
            .iter()
            .map(|spec| spec.resolve(root, &self.raw_dir))
            .collect()
    }

    /// Look up a dataset spec by name
    pub fn get_dataset(&self, name: &str) -> Option<&DatasetSpec> {
        self.datasets.iter().find(|d| d.name == name)
    }
}

fn invalid(message: String) -> CoreError {
    CoreError::ConfigInvalid { message }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
