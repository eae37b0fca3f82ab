//! Dataset descriptors: which raw file to read and how to parse it

use crate::error::{CoreError, CoreResult};
use crate::newtype_string::define_newtype_string;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

define_newtype_string! {
    /// Logical dataset name.
    ///
    /// Used as a path component for both the raw and the output area, so it
    /// must be non-empty and free of path separators.
    pub struct DatasetName where is_valid_dataset_name;
}

fn is_valid_dataset_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
}

/// Raw file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Line-delimited JSON records
    Json,
    /// Comma-separated values with a header row
    Csv,
}

impl Format {
    /// Infer the format from a file name, looking through a trailing `.gz`
    pub fn from_path(path: &Path) -> Option<Format> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        let ext = Path::new(name).extension()?.to_str()?;
        match ext {
            "json" | "jsonl" | "ndjson" => Some(Format::Json),
            "csv" => Some(Format::Csv),
            _ => None,
        }
    }

    /// Canonical file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Compression of the raw file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Gzip if the path ends in `.gz`
    #[default]
    Auto,
    Gzip,
    None,
}

impl Compression {
    /// Resolve `Auto` against a concrete path
    pub fn is_gzip(&self, path: &Path) -> bool {
        match self {
            Compression::Gzip => true,
            Compression::None => false,
            Compression::Auto => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("gz")),
        }
    }
}

/// Dataset entry as written in the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSpec {
    /// Logical dataset name
    pub name: DatasetName,

    /// Source file, relative to the project root.
    /// Defaults to `<raw_dir>/<name>/<name>.<format>`.
    #[serde(default)]
    pub path: Option<String>,

    /// Source format; inferred from the path when omitted
    #[serde(default)]
    pub format: Option<Format>,

    /// Source compression
    #[serde(default)]
    pub compression: Compression,
}

impl DatasetSpec {
    /// Dataset with a default path under the raw directory
    pub fn new(name: DatasetName, format: Format) -> Self {
        Self {
            name,
            path: None,
            format: Some(format),
            compression: Compression::Auto,
        }
    }

    /// Dataset with an explicit path
    pub fn with_path(name: DatasetName, path: impl Into<String>, format: Format) -> Self {
        Self {
            name,
            path: Some(path.into()),
            format: Some(format),
            compression: Compression::Auto,
        }
    }

    /// Resolve into a descriptor with an absolute source path and a known format
    pub fn resolve(&self, root: &Path, raw_dir: &str) -> CoreResult<DatasetDescriptor> {
        let (source_path, format) = match (&self.path, self.format) {
            (Some(path), Some(format)) => (root.join(path), format),
            (Some(path), None) => {
                let source_path = root.join(path);
                let format =
                    Format::from_path(&source_path).ok_or_else(|| CoreError::ConfigInvalid {
                        message: format!(
                            "dataset '{}': cannot infer format from '{}', set `format`",
                            self.name, path
                        ),
                    })?;
                (source_path, format)
            }
            (None, Some(format)) => (
                root.join(raw_dir)
                    .join(self.name.as_str())
                    .join(format!("{}.{}", self.name, format.extension())),
                format,
            ),
            (None, None) => {
                return Err(CoreError::ConfigInvalid {
                    message: format!("dataset '{}' needs a `path` or a `format`", self.name),
                })
            }
        };

        Ok(DatasetDescriptor {
            gzip: self.compression.is_gzip(&source_path),
            name: self.name.clone(),
            source_path,
            format,
        })
    }
}

/// Fully resolved dataset, immutable for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDescriptor {
    /// Logical dataset name
    pub name: DatasetName,

    /// Absolute path of the raw file
    pub source_path: PathBuf,

    /// Raw file format
    pub format: Format,

    /// Whether the raw file is gzip-compressed
    pub gzip: bool,
}

impl DatasetDescriptor {
    /// Descriptor for an uncompressed file
    pub fn new(name: DatasetName, source_path: impl Into<PathBuf>, format: Format) -> Self {
        let source_path = source_path.into();
        Self {
            gzip: Compression::Auto.is_gzip(&source_path),
            name,
            source_path,
            format,
        }
    }

    /// Name of the output artifact directory
    pub fn artifact_dir_name(&self) -> String {
        format!("{}_sample", self.name)
    }
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;
