//! Parquet sample artifacts
//!
//! An artifact is a directory holding one or more `*.parquet` part files and
//! an empty `_SUCCESS` marker. The marker is written last, so a directory
//! without it is never read as a sample.

mod convert;
mod reader;
mod writer;

pub use convert::{from_arrow_schema, from_record_batch, to_arrow_schema, to_record_batch};
pub use reader::{artifact_parts, read_artifact, read_schema};
pub use writer::{ArtifactInfo, ArtifactWriter};

/// Name of the single part file written per artifact
pub const PART_FILE: &str = "part-00000.parquet";

/// Completion marker
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Arrow field metadata key carrying the Sieve column type when it differs
/// from what the Arrow type alone implies
pub const TYPE_METADATA_KEY: &str = "sieve.type";
