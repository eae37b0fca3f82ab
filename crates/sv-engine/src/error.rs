//! Error types for sv-engine

use sv_core::CoreError;
use thiserror::Error;

/// Engine errors, one variant per failure class of a dataset run
#[derive(Error, Debug)]
pub enum EngineError {
    /// S001: Raw file missing or unreadable
    #[error("[S001] Source unavailable: {path}: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// S002: Raw file has no usable structure (no header, no records)
    #[error("[S002] Source has no columns: {path}")]
    EmptySource { path: String },

    /// S003: Plan parameters out of range
    #[error("[S003] Invalid plan: {0}")]
    InvalidPlan(String),

    /// S004: Worker pool could not be created
    #[error("[S004] Failed to start worker pool: {0}")]
    WorkerPool(String),

    /// W001: Artifact could not be written; any previous artifact is intact
    #[error("[W001] Write failed for {path}: {message}")]
    WriteFailure { path: String, message: String },

    /// W002: Artifact directory lacks the completion marker
    #[error("[W002] Incomplete artifact (no _SUCCESS marker): {path}")]
    IncompleteArtifact { path: String },

    /// W003: Artifact exists but could not be decoded
    #[error("[W003] Failed to read artifact {path}: {message}")]
    ArtifactRead { path: String, message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
