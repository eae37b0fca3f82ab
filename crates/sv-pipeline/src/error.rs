//! Error types for sv-pipeline

use sv_core::CoreError;
use sv_db::DbError;
use sv_engine::EngineError;
use thiserror::Error;

/// Failure of a single dataset run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for PipelineError
pub type PipelineResult<T> = Result<T, PipelineError>;
