//! Error types for sv-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Relation could not be found or opened (D003)
    #[error("[D003] Relation not found: {0}")]
    RelationNotFound(String),

    /// Mutex poisoned (D006)
    #[error("[D006] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error has no structured variant for missing inputs
        let msg = err.to_string();
        if msg.contains("No files found that match the pattern")
            || (msg.contains("Catalog Error") && msg.contains("does not exist"))
        {
            DbError::RelationNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
