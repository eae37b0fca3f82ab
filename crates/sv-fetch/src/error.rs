//! Error types for sv-fetch

use thiserror::Error;

/// Download errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// F001: Server answered with a non-success status
    #[error("[F001] Transfer failed for {url}: HTTP {status}")]
    TransferFailure { url: String, status: u16 },

    /// F002: Connection, TLS or body stream error
    #[error("[F002] Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// F003: Local filesystem error
    #[error("[F003] I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// F004: HTTP client could not be built
    #[error("[F004] Failed to build HTTP client: {0}")]
    Client(String),
}

/// Result type alias for FetchError
pub type FetchResult<T> = Result<T, FetchError>;
