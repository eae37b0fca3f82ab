//! sv-fetch - HTTP acquisition for Sieve
//!
//! Downloads land in `<dest>.part` and are renamed into place only once the
//! body has been fully received, so a present destination file is always
//! complete.

pub mod error;
pub mod fetcher;

pub use error::{FetchError, FetchResult};
pub use fetcher::{part_path, FetchReport, Fetcher};
