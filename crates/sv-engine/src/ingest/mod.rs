//! Ingestion adapters: raw file on disk -> raw table
//!
//! Parsing is permissive. A malformed record never fails the dataset; it is
//! kept as a row (with nulls, or with its raw text in `_corrupt_record` for
//! JSON) and counted in [`Ingested::malformed_records`]. Only an unreadable
//! file or a file with no structure at all is an error.

mod csv_source;
mod json_source;

use crate::error::{EngineError, EngineResult};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use sv_core::{DatasetDescriptor, Format, Table};

pub use csv_source::parse_csv;
pub use json_source::parse_json;

/// A parsed raw table plus parse diagnostics
#[derive(Debug, Clone)]
pub struct Ingested {
    /// The raw table
    pub table: Table,

    /// Records that were kept despite failing to parse cleanly
    pub malformed_records: usize,
}

/// Read and parse the raw file of a dataset
pub fn ingest(descriptor: &DatasetDescriptor) -> EngineResult<Ingested> {
    let path = descriptor.source_path.as_path();
    let bytes = read_source(path, descriptor.gzip)?;
    log::debug!(
        "Read {} bytes from {} ({}{})",
        bytes.len(),
        path.display(),
        descriptor.format,
        if descriptor.gzip { ", gzip" } else { "" }
    );

    let ingested = match descriptor.format {
        Format::Json => parse_json(&bytes, path)?,
        Format::Csv => parse_csv(&bytes, path)?,
    };

    if ingested.malformed_records > 0 {
        log::warn!(
            "{}: kept {} malformed record(s) from {}",
            descriptor.name,
            ingested.malformed_records,
            path.display()
        );
    }
    Ok(ingested)
}

/// Read a whole file, decompressing gzip when asked to
fn read_source(path: &Path, gzip: bool) -> EngineResult<Vec<u8>> {
    let unavailable = |source: std::io::Error| EngineError::SourceUnavailable {
        path: path.display().to_string(),
        source,
    };

    let file = File::open(path).map_err(unavailable)?;
    let mut bytes = Vec::new();
    if gzip {
        GzDecoder::new(file)
            .read_to_end(&mut bytes)
            .map_err(unavailable)?;
    } else {
        let mut file = file;
        file.read_to_end(&mut bytes).map_err(unavailable)?;
    }
    Ok(bytes)
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
