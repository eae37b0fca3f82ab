//! sv-core - Core library for Sieve
//!
//! This crate provides the shared types used across all Sieve components:
//! configuration parsing, dataset descriptors, the tagged value domain that
//! raw and sample tables are built from, and the column profile report.

pub mod config;
pub mod dataset;
pub mod error;
mod newtype_string;
pub mod profile;
pub mod table;
pub mod value;

pub use config::{
    Config, FetchConfig, ProfileBackend, ProfileConfig, Resource, SamplingConfig, WriterCompression,
    WriterConfig,
};
pub use dataset::{Compression, DatasetDescriptor, DatasetName, DatasetSpec, Format};
pub use error::{CoreError, CoreResult};
pub use profile::{ColumnProfile, DatasetProfile};
pub use table::{Field, Table};
pub use value::{DataType, Value, ValueKey, CORRUPT_RECORD_COLUMN};
