//! sv-engine - Tabular engine for Sieve
//!
//! Work is split into two phases. [`ExecutionContext::read`] and the
//! [`LazyFrame`] combinators only build a [`LogicalPlan`]; nothing touches
//! the filesystem until [`ExecutionContext::collect`] executes it.
//!
//! The crate also owns the Parquet artifact format ([`columnar`]) and the
//! in-memory column profiler ([`profile`]).

pub mod columnar;
pub mod context;
pub mod error;
pub mod ingest;
pub mod plan;
pub mod profile;
pub mod sampler;

pub use columnar::{artifact_parts, read_artifact, read_schema, ArtifactInfo, ArtifactWriter};
pub use context::{Collected, ExecutionContext};
pub use error::{EngineError, EngineResult};
pub use ingest::{ingest, Ingested};
pub use plan::{LazyFrame, LogicalPlan};
pub use profile::profile_table;
