//! sv-db - Database layer for Sieve
//!
//! This crate provides the `Database` trait and its DuckDB implementation,
//! used to compute column profiles directly over persisted Parquet samples.

pub mod duckdb;
pub mod error;
pub mod sql;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use sql::{glob_escape, parquet_relation, quote_literal};
pub use traits::{ColumnCounts, Database, RelationCounts};
