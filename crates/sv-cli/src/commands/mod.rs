//! Command implementations

pub mod common;
pub mod fetch;
pub mod profile;
pub mod sample;
