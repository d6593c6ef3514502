//! # Workflows Module
//!
//! Top-level entry points for users of the library.
//!
//! - **Load** ([`load`]) - Startup: taxonomy (cold or warm) followed by the five record stores
//! - **Query** ([`query`]) - Per-request lookups: descriptions, structures, similars, taxonomy filters
//! - **Verify** ([`verify`]) - Whole-dataset C-alpha trace validation, parallel when enabled

pub mod load;
pub mod query;
pub mod verify;

#[cfg(test)]
pub(crate) mod fixtures;
