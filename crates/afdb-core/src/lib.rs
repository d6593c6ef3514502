//! # AFDB Clusters Core Library
//!
//! Read-only data plane for serving AlphaFold database clusters: indexed
//! record stores, the compact C-alpha trace codec, and an NCBI taxonomy tree
//! with fast lineage queries.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless stores, codecs, the taxonomy tree
//!   and record models. Every value is immutable once built.
//!
//! - **[`engine`]: The Runtime.** Configuration, the shared [`engine::context::AppContext`],
//!   progress reporting and the aggregate error type.
//!
//! - **[`workflows`]: The Public API.** Startup loading, per-request queries and
//!   dataset verification, tying `engine` and `core` together.

pub mod core;
pub mod engine;
pub mod workflows;
