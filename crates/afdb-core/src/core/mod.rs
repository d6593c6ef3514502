//! # Core Module
//!
//! Stateless building blocks shared by the engine and workflows.
//!
//! - [`store`] - Indexed flat-file record stores, memory-mapped and read-only once opened
//! - [`codec`] - The compact C-alpha trace codec and the decoded [`codec::CoordinateTrace`]
//! - [`taxonomy`] - The NCBI taxonomy tree, its dump parser and binary snapshot
//! - [`models`] - Decoded record types (structures, similarity hits)
//!
//! Nothing in this module holds global state; every value is immutable after
//! construction and can be shared across threads by reference.

pub mod codec;
pub mod models;
pub mod store;
pub mod taxonomy;
