//! # Engine Module
//!
//! Runtime state and the plumbing shared by every workflow.
//!
//! - **Configuration** ([`config`]) - Dataset locations and the taxonomy startup policy
//! - **Application Context** ([`context`]) - The loaded stores and taxonomy, shared read-only
//! - **Progress Monitoring** ([`progress`]) - Optional callbacks for long-running workflows
//! - **Error Handling** ([`error`]) - The aggregate error type returned by workflows

pub mod config;
pub mod context;
pub mod error;
pub mod progress;
