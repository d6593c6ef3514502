//! Decoded record types returned by the query workflows.

pub mod similar;
pub mod structure;

pub use similar::SimilarHit;
pub use structure::{StructurePayload, StructureRecord, record_text, trim_record};
