//! Indexed flat-file record stores.
//!
//! A store is a pair of files: an append-only data blob and a sorted text index
//! mapping each accession to the byte range of its record. The same type serves
//! every dataset (sequences, C-alpha traces, pLDDT, descriptions, similarity
//! lists); what the bytes mean is decided by the caller.

pub mod index;
pub mod reader;
pub mod writer;

pub use index::IndexEntry;
pub use reader::{Handle, IndexedRecordStore, Lookup};
pub use writer::StoreWriter;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed index '{path}' at line {line}: {message}", path = path.display())]
    IndexParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Index '{path}' is not sorted by key: '{previous}' is followed by '{next}'", path = path.display())]
    UnsortedIndex {
        path: PathBuf,
        previous: String,
        next: String,
    },

    #[error(
        "Record '{key}' spans bytes {offset}..+{length}, beyond the {data_len}-byte data file"
    )]
    RangeOutOfBounds {
        key: String,
        offset: u64,
        length: u64,
        data_len: u64,
    },

    #[error("Records '{first}' and '{second}' overlap in the data file")]
    OverlappingRanges { first: String, second: String },

    #[error("Data file '{path}' is too large to map on this platform", path = path.display())]
    DataTooLarge { path: PathBuf },

    #[error("Key {0:?} is empty or contains a tab or line break")]
    InvalidKey(String),

    #[error("Duplicate key '{0}' written to store")]
    DuplicateKey(String),
}
