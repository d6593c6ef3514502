use super::StoreError;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One record of a store index: the accession and the byte range it owns in
/// the paired data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub key: String,
    pub offset: u64,
    pub length: u64,
}

impl IndexEntry {
    /// Exclusive end of the byte range, or `None` if it does not fit in a `u64`.
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.length)
    }
}

/// Reads a tab-separated `key<TAB>offset<TAB>length` index.
///
/// The entries are returned in file order; ordering and range checks are the
/// job of [`validate`].
pub(crate) fn read_index<R: Read>(reader: R, path: &Path) -> Result<Vec<IndexEntry>, StoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(false)
        .quoting(false)
        .from_reader(reader);

    let mut entries = Vec::new();
    for (line_idx, record) in csv_reader.deserialize::<IndexEntry>().enumerate() {
        let entry = record.map_err(|e| StoreError::IndexParse {
            path: path.to_path_buf(),
            line: line_idx + 1,
            message: e.to_string(),
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Checks the invariants every opened index must satisfy against a data file
/// of `data_len` bytes: strictly ascending keys, in-bounds ranges and no two
/// ranges sharing a byte.
pub(crate) fn validate(entries: &[IndexEntry], data_len: u64, path: &Path) -> Result<(), StoreError> {
    for pair in entries.windows(2) {
        if pair[0].key.as_bytes() >= pair[1].key.as_bytes() {
            return Err(StoreError::UnsortedIndex {
                path: path.to_path_buf(),
                previous: pair[0].key.clone(),
                next: pair[1].key.clone(),
            });
        }
    }

    for entry in entries {
        match entry.end() {
            Some(end) if end <= data_len => {}
            _ => {
                return Err(StoreError::RangeOutOfBounds {
                    key: entry.key.clone(),
                    offset: entry.offset,
                    length: entry.length,
                    data_len,
                });
            }
        }
    }

    let mut by_offset: Vec<&IndexEntry> = entries.iter().filter(|e| e.length > 0).collect();
    by_offset.sort_unstable_by_key(|e| e.offset);
    for pair in by_offset.windows(2) {
        // Both ends were bounds-checked above.
        let first_end = pair[0].offset + pair[0].length;
        if first_end > pair[1].offset {
            return Err(StoreError::OverlappingRanges {
                first: pair[0].key.clone(),
                second: pair[1].key.clone(),
            });
        }
    }

    Ok(())
}
