use super::StoreError;
use super::index::IndexEntry;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Produces a data/index pair readable by
/// [`IndexedRecordStore`](super::IndexedRecordStore).
///
/// Records are appended to the data file in call order; the index is sorted
/// by key only when [`finish`](Self::finish) writes it.
pub struct StoreWriter {
    data_path: PathBuf,
    index_path: PathBuf,
    data: BufWriter<File>,
    entries: Vec<IndexEntry>,
    offset: u64,
}

impl StoreWriter {
    pub fn create(data_path: &Path, index_path: &Path) -> Result<Self, StoreError> {
        let file = File::create(data_path).map_err(|e| StoreError::Io {
            path: data_path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            data_path: data_path.to_path_buf(),
            index_path: index_path.to_path_buf(),
            data: BufWriter::new(file),
            entries: Vec::new(),
            offset: 0,
        })
    }

    /// Appends one record. Keys must be non-empty and free of tabs and line
    /// breaks, since they are written verbatim into the index.
    pub fn append(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        if key.is_empty() || key.contains(['\t', '\n', '\r']) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        self.data.write_all(bytes).map_err(|e| StoreError::Io {
            path: self.data_path.clone(),
            source: e,
        })?;
        let length = bytes.len() as u64;
        self.entries.push(IndexEntry {
            key: key.to_string(),
            offset: self.offset,
            length,
        });
        self.offset += length;
        Ok(())
    }

    /// Flushes the data file and writes the sorted index.
    ///
    /// Returns the number of records written.
    pub fn finish(mut self) -> Result<usize, StoreError> {
        self.data.flush().map_err(|e| StoreError::Io {
            path: self.data_path.clone(),
            source: e,
        })?;

        self.entries
            .sort_unstable_by(|a, b| a.key.as_bytes().cmp(b.key.as_bytes()));
        if let Some(pair) = self.entries.windows(2).find(|p| p[0].key == p[1].key) {
            return Err(StoreError::DuplicateKey(pair[0].key.clone()));
        }

        let index_err = |e: io::Error| StoreError::Io {
            path: self.index_path.clone(),
            source: e,
        };
        let file = File::create(&self.index_path).map_err(index_err)?;
        let mut index = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(BufWriter::new(file));
        for entry in &self.entries {
            index
                .serialize(entry)
                .map_err(|e| index_err(e.into()))?;
        }
        index.flush().map_err(index_err)?;

        Ok(self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::IndexedRecordStore;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn index_is_written_sorted_with_running_offsets() {
        let dir = tempdir().unwrap();
        let data_path = dir.path().join("db");
        let index_path = dir.path().join("db.index");

        let mut writer = StoreWriter::create(&data_path, &index_path).unwrap();
        writer.append("P002", b"second").unwrap();
        writer.append("P001", b"first").unwrap();
        assert_eq!(writer.finish().unwrap(), 2);

        assert_eq!(fs::read(&data_path).unwrap(), b"secondfirst");
        assert_eq!(
            fs::read_to_string(&index_path).unwrap(),
            "P001\t6\t5\nP002\t0\t6\n"
        );
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let mut writer =
            StoreWriter::create(&dir.path().join("db"), &dir.path().join("db.index")).unwrap();
        writer.append("P001", b"a").unwrap();
        writer.append("P001", b"b").unwrap();
        let err = writer.finish().unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(key) if key == "P001"));
    }

    #[test]
    fn keys_that_would_break_the_index_are_rejected() {
        let dir = tempdir().unwrap();
        let mut writer =
            StoreWriter::create(&dir.path().join("db"), &dir.path().join("db.index")).unwrap();

        for key in ["A\t0\t2\nB", "P001\n", "P\r1", ""] {
            let err = writer.append(key, b"hello").unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey(k) if k == key));
        }

        writer.append("P001", b"hello").unwrap();
        assert_eq!(writer.finish().unwrap(), 1);
        assert_eq!(fs::read(dir.path().join("db")).unwrap(), b"hello");
    }

    #[test]
    fn written_store_reopens_with_the_same_records() {
        let dir = tempdir().unwrap();
        let data_path = dir.path().join("db");
        let index_path = dir.path().join("db.index");

        let mut writer = StoreWriter::create(&data_path, &index_path).unwrap();
        writer.append("Q9 with space", b"xyz").unwrap();
        writer.append("P001", b"").unwrap();
        writer.finish().unwrap();

        let store = IndexedRecordStore::open("db", &data_path, &index_path).unwrap();
        assert_eq!(store.get("Q9 with space"), Some(&b"xyz"[..]));
        assert_eq!(store.get("P001"), Some(&b""[..]));
    }
}
