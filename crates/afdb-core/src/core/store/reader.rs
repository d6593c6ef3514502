use super::StoreError;
use super::index::{self, IndexEntry};
use memmap2::Mmap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument};

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque reference to one resolved index entry.
///
/// A handle is only meaningful for the store that returned it from
/// [`IndexedRecordStore::lookup`]; passing it to any other store panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    store: u64,
    slot: usize,
}

/// Outcome of a key lookup. An absent key is an ordinary result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Found(Handle),
    NotFound,
}

impl Lookup {
    pub fn found(self) -> Option<Handle> {
        match self {
            Lookup::Found(handle) => Some(handle),
            Lookup::NotFound => None,
        }
    }
}

#[derive(Debug)]
enum DataBytes {
    Mapped(Mmap),
    // Zero-length files cannot be mapped portably.
    Empty,
}

impl DataBytes {
    fn as_slice(&self) -> &[u8] {
        match self {
            DataBytes::Mapped(mmap) => mmap,
            DataBytes::Empty => &[],
        }
    }
}

/// A read-only, memory-mapped record store addressed by a sorted key index.
///
/// The whole index lives in memory; record bytes are served straight from the
/// mapping, so any number of threads may call [`fetch`](Self::fetch)
/// concurrently through a shared reference.
#[derive(Debug)]
pub struct IndexedRecordStore {
    id: u64,
    name: String,
    entries: Vec<IndexEntry>,
    data: DataBytes,
}

impl IndexedRecordStore {
    /// Opens a data file and its index.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read, the index is malformed
    /// or unsorted, or any indexed range falls outside the data file or
    /// overlaps another. All of these are fatal at startup.
    #[instrument(skip_all, name = "store_open", fields(store = %name.as_ref()))]
    pub fn open(
        name: impl AsRef<str>,
        data_path: &Path,
        index_path: &Path,
    ) -> Result<Self, StoreError> {
        let index_file = File::open(index_path).map_err(|e| StoreError::Io {
            path: index_path.to_path_buf(),
            source: e,
        })?;
        let entries = index::read_index(BufReader::new(index_file), index_path)?;
        debug!(entries = entries.len(), "Index parsed.");

        let data = map_data_file(data_path)?;
        let data_len = data.as_slice().len() as u64;
        index::validate(&entries, data_len, index_path)?;

        info!(
            entries = entries.len(),
            data_bytes = data_len,
            "Opened record store from {:?}",
            data_path
        );

        Ok(Self {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            name: name.as_ref().to_string(),
            entries,
            data,
        })
    }

    /// Resolves `key` by binary search over the in-memory index.
    pub fn lookup(&self, key: &str) -> Lookup {
        match self
            .entries
            .binary_search_by(|entry| entry.key.as_bytes().cmp(key.as_bytes()))
        {
            Ok(slot) => Lookup::Found(Handle {
                store: self.id,
                slot,
            }),
            Err(_) => Lookup::NotFound,
        }
    }

    /// Returns the record bytes behind `handle`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was issued by a different store.
    pub fn fetch(&self, handle: Handle) -> &[u8] {
        let entry = self.entry(handle);
        // Ranges were bounds-checked against the mapping at open.
        let start = entry.offset as usize;
        let end = start + entry.length as usize;
        &self.data.as_slice()[start..end]
    }

    /// Returns the record length without touching the data file.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was issued by a different store.
    pub fn length(&self, handle: Handle) -> u64 {
        self.entry(handle).length
    }

    /// Looks up and fetches in one step.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.lookup(key).found().map(|handle| self.fetch(handle))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates keys in index (sorted) order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    /// Iterates `(key, bytes)` pairs in index order.
    pub fn records(&self) -> impl ExactSizeIterator<Item = (&str, &[u8])> + '_ {
        let data = self.data.as_slice();
        self.entries.iter().map(move |entry| {
            let start = entry.offset as usize;
            (entry.key.as_str(), &data[start..start + entry.length as usize])
        })
    }

    fn entry(&self, handle: Handle) -> &IndexEntry {
        assert_eq!(
            handle.store, self.id,
            "handle from another store used against '{}'",
            self.name
        );
        &self.entries[handle.slot]
    }
}

fn map_data_file(path: &Path) -> Result<DataBytes, StoreError> {
    let io_err = |e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let file = File::open(path).map_err(io_err)?;
    let file_len = file.metadata().map_err(io_err)?.len();
    if file_len == 0 {
        return Ok(DataBytes::Empty);
    }
    if usize::try_from(file_len).is_err() {
        return Err(StoreError::DataTooLarge {
            path: path.to_path_buf(),
        });
    }
    // SAFETY: data files are never modified once indexed, so the mapping
    // cannot observe concurrent writes.
    let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;
    Ok(DataBytes::Mapped(mmap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::writer::StoreWriter;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::thread;
    use tempfile::{TempDir, tempdir};

    struct Fixture {
        _dir: TempDir,
        data_path: PathBuf,
        index_path: PathBuf,
    }

    fn write_files(data: &[u8], index: &str) -> Fixture {
        let dir = tempdir().unwrap();
        let data_path = dir.path().join("db");
        let index_path = dir.path().join("db.index");
        fs::write(&data_path, data).unwrap();
        fs::write(&index_path, index).unwrap();
        Fixture {
            _dir: dir,
            data_path,
            index_path,
        }
    }

    fn two_record_fixture() -> Fixture {
        let mut data = vec![b'a'; 120];
        data.extend(std::iter::repeat_n(b'b', 80));
        write_files(&data, "P001\t0\t120\nP002\t120\t80\n")
    }

    mod open_tests {
        use super::*;

        #[test]
        fn missing_data_file_is_fatal() {
            let fx = two_record_fixture();
            fs::remove_file(&fx.data_path).unwrap();
            let err = IndexedRecordStore::open("db", &fx.data_path, &fx.index_path).unwrap_err();
            assert!(matches!(err, StoreError::Io { .. }));
        }

        #[test]
        fn missing_index_file_is_fatal() {
            let fx = two_record_fixture();
            fs::remove_file(&fx.index_path).unwrap();
            let err = IndexedRecordStore::open("db", &fx.data_path, &fx.index_path).unwrap_err();
            assert!(matches!(err, StoreError::Io { .. }));
        }

        #[test]
        fn truncated_data_file_is_fatal() {
            let fx = write_files(&[0u8; 150], "P001\t0\t120\nP002\t120\t80\n");
            let err = IndexedRecordStore::open("db", &fx.data_path, &fx.index_path).unwrap_err();
            assert!(matches!(err, StoreError::RangeOutOfBounds { .. }));
        }

        #[test]
        fn unsorted_index_is_fatal() {
            let fx = write_files(&[0u8; 200], "P002\t120\t80\nP001\t0\t120\n");
            let err = IndexedRecordStore::open("db", &fx.data_path, &fx.index_path).unwrap_err();
            assert!(matches!(err, StoreError::UnsortedIndex { .. }));
        }

        #[test]
        fn empty_store_opens_with_no_records() {
            let fx = write_files(&[], "");
            let store = IndexedRecordStore::open("db", &fx.data_path, &fx.index_path).unwrap();
            assert!(store.is_empty());
            assert_eq!(store.lookup("P001"), Lookup::NotFound);
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn lookup_fetch_and_length_follow_the_index() {
            let fx = two_record_fixture();
            let store = IndexedRecordStore::open("db", &fx.data_path, &fx.index_path).unwrap();

            let handle = store.lookup("P002").found().unwrap();
            assert_eq!(store.length(handle), 80);
            let bytes = store.fetch(handle);
            assert_eq!(bytes.len(), 80);
            assert!(bytes.iter().all(|&b| b == b'b'));

            assert_eq!(store.lookup("P999"), Lookup::NotFound);
            assert_eq!(store.lookup(""), Lookup::NotFound);
        }

        #[test]
        fn records_iterate_in_key_order() {
            let fx = two_record_fixture();
            let store = IndexedRecordStore::open("db", &fx.data_path, &fx.index_path).unwrap();
            let summary: Vec<_> = store
                .records()
                .map(|(key, bytes)| (key.to_string(), bytes.len(), bytes[0]))
                .collect();
            assert_eq!(
                summary,
                vec![("P001".to_string(), 120, b'a'), ("P002".to_string(), 80, b'b')]
            );
        }

        #[test]
        fn every_written_record_round_trips_byte_identical() {
            let dir = tempdir().unwrap();
            let data_path = dir.path().join("afdb");
            let index_path = dir.path().join("afdb.index");
            let records: Vec<(String, Vec<u8>)> = (0..50)
                .rev()
                .map(|i| (format!("AF-{:04}", i), vec![i as u8; i * 3]))
                .collect();

            let mut writer = StoreWriter::create(&data_path, &index_path).unwrap();
            for (key, bytes) in &records {
                writer.append(key, bytes).unwrap();
            }
            writer.finish().unwrap();

            let store = IndexedRecordStore::open("afdb", &data_path, &index_path).unwrap();
            assert_eq!(store.len(), records.len());
            for (key, bytes) in &records {
                let handle = store.lookup(key).found().unwrap();
                assert_eq!(store.fetch(handle), bytes.as_slice());
                assert_eq!(store.length(handle), bytes.len() as u64);
            }
            let keys: Vec<&str> = store.keys().collect();
            let mut sorted = keys.clone();
            sorted.sort_unstable();
            assert_eq!(keys, sorted);
        }

        #[test]
        #[should_panic(expected = "handle from another store")]
        fn handle_from_another_store_panics() {
            let a = two_record_fixture();
            let b = two_record_fixture();
            let store_a = IndexedRecordStore::open("a", &a.data_path, &a.index_path).unwrap();
            let store_b = IndexedRecordStore::open("b", &b.data_path, &b.index_path).unwrap();

            let handle = store_a.lookup("P001").found().unwrap();
            store_b.fetch(handle);
        }

        #[test]
        fn concurrent_readers_share_one_store() {
            let fx = two_record_fixture();
            let store =
                Arc::new(IndexedRecordStore::open("db", &fx.data_path, &fx.index_path).unwrap());

            let workers: Vec<_> = (0..8)
                .map(|i| {
                    let store = Arc::clone(&store);
                    thread::spawn(move || {
                        let key = if i % 2 == 0 { "P001" } else { "P002" };
                        for _ in 0..1000 {
                            let bytes = store.get(key).unwrap();
                            assert_eq!(bytes.len(), if i % 2 == 0 { 120 } else { 80 });
                        }
                    })
                })
                .collect();
            for worker in workers {
                worker.join().unwrap();
            }
        }
    }
}
