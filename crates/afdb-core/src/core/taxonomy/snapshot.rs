//! Binary snapshot of a linked taxonomy.
//!
//! Layout: the 8-byte magic [`SNAPSHOT_MAGIC`], a little-endian `u32` format
//! version, then a bincode-encoded [`SnapshotBody`]. Names are concatenated
//! into one string and ranks are interned, which keeps the file compact and
//! makes reloading a handful of bulk allocations instead of millions.

use super::TaxonomyError;
use super::node::{TaxId, TaxonomyNode};
use super::tree::TaxonomyTree;
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, instrument};

pub const SNAPSHOT_MAGIC: &[u8; 8] = b"AFDBTAX\0";
pub const SNAPSHOT_VERSION: u32 = 1;

const HEADER_LEN: usize = SNAPSHOT_MAGIC.len() + size_of::<u32>();

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotBody {
    max_depth: u32,
    ids: Vec<TaxId>,
    parents: Vec<TaxId>,
    rank_table: Vec<String>,
    ranks: Vec<u16>,
    names: String,
    name_ends: Vec<u32>,
}

impl SnapshotBody {
    fn from_tree(tree: &TaxonomyTree) -> Result<Self, TaxonomyError> {
        let n = tree.len();
        let mut body = SnapshotBody {
            max_depth: tree.max_depth(),
            ids: Vec::with_capacity(n),
            parents: Vec::with_capacity(n),
            rank_table: Vec::new(),
            ranks: Vec::with_capacity(n),
            names: String::new(),
            name_ends: Vec::with_capacity(n),
        };
        let mut rank_codes: HashMap<&str, u16> = HashMap::new();

        for node in tree.iter() {
            body.ids.push(node.id);
            body.parents.push(node.parent);

            let code = match rank_codes.get(node.rank.as_str()) {
                Some(&code) => code,
                None => {
                    let code = u16::try_from(body.rank_table.len()).map_err(|_| {
                        TaxonomyError::SnapshotInconsistent("more than 65535 distinct ranks".into())
                    })?;
                    rank_codes.insert(node.rank.as_str(), code);
                    body.rank_table.push(node.rank.clone());
                    code
                }
            };
            body.ranks.push(code);

            body.names.push_str(&node.name);
            let end = u32::try_from(body.names.len()).map_err(|_| {
                TaxonomyError::SnapshotInconsistent("name data exceeds 4 GiB".into())
            })?;
            body.name_ends.push(end);
        }
        Ok(body)
    }

    fn into_nodes(self) -> Result<Vec<TaxonomyNode>, TaxonomyError> {
        let n = self.ids.len();
        if self.parents.len() != n || self.ranks.len() != n || self.name_ends.len() != n {
            return Err(TaxonomyError::SnapshotInconsistent(format!(
                "column lengths differ (ids {}, parents {}, ranks {}, names {})",
                n,
                self.parents.len(),
                self.ranks.len(),
                self.name_ends.len()
            )));
        }

        let mut nodes = Vec::with_capacity(n);
        let mut start = 0usize;
        for i in 0..n {
            let end = self.name_ends[i] as usize;
            let name = self.names.get(start..end).ok_or_else(|| {
                TaxonomyError::SnapshotInconsistent(format!(
                    "name bounds {}..{} invalid for taxon {}",
                    start, end, self.ids[i]
                ))
            })?;
            let rank = self
                .rank_table
                .get(self.ranks[i] as usize)
                .ok_or_else(|| {
                    TaxonomyError::SnapshotInconsistent(format!(
                        "rank code {} out of range for taxon {}",
                        self.ranks[i], self.ids[i]
                    ))
                })?;
            nodes.push(TaxonomyNode {
                id: self.ids[i],
                parent: self.parents[i],
                name: name.to_string(),
                rank: rank.clone(),
            });
            start = end;
        }
        Ok(nodes)
    }
}

impl TaxonomyTree {
    /// Writes the tree to `path` in snapshot format.
    ///
    /// Nodes are emitted in ascending id order, so the same tree always
    /// produces the same bytes.
    #[instrument(skip_all, name = "taxonomy_serialize", fields(path = %path.display()))]
    pub fn serialize(&self, path: &Path) -> Result<(), TaxonomyError> {
        let io_err = |e| TaxonomyError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        let body = SnapshotBody::from_tree(self)?;

        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        writer.write_all(SNAPSHOT_MAGIC).map_err(io_err)?;
        writer
            .write_all(&SNAPSHOT_VERSION.to_le_bytes())
            .map_err(io_err)?;
        bincode::serialize_into(&mut writer, &body).map_err(|e| TaxonomyError::SnapshotDecode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        writer.flush().map_err(io_err)?;

        info!(nodes = self.len(), "Wrote taxonomy snapshot.");
        Ok(())
    }

    /// Loads a tree from a snapshot written by [`serialize`](Self::serialize).
    ///
    /// This is the warm path: no text is parsed, but the node list is relinked
    /// and validated exactly like a fresh build.
    #[instrument(skip_all, name = "taxonomy_deserialize", fields(path = %path.display()))]
    pub fn deserialize(path: &Path) -> Result<Self, TaxonomyError> {
        let io_err = |e| TaxonomyError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        let file = File::open(path).map_err(io_err)?;
        // SAFETY: snapshots are written once and only read afterwards.
        let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;
        let tree = Self::from_snapshot_bytes(&mmap, path)?;
        info!(
            nodes = tree.len(),
            max_depth = tree.max_depth(),
            "Loaded taxonomy snapshot."
        );
        Ok(tree)
    }

    fn from_snapshot_bytes(bytes: &[u8], path: &Path) -> Result<Self, TaxonomyError> {
        if bytes.len() < HEADER_LEN || &bytes[..SNAPSHOT_MAGIC.len()] != SNAPSHOT_MAGIC {
            return Err(TaxonomyError::SnapshotMagic {
                path: path.to_path_buf(),
            });
        }
        let version_bytes = &bytes[SNAPSHOT_MAGIC.len()..HEADER_LEN];
        let version = u32::from_le_bytes([
            version_bytes[0],
            version_bytes[1],
            version_bytes[2],
            version_bytes[3],
        ]);
        if version != SNAPSHOT_VERSION {
            return Err(TaxonomyError::SnapshotVersion {
                found: version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let body: SnapshotBody =
            bincode::deserialize(&bytes[HEADER_LEN..]).map_err(|e| TaxonomyError::SnapshotDecode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let recorded_depth = body.max_depth;
        let tree = TaxonomyTree::from_nodes(body.into_nodes()?)?;
        if tree.max_depth() != recorded_depth {
            return Err(TaxonomyError::SnapshotInconsistent(format!(
                "recorded max depth {} but relinked tree has {}",
                recorded_depth,
                tree.max_depth()
            )));
        }
        Ok(tree)
    }
}
