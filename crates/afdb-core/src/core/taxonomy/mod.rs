//! NCBI taxonomy tree: cold build from the raw dump, warm reload from a
//! binary snapshot, and the lineage/ancestry queries used by filters and
//! autocompletion.

pub mod dump;
pub mod node;
pub mod snapshot;
pub mod tree;

pub use node::{ROOT_ID, TaxId, TaxonomyNode};
pub use tree::TaxonomyTree;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed line {line} in {file}: {message}")]
    Parse {
        file: &'static str,
        line: usize,
        message: String,
    },

    #[error("Taxonomy id 0 is not a valid taxon")]
    ZeroTaxId,

    #[error("Taxon {0} appears more than once")]
    DuplicateTaxon(TaxId),

    #[error("Taxonomy has {0} nodes, more than can be indexed")]
    TooManyNodes(usize),

    #[error("Taxonomy has no root taxon 1")]
    MissingRoot,

    #[error("Root taxon 1 must be its own parent, found parent {0}")]
    RootHasParent(TaxId),

    #[error("Taxon {id} references unknown parent {parent}")]
    DanglingParent { id: TaxId, parent: TaxId },

    #[error("Taxon {0} is part of a parent cycle")]
    Cycle(TaxId),

    #[error("'{path}' is not a taxonomy snapshot", path = path.display())]
    SnapshotMagic { path: PathBuf },

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    SnapshotVersion { found: u32, expected: u32 },

    #[error("Failed to encode or decode snapshot '{path}': {message}", path = path.display())]
    SnapshotDecode { path: PathBuf, message: String },

    #[error("Inconsistent snapshot: {0}")]
    SnapshotInconsistent(String),
}

/// Startup policy for the taxonomy.
///
/// When the snapshot is missing, or `rebuild` is set, the tree is built from
/// `dump_dir` and written to `snapshot`. The returned tree is always the one
/// read back from the snapshot, so a broken snapshot fails at startup rather
/// than on the next warm start.
#[instrument(skip_all, name = "taxonomy_load_or_build")]
pub fn load_or_build(
    dump_dir: &Path,
    snapshot: &Path,
    rebuild: bool,
) -> Result<TaxonomyTree, TaxonomyError> {
    if rebuild || !snapshot.exists() {
        info!(
            dump_dir = %dump_dir.display(),
            forced = rebuild,
            "Taxonomy snapshot not used, building from dump."
        );
        TaxonomyTree::build(dump_dir)?.serialize(snapshot)?;
    }
    TaxonomyTree::deserialize(snapshot)
}
