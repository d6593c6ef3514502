//! Read-only lookups served against a loaded [`AppContext`].
//!
//! Every function here is cheap enough to call per request and never mutates
//! the context; callers may run them from any number of threads.

use crate::core::codec::CoordinateTrace;
use crate::core::models::{SimilarHit, StructureRecord, record_text, trim_record};
use crate::core::store::IndexedRecordStore;
use crate::core::taxonomy::{TaxId, TaxonomyNode, TaxonomyTree};
use crate::engine::config::Dataset;
use crate::engine::context::AppContext;
use crate::engine::error::EngineError;
use std::collections::HashSet;
use tracing::debug;

/// Number of autocompletion suggestions the service returns at most.
pub const DEFAULT_SUGGESTION_CAP: usize = 10;

/// Free-text description of `accession`, or `""` when there is none.
pub fn describe(ctx: &AppContext, accession: &str) -> String {
    ctx.descriptions()
        .get(accession)
        .map(record_text)
        .unwrap_or_default()
}

/// Sequence, decoded C-alpha trace and pLDDT string for `accession`.
///
/// The residue count passed to the decoder is the length of the stored
/// sequence without its terminators.
pub fn structure(ctx: &AppContext, accession: &str) -> Result<StructureRecord, EngineError> {
    let sequence = trim_record(require(ctx, Dataset::Sequences, accession)?);
    let block = require(ctx, Dataset::CaTraces, accession)?;
    let plddt = record_text(require(ctx, Dataset::Plddt, accession)?);

    let residue_count = sequence.len();
    let trace = CoordinateTrace::decode(block, residue_count, block.len()).map_err(|source| {
        EngineError::Decode {
            accession: accession.to_string(),
            source,
        }
    })?;

    Ok(StructureRecord {
        accession: accession.to_string(),
        sequence: String::from_utf8_lossy(sequence).into_owned(),
        trace,
        plddt,
    })
}

fn require<'c>(
    ctx: &'c AppContext,
    dataset: Dataset,
    accession: &str,
) -> Result<&'c [u8], EngineError> {
    let store: &IndexedRecordStore = ctx.store(dataset);
    match store.lookup(accession).found() {
        Some(handle) => Ok(store.fetch(handle)),
        None => Err(EngineError::RecordNotFound {
            dataset,
            accession: accession.to_string(),
        }),
    }
}

/// Clusters similar to `cluster`, best e-value first, excluding `cluster`
/// itself. Unknown clusters have no similars.
pub fn similar_clusters(ctx: &AppContext, cluster: &str) -> Vec<SimilarHit> {
    let Some(bytes) = ctx.similars().get(cluster) else {
        return Vec::new();
    };
    let mut hits: Vec<_> = SimilarHit::parse_list(&record_text(bytes))
        .into_iter()
        .filter(|hit| hit.accession != cluster)
        .collect();
    hits.sort_by(SimilarHit::by_evalue);
    debug!(cluster, hits = hits.len(), "Resolved similar clusters.");
    hits
}

/// Lineage of `id`, root first; empty when the taxon is unknown.
pub fn lineage_of(ctx: &AppContext, id: TaxId) -> Vec<&TaxonomyNode> {
    ctx.taxonomy().lineage(id).unwrap_or_default()
}

/// Whether taxon `id` lies inside `clade` (inclusive of both ends).
pub fn in_clade(ctx: &AppContext, id: TaxId, clade: TaxId) -> bool {
    ctx.taxonomy().is_ancestor(id, clade)
}

/// Ancestor names matching `text` across many rows' taxa, for autocompletion.
///
/// Rows whose taxon is unknown are skipped. Results are unique by id, in the
/// order they were first found, and never more than `cap` in total.
pub fn suggest_taxa<'c>(
    ctx: &'c AppContext,
    ids: impl IntoIterator<Item = TaxId>,
    text: &str,
    cap: usize,
) -> Vec<&'c TaxonomyNode> {
    suggest_in(ctx.taxonomy(), ids, text, cap)
}

/// [`suggest_taxa`] against a bare tree, for callers that have not loaded
/// the record stores.
pub fn suggest_in<'t>(
    tree: &'t TaxonomyTree,
    ids: impl IntoIterator<Item = TaxId>,
    text: &str,
    cap: usize,
) -> Vec<&'t TaxonomyNode> {
    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();

    for id in ids {
        if suggestions.len() >= cap {
            break;
        }
        if !tree.node_exists(id) {
            continue;
        }
        for node in tree.ancestor_matches(id, text, cap - suggestions.len()) {
            if seen.insert(node.id) {
                suggestions.push(node);
            }
        }
    }
    suggestions.truncate(cap);
    suggestions
}
