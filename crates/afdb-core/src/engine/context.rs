use super::config::Dataset;
use crate::core::store::IndexedRecordStore;
use crate::core::taxonomy::TaxonomyTree;

/// Everything loaded at startup: the five record stores and the taxonomy.
///
/// Built once by [`crate::workflows::load::run`] and immutable afterwards, so
/// request handlers share it by reference (or `Arc`) without locking.
#[derive(Debug)]
pub struct AppContext {
    stores: [IndexedRecordStore; 5],
    taxonomy: TaxonomyTree,
}

impl AppContext {
    /// `stores` must be ordered as [`Dataset::ALL`].
    pub(crate) fn new(stores: [IndexedRecordStore; 5], taxonomy: TaxonomyTree) -> Self {
        Self { stores, taxonomy }
    }

    pub fn store(&self, dataset: Dataset) -> &IndexedRecordStore {
        &self.stores[dataset as usize]
    }

    pub fn sequences(&self) -> &IndexedRecordStore {
        self.store(Dataset::Sequences)
    }

    pub fn ca_traces(&self) -> &IndexedRecordStore {
        self.store(Dataset::CaTraces)
    }

    pub fn plddt(&self) -> &IndexedRecordStore {
        self.store(Dataset::Plddt)
    }

    pub fn descriptions(&self) -> &IndexedRecordStore {
        self.store(Dataset::Descriptions)
    }

    pub fn similars(&self) -> &IndexedRecordStore {
        self.store(Dataset::Similars)
    }

    pub fn taxonomy(&self) -> &TaxonomyTree {
        &self.taxonomy
    }

    /// Record counts per dataset, in load order.
    pub fn record_counts(&self) -> impl Iterator<Item = (Dataset, usize)> + '_ {
        Dataset::ALL
            .into_iter()
            .map(|dataset| (dataset, self.store(dataset).len()))
    }
}
