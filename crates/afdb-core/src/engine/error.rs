use thiserror::Error;

use super::config::{ConfigError, Dataset};
use crate::core::codec::DecodeError;
use crate::core::store::StoreError;
use crate::core::taxonomy::TaxonomyError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to load {dataset} store: {source}")]
    Store {
        dataset: Dataset,
        source: StoreError,
    },

    #[error("Taxonomy error: {source}")]
    Taxonomy {
        #[from]
        source: TaxonomyError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("{accession} not found in {dataset} store")]
    RecordNotFound { dataset: Dataset, accession: String },

    #[error("Failed to decode C-alpha trace of {accession}: {source}")]
    Decode {
        accession: String,
        source: DecodeError,
    },
}

impl EngineError {
    /// Per-request failures that leave the loaded context usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::RecordNotFound { .. } | EngineError::Decode { .. }
        )
    }
}
