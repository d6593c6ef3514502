use serde::Serialize;

/// NCBI taxonomy identifier.
pub type TaxId = u32;

/// The fixed root of the NCBI taxonomy; it is its own parent.
pub const ROOT_ID: TaxId = 1;

/// A single taxon as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TaxonomyNode {
    pub id: TaxId,
    pub parent: TaxId,
    pub name: String,
    pub rank: String,
}

impl TaxonomyNode {
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    /// Case-insensitive substring test against the scientific name.
    ///
    /// `needle_lower` must already be lowercase.
    pub(crate) fn name_contains_lowercase(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
    }
}
