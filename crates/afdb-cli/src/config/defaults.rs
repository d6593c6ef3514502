use afdb_clusters::workflows::query::DEFAULT_SUGGESTION_CAP;

pub struct DefaultsConfig {
    pub suggestion_cap: usize,
    pub similars_limit: Option<usize>,
    pub rebuild_taxonomy: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            suggestion_cap: DEFAULT_SUGGESTION_CAP,
            similars_limit: None,
            rebuild_taxonomy: false,
        }
    }
}
