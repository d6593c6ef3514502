use afdb_clusters::engine::config as core_config;

#[derive(Debug, Clone)]
pub struct QuerySettings {
    pub suggestion_cap: usize,
    pub similars_limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data: core_config::DataConfig,
    pub query: QuerySettings,
}
