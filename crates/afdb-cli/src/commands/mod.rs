pub mod check;
pub mod data;
pub mod describe;
pub mod similars;
pub mod structure;
pub mod taxonomy;
pub mod verify;

use crate::cli::SourceArgs;
use crate::config::{self, AppConfig};
use crate::data::DataManager;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use afdb_clusters::engine::context::AppContext;
use afdb_clusters::engine::progress::ProgressReporter;
use afdb_clusters::workflows;
use tracing::info;

/// Resolves the configuration for commands that read the data directory.
pub(crate) fn resolve_config(source: &SourceArgs, force_rebuild: bool) -> Result<AppConfig> {
    info!("Initializing data manager...");
    let data_manager = DataManager::new()?;
    config::build_config(source, force_rebuild, &data_manager)
}

/// Runs the startup load with a spinner on stderr.
pub(crate) fn load_context(app: &AppConfig) -> Result<AppContext> {
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    info!("Invoking the core load workflow...");
    let ctx = workflows::load::run(&app.data, &reporter)?;
    info!(
        records = progress_handler.records_loaded(),
        "Application context ready."
    );
    Ok(ctx)
}
