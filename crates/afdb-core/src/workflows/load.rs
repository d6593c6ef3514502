use crate::core::store::IndexedRecordStore;
use crate::core::taxonomy;
use crate::engine::config::{DataConfig, Dataset};
use crate::engine::context::AppContext;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::time::Instant;
use tracing::{info, instrument};

/// Loads the taxonomy and then every record store, in that order.
///
/// Any failure aborts the whole load; there is no partially usable context.
#[instrument(skip_all, name = "load_workflow")]
pub fn run(config: &DataConfig, reporter: &ProgressReporter) -> Result<AppContext, EngineError> {
    let started = Instant::now();

    reporter.report(Progress::PhaseStart { name: "Taxonomy" });
    let stage = Instant::now();
    let tax = &config.taxonomy;
    let tree = taxonomy::load_or_build(&tax.dump_dir, &tax.snapshot_path, tax.rebuild)?;
    info!(
        nodes = tree.len(),
        elapsed_ms = stage.elapsed().as_millis() as u64,
        "Loaded taxonomy."
    );
    reporter.report(Progress::Loaded {
        name: "taxonomy",
        records: tree.len(),
        elapsed: stage.elapsed(),
    });
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Record stores" });
    let [sequences, ca, plddt, descriptions, similars] = Dataset::ALL;
    let stores = [
        open_store(config, sequences, reporter)?,
        open_store(config, ca, reporter)?,
        open_store(config, plddt, reporter)?,
        open_store(config, descriptions, reporter)?,
        open_store(config, similars, reporter)?,
    ];
    reporter.report(Progress::PhaseFinish);

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Startup complete."
    );
    Ok(AppContext::new(stores, tree))
}

fn open_store(
    config: &DataConfig,
    dataset: Dataset,
    reporter: &ProgressReporter,
) -> Result<IndexedRecordStore, EngineError> {
    let stage = Instant::now();
    let paths = config.dataset(dataset);
    let store = IndexedRecordStore::open(dataset.stem(), &paths.data, &paths.index)
        .map_err(|source| EngineError::Store { dataset, source })?;
    info!(
        dataset = dataset.label(),
        records = store.len(),
        elapsed_ms = stage.elapsed().as_millis() as u64,
        "Loaded {} database.",
        dataset.label()
    );
    reporter.report(Progress::Loaded {
        name: dataset.stem(),
        records: store.len(),
        elapsed: stage.elapsed(),
    });
    Ok(store)
}
