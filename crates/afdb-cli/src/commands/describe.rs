use super::{load_context, resolve_config};
use crate::cli::SourceArgs;
use crate::error::Result;
use afdb_clusters::workflows::query;
use tracing::warn;

pub fn run(accession: &str, source: &SourceArgs) -> Result<()> {
    let app = resolve_config(source, false)?;
    let ctx = load_context(&app)?;

    let description = query::describe(&ctx, accession);
    if description.is_empty() {
        warn!("No description stored for {}.", accession);
    }
    println!("{}", description);
    Ok(())
}
