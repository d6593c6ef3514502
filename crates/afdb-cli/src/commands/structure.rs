use super::{load_context, resolve_config};
use crate::cli::{SourceArgs, StructureArgs};
use crate::error::{CliError, Result};
use afdb_clusters::workflows::query;
use tracing::info;

pub fn run(args: StructureArgs, source: &SourceArgs) -> Result<()> {
    let app = resolve_config(source, false)?;
    let ctx = load_context(&app)?;

    let record = query::structure(&ctx, &args.accession)?;
    info!(
        accession = %record.accession,
        residues = record.residue_count(),
        "Decoded structure."
    );

    let payload = record.to_payload();
    let json = if args.compact {
        serde_json::to_string(&payload)
    } else {
        serde_json::to_string_pretty(&payload)
    }
    .map_err(|e| CliError::Other(e.into()))?;
    println!("{}", json);
    Ok(())
}
