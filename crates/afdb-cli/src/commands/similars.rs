use super::{load_context, resolve_config};
use crate::cli::{SimilarsArgs, SourceArgs};
use crate::error::{CliError, Result};
use afdb_clusters::workflows::query;
use serde::Serialize;

#[derive(Serialize)]
struct SimilarRow<'a> {
    accession: &'a str,
    evalue: f64,
    description: String,
}

pub fn run(args: SimilarsArgs, source: &SourceArgs) -> Result<()> {
    let app = resolve_config(source, false)?;
    let ctx = load_context(&app)?;

    let hits = query::similar_clusters(&ctx, &args.cluster);
    let total = hits.len();
    let limit = args.limit.or(app.query.similars_limit).unwrap_or(total);

    let rows: Vec<SimilarRow> = hits
        .iter()
        .take(limit)
        .map(|hit| SimilarRow {
            accession: &hit.accession,
            evalue: hit.evalue,
            description: query::describe(&ctx, &hit.accession),
        })
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&rows).map_err(|e| CliError::Other(e.into()))?;
        println!("{}", json);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No similar clusters for {}.", args.cluster);
        return Ok(());
    }
    for row in &rows {
        println!("{:<14} {:>10.3e}  {}", row.accession, row.evalue, row.description);
    }
    if rows.len() < total {
        println!("... {} more (use --limit to show them)", total - rows.len());
    }
    Ok(())
}
