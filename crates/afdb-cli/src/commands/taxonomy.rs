use super::resolve_config;
use crate::cli::{SourceArgs, TaxonomyArgs, TaxonomyCommands};
use crate::error::{CliError, Result};
use afdb_clusters::core::taxonomy::{self, TaxonomyNode, TaxonomyTree};
use afdb_clusters::engine::config::TaxonomyConfig;
use afdb_clusters::workflows::query;
use std::time::Instant;
use tracing::info;

pub fn run(args: TaxonomyArgs, source: &SourceArgs) -> Result<()> {
    match args.command {
        TaxonomyCommands::Build { force } => {
            let app = resolve_config(source, force)?;
            handle_build(&app.data.taxonomy)
        }
        TaxonomyCommands::Lineage { tax_id } => {
            let app = resolve_config(source, false)?;
            let tree = load_tree(&app.data.taxonomy)?;
            let lineage = tree
                .lineage(tax_id)
                .ok_or_else(|| CliError::Argument(format!("Unknown taxonomy id {}", tax_id)))?;
            for (depth, node) in lineage.iter().enumerate() {
                print_node(depth, node);
            }
            Ok(())
        }
        TaxonomyCommands::Suggest { text, tax_ids, cap } => {
            let app = resolve_config(source, false)?;
            let tree = load_tree(&app.data.taxonomy)?;
            let cap = cap.unwrap_or(app.query.suggestion_cap);
            let suggestions = query::suggest_in(&tree, tax_ids, &text, cap);
            if suggestions.is_empty() {
                println!("No ancestor taxa match '{}'.", text);
            }
            for node in suggestions {
                print_node(0, node);
            }
            Ok(())
        }
    }
}

fn handle_build(config: &TaxonomyConfig) -> Result<()> {
    if config.snapshot_path.exists() && !config.rebuild {
        println!(
            "Snapshot already exists at {:?}. Use --force to rebuild it.",
            config.snapshot_path
        );
        return Ok(());
    }

    let started = Instant::now();
    let tree = TaxonomyTree::build(&config.dump_dir)?;
    tree.serialize(&config.snapshot_path)?;
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Taxonomy snapshot rebuilt."
    );
    println!(
        "✓ Wrote {} taxa (max depth {}) to {:?}",
        tree.len(),
        tree.max_depth(),
        config.snapshot_path
    );
    Ok(())
}

fn load_tree(config: &TaxonomyConfig) -> Result<TaxonomyTree> {
    Ok(taxonomy::load_or_build(
        &config.dump_dir,
        &config.snapshot_path,
        config.rebuild,
    )?)
}

fn print_node(indent: usize, node: &TaxonomyNode) {
    println!(
        "{:indent$}{:<10} {:<16} {}",
        "",
        node.id,
        node.rank,
        node.name,
        indent = indent * 2
    );
}
