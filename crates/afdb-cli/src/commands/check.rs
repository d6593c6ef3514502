use super::{load_context, resolve_config};
use crate::cli::SourceArgs;
use crate::error::Result;

pub fn run(source: &SourceArgs) -> Result<()> {
    let app = resolve_config(source, false)?;
    let ctx = load_context(&app)?;

    println!("{:<22} {:>12}", "dataset", "records");
    for (dataset, count) in ctx.record_counts() {
        println!("{:<22} {:>12}", dataset.label(), count);
    }
    let tree = ctx.taxonomy();
    println!(
        "{:<22} {:>12}  (max depth {})",
        "taxonomy nodes",
        tree.len(),
        tree.max_depth()
    );
    Ok(())
}
