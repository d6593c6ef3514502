use crate::cli::{DataArgs, DataCommands};
use crate::data::DataManager;
use crate::error::Result;
use tracing::info;

pub fn run(args: DataArgs) -> Result<()> {
    match args.command {
        DataCommands::Path => handle_path(),
        DataCommands::SetPath { path } => {
            let stored = DataManager::set_custom_path(&path)?;
            println!("✓ Data path set to {:?}", stored);
            Ok(())
        }
        DataCommands::ResetPath => {
            DataManager::reset_path()?;
            let manager = DataManager::new()?;
            println!(
                "✓ Data path reset to default: {:?}",
                manager.get_data_path()
            );
            Ok(())
        }
    }
}

fn handle_path() -> Result<()> {
    let manager = DataManager::new()?;
    println!("{}", manager.get_data_path().display());

    let missing = manager.missing_files();
    info!(missing = missing.len(), "Checked data directory contents.");
    if !missing.is_empty() {
        eprintln!("Missing {} expected file(s):", missing.len());
        for path in missing {
            eprintln!("  {}", path.display());
        }
    }
    Ok(())
}
