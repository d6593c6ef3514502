mod cli;
mod commands;
mod config;
mod data;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    std::panic::set_hook(Box::new(|pi| {
        error!("{}", pi);
    }));

    info!("🚀 afdb CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let source = cli.source;
    let command_result = match cli.command {
        Commands::Check => {
            info!("Dispatching to 'check' command.");
            commands::check::run(&source)
        }
        Commands::Structure(args) => {
            info!("Dispatching to 'structure' command.");
            commands::structure::run(args, &source)
        }
        Commands::Describe { accession } => {
            info!("Dispatching to 'describe' command.");
            commands::describe::run(&accession, &source)
        }
        Commands::Similars(args) => {
            info!("Dispatching to 'similars' command.");
            commands::similars::run(args, &source)
        }
        Commands::Taxonomy(args) => {
            info!("Dispatching to 'taxonomy' command.");
            commands::taxonomy::run(args, &source)
        }
        Commands::Verify(args) => {
            info!("Dispatching to 'verify' command.");
            commands::verify::run(args, &source)
        }
        Commands::Data(args) => {
            info!("Dispatching to 'data' command.");
            commands::data::run(args)
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
