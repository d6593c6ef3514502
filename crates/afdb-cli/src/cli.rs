use crate::utils::parser::parse_tax_id;
use afdb_clusters::core::taxonomy::TaxId;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "AFDB Clusters Contributors",
    version,
    about = "afdb - Inspect and query the data behind the AlphaFold DB clusters service: structures, descriptions, similar clusters and the NCBI taxonomy.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel verification.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Where the data lives and how to override the configuration file.
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Data directory holding the stores and the taxonomy dump.
    /// Overrides the configuration file and the managed data path.
    #[arg(short = 'd', long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S query.suggestion-cap=20
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load every store and the taxonomy, then print record counts.
    Check,
    /// Print sequence, C-alpha coordinates and pLDDT of an entry as JSON.
    Structure(StructureArgs),
    /// Print the free-text description of an entry.
    Describe {
        /// UniProt accession of the entry.
        accession: String,
    },
    /// List clusters similar to a cluster, best e-value first.
    Similars(SimilarsArgs),
    /// Build and query the NCBI taxonomy.
    Taxonomy(TaxonomyArgs),
    /// Decode every C-alpha trace and check it against its sequence.
    Verify(VerifyArgs),
    /// Manage the local data directory location.
    Data(DataArgs),
}

#[derive(Args, Debug)]
pub struct StructureArgs {
    /// UniProt accession of the entry.
    pub accession: String,

    /// Print the JSON on a single line.
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct SimilarsArgs {
    /// Accession of the cluster representative.
    pub cluster: String,

    /// Show at most this many clusters.
    #[arg(short = 'n', long, value_name = "INT")]
    pub limit: Option<usize>,

    /// Print the hits as a JSON array instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TaxonomyArgs {
    #[command(subcommand)]
    pub command: TaxonomyCommands,
}

#[derive(Subcommand, Debug)]
pub enum TaxonomyCommands {
    /// Parse the raw NCBI dump and write the binary snapshot.
    Build {
        /// Rebuild even if a snapshot already exists.
        #[arg(long)]
        force: bool,
    },
    /// Print the lineage of a taxon, root first.
    Lineage {
        #[arg(value_parser = parse_tax_id)]
        tax_id: TaxId,
    },
    /// Suggest ancestor taxa whose names contain TEXT.
    Suggest {
        /// Case-insensitive fragment of a scientific name.
        text: String,

        /// Taxa to start from, typically one per cluster member.
        #[arg(required = true, value_parser = parse_tax_id)]
        tax_ids: Vec<TaxId>,

        /// Maximum number of suggestions.
        #[arg(long, value_name = "INT")]
        cap: Option<usize>,
    },
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Print at most this many flagged accessions.
    #[arg(long, value_name = "INT", default_value_t = 20)]
    pub show: usize,
}

/// Arguments for the `data` subcommand.
#[derive(Args, Debug)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommands,
}

/// Available commands for data management.
#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Show the data directory and which expected files are missing.
    Path,
    /// Set a custom path for the local data directory.
    SetPath {
        /// The directory holding the stores and the taxonomy dump.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the data path to its default, OS-specific location.
    ResetPath,
}
