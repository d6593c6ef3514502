use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The TOML configuration file. Every field is optional; anything left out
/// falls through to the built-in defaults.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub data: Option<FileDataConfig>,
    pub datasets: Option<FileDatasetsConfig>,
    pub taxonomy: Option<FileTaxonomyConfig>,
    pub query: Option<FileQueryConfig>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileDataConfig {
    pub dir: Option<PathBuf>,
}

/// Per-dataset data file overrides; each index is the data path plus `.index`.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileDatasetsConfig {
    pub sequences: Option<PathBuf>,
    pub ca_traces: Option<PathBuf>,
    pub plddt: Option<PathBuf>,
    pub descriptions: Option<PathBuf>,
    pub similars: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileTaxonomyConfig {
    pub dump_dir: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub rebuild: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileQueryConfig {
    pub suggestion_cap: Option<usize>,
    pub similars_limit: Option<usize>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
