use crate::error::{CliError, Result};
use afdb_clusters::core::taxonomy::dump::{NAMES_FILE, NODES_FILE};
use afdb_clusters::engine::config::{Dataset, DatasetPaths};
use directories::ProjectDirs;
use std::fs::{self};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct DataManager {
    base_path: PathBuf,
}

impl DataManager {
    pub fn new() -> Result<Self> {
        let path = Self::determine_data_path()?;
        debug!("DataManager initialized with path: {:?}", &path);
        Ok(Self { base_path: path })
    }

    pub fn with_custom_path(path: PathBuf) -> Self {
        Self { base_path: path }
    }

    pub fn get_data_path(&self) -> &Path {
        &self.base_path
    }

    /// Files the load workflow needs that are absent from the data directory.
    ///
    /// The taxonomy snapshot is not listed; it is rebuilt from the dump.
    pub fn missing_files(&self) -> Vec<PathBuf> {
        let mut expected = Vec::new();
        for dataset in Dataset::ALL {
            let paths = DatasetPaths::in_dir(&self.base_path, dataset);
            expected.push(paths.data);
            expected.push(paths.index);
        }
        expected.push(self.base_path.join(NODES_FILE));
        expected.push(self.base_path.join(NAMES_FILE));
        expected.retain(|path| !path.is_file());
        expected
    }

    pub fn set_custom_path(path: &Path) -> Result<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        if !absolute.is_dir() {
            warn!("Data path {:?} does not exist yet.", &absolute);
        }

        let config_path = Self::get_path_config_file()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, absolute.to_string_lossy().as_bytes())?;
        info!("Stored custom data path in {:?}", &config_path);
        Ok(absolute)
    }

    pub fn reset_path() -> Result<()> {
        if let Ok(config_path) = Self::get_path_config_file() {
            if config_path.exists() {
                fs::remove_file(config_path)?;
            }
        }
        Ok(())
    }

    fn determine_data_path() -> Result<PathBuf> {
        match Self::get_path_config_file() {
            Ok(config_path) if config_path.exists() => {
                let custom_path_str = fs::read_to_string(&config_path)?.trim().to_string();
                if custom_path_str.is_empty() {
                    warn!("Custom path config file is empty, falling back to default path.");
                    Self::get_default_data_path()
                } else {
                    Ok(PathBuf::from(custom_path_str))
                }
            }
            _ => Self::get_default_data_path(),
        }
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("org", "afdb-clusters", "afdb").ok_or_else(|| {
            CliError::Data("Could not determine the home directory for this user.".to_string())
        })
    }

    fn get_path_config_file() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("path.conf"))
    }

    fn get_default_data_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_directory_is_missing_every_file() {
        let temp_dir = tempdir().unwrap();
        let manager = DataManager::with_custom_path(temp_dir.path().to_path_buf());

        let missing = manager.missing_files();
        assert_eq!(missing.len(), 12);
        assert!(missing.contains(&temp_dir.path().join("afdb_ca.index")));
        assert!(missing.contains(&temp_dir.path().join("names.dmp")));
    }

    #[test]
    fn present_files_are_not_reported() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path();
        for name in [
            "afdb",
            "afdb.index",
            "afdb_ca",
            "afdb_ca.index",
            "afdb_plddt",
            "afdb_plddt.index",
            "afdb_desc",
            "afdb_desc.index",
            "ava_db",
            "nodes.dmp",
            "names.dmp",
        ] {
            fs::write(base.join(name), b"").unwrap();
        }
        fs::create_dir(base.join("ava_db.index")).unwrap();

        let manager = DataManager::with_custom_path(base.to_path_buf());
        assert_eq!(manager.missing_files(), vec![base.join("ava_db.index")]);
    }
}
