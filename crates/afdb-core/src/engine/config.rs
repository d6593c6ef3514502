use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// The five record stores the service reads, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Sequences,
    CaTraces,
    Plddt,
    Descriptions,
    Similars,
}

impl Dataset {
    pub const ALL: [Dataset; 5] = [
        Dataset::Sequences,
        Dataset::CaTraces,
        Dataset::Plddt,
        Dataset::Descriptions,
        Dataset::Similars,
    ];

    /// File stem under the data directory; the index is `<stem>.index`.
    pub fn stem(self) -> &'static str {
        match self {
            Dataset::Sequences => "afdb",
            Dataset::CaTraces => "afdb_ca",
            Dataset::Plddt => "afdb_plddt",
            Dataset::Descriptions => "afdb_desc",
            Dataset::Similars => "ava_db",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dataset::Sequences => "sequences",
            Dataset::CaTraces => "C-alpha traces",
            Dataset::Plddt => "pLDDT",
            Dataset::Descriptions => "descriptions",
            Dataset::Similars => "all-vs-all similars",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub data: PathBuf,
    pub index: PathBuf,
}

impl DatasetPaths {
    pub fn in_dir(dir: &Path, dataset: Dataset) -> Self {
        let data = dir.join(dataset.stem());
        let index = dir.join(format!("{}.index", dataset.stem()));
        Self { data, index }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyConfig {
    pub dump_dir: PathBuf,
    pub snapshot_path: PathBuf,
    pub rebuild: bool,
}

pub const SNAPSHOT_FILE: &str = "ncbitaxonomy.bin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    datasets: [DatasetPaths; 5],
    pub taxonomy: TaxonomyConfig,
}

impl DataConfig {
    pub fn dataset(&self, dataset: Dataset) -> &DatasetPaths {
        &self.datasets[dataset.index()]
    }
}

#[derive(Default)]
pub struct DataConfigBuilder {
    data_dir: Option<PathBuf>,
    overrides: [Option<DatasetPaths>; 5],
    dump_dir: Option<PathBuf>,
    snapshot_path: Option<PathBuf>,
    rebuild: bool,
}

impl DataConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills every path with its conventional location under `dir`.
    pub fn data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = Some(dir);
        self
    }
    pub fn dataset(mut self, dataset: Dataset, paths: DatasetPaths) -> Self {
        self.overrides[dataset.index()] = Some(paths);
        self
    }
    pub fn dump_dir(mut self, dir: PathBuf) -> Self {
        self.dump_dir = Some(dir);
        self
    }
    pub fn snapshot_path(mut self, path: PathBuf) -> Self {
        self.snapshot_path = Some(path);
        self
    }
    pub fn rebuild_taxonomy(mut self, rebuild: bool) -> Self {
        self.rebuild = rebuild;
        self
    }

    pub fn build(self) -> Result<DataConfig, ConfigError> {
        let data_dir = self.data_dir.as_deref();
        let [seq, ca, plddt, desc, ava] = self.overrides;
        let resolve = |slot: Option<DatasetPaths>, dataset: Dataset, param: &'static str| {
            slot.or_else(|| data_dir.map(|dir| DatasetPaths::in_dir(dir, dataset)))
                .ok_or(ConfigError::MissingParameter(param))
        };

        let datasets = [
            resolve(seq, Dataset::Sequences, "sequences")?,
            resolve(ca, Dataset::CaTraces, "ca_traces")?,
            resolve(plddt, Dataset::Plddt, "plddt")?,
            resolve(desc, Dataset::Descriptions, "descriptions")?,
            resolve(ava, Dataset::Similars, "similars")?,
        ];

        let taxonomy = TaxonomyConfig {
            dump_dir: self
                .dump_dir
                .or_else(|| data_dir.map(Path::to_path_buf))
                .ok_or(ConfigError::MissingParameter("taxonomy_dump_dir"))?,
            snapshot_path: self
                .snapshot_path
                .or_else(|| data_dir.map(|dir| dir.join(SNAPSHOT_FILE)))
                .ok_or(ConfigError::MissingParameter("taxonomy_snapshot"))?,
            rebuild: self.rebuild,
        };

        Ok(DataConfig { datasets, taxonomy })
    }
}
