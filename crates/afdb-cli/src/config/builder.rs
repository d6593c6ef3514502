use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileDatasetsConfig};
use super::models::{AppConfig, QuerySettings};
use crate::cli::SourceArgs;
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::utils::parser;
use afdb_clusters::engine::config::{self as core_config, Dataset, DatasetPaths};
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Resolves the effective configuration.
///
/// `force_rebuild` carries command flags such as `taxonomy build --force`,
/// which outrank every other source.
pub fn build_config(
    source: &SourceArgs,
    force_rebuild: bool,
    data_manager: &DataManager,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &source.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    let mut file_config = apply_set_values(file_config, &source.set_values)?;

    let data_file = file_config.data.take().unwrap_or_default();
    let data_dir = source
        .data_dir
        .clone()
        .or(data_file.dir)
        .unwrap_or_else(|| data_manager.get_data_path().to_path_buf());
    debug!("Using data directory {:?}", &data_dir);

    let taxonomy_file = file_config.taxonomy.take().unwrap_or_default();
    let rebuild = force_rebuild
        || taxonomy_file
            .rebuild
            .unwrap_or(defaults.rebuild_taxonomy);

    let mut builder = core_config::DataConfigBuilder::new()
        .data_dir(data_dir)
        .rebuild_taxonomy(rebuild);
    if let Some(dump_dir) = taxonomy_file.dump_dir {
        builder = builder.dump_dir(dump_dir);
    }
    if let Some(snapshot) = taxonomy_file.snapshot {
        builder = builder.snapshot_path(snapshot);
    }
    for (dataset, data_path) in dataset_overrides(file_config.datasets.take().unwrap_or_default())
    {
        builder = builder.dataset(dataset, paths_for(data_path));
    }
    let data = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let query_file = file_config.query.take().unwrap_or_default();
    let suggestion_cap = query_file
        .suggestion_cap
        .unwrap_or(defaults.suggestion_cap);
    if suggestion_cap == 0 {
        return Err(CliError::Config(
            "`query.suggestion-cap` must be at least 1".to_string(),
        ));
    }
    let query = QuerySettings {
        suggestion_cap,
        similars_limit: query_file.similars_limit.or(defaults.similars_limit),
    };

    Ok(AppConfig { data, query })
}

fn dataset_overrides(file: FileDatasetsConfig) -> Vec<(Dataset, PathBuf)> {
    [
        (Dataset::Sequences, file.sequences),
        (Dataset::CaTraces, file.ca_traces),
        (Dataset::Plddt, file.plddt),
        (Dataset::Descriptions, file.descriptions),
        (Dataset::Similars, file.similars),
    ]
    .into_iter()
    .filter_map(|(dataset, path)| path.map(|p| (dataset, p)))
    .collect()
}

fn paths_for(data: PathBuf) -> DatasetPaths {
    let mut index: OsString = data.clone().into_os_string();
    index.push(".index");
    DatasetPaths {
        data,
        index: PathBuf::from(index),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) =
            parser::parse_set_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "data.dir" => {
                config.data.get_or_insert_with(Default::default).dir = Some(value_str.into());
            }
            "taxonomy.dump-dir" => {
                config.taxonomy.get_or_insert_with(Default::default).dump_dir =
                    Some(value_str.into());
            }
            "taxonomy.snapshot" => {
                config.taxonomy.get_or_insert_with(Default::default).snapshot =
                    Some(value_str.into());
            }
            "taxonomy.rebuild" => {
                config.taxonomy.get_or_insert_with(Default::default).rebuild =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "query.suggestion-cap" => {
                config.query.get_or_insert_with(Default::default).suggestion_cap =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "query.similars-limit" => {
                config.query.get_or_insert_with(Default::default).similars_limit =
                    Some(parse_value(key, value_str, "integer")?);
            }
            _ => {
                let datasets = config.datasets.get_or_insert_with(Default::default);
                let slot = match key {
                    "datasets.sequences" => &mut datasets.sequences,
                    "datasets.ca-traces" => &mut datasets.ca_traces,
                    "datasets.plddt" => &mut datasets.plddt,
                    "datasets.descriptions" => &mut datasets.descriptions,
                    "datasets.similars" => &mut datasets.similars,
                    _ => {
                        return Err(CliError::Config(format!(
                            "Unsupported configuration key for --set: '{}'",
                            key
                        )));
                    }
                };
                *slot = Some(value_str.into());
            }
        }
    }
    Ok(config)
}
