//! Layered configuration: command-line flags, then `-S key=value` overrides,
//! then the TOML file, then built-in defaults.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::AppConfig;
