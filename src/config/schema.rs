use std::collections::HashMap;
use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::data_types::CatalogVersionId;

pub const ENV_PREFIX: &str = "MAFREPO";
pub const ENV_SEPARATOR: &str = "__";

#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct MafRepoConfig {
    /// Stand-in for the host's global settings (`mafrepo_url` et al.)
    #[serde(default)]
    pub global_settings: HashMap<String, String>,
    pub catalog: Catalog,
    #[serde(default)]
    pub frontend: Frontend,
}

#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Catalog {
    #[cfg(feature = "catalog-postgres")]
    Postgres(Postgres),
    Sqlite(Sqlite),
    #[serde(rename = "memory")]
    InMemory(InMemory),
}

#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Postgres {
    pub dsn: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_read_only")]
    pub read_only: bool,
}

#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Sqlite {
    pub dsn: String,
    #[serde(default = "default_read_only")]
    pub read_only: bool,
}

/// Catalog versions listed in the config file itself
#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct InMemory {
    #[serde(default)]
    pub versions: Vec<CatalogVersion>,
}

// Catalog names contain dots and upper case letters, neither of which survive as
// config keys, hence a list instead of a map.
#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct CatalogVersion {
    pub name: String,
    pub version_id: CatalogVersionId,
}

fn default_schema() -> String {
    "public".to_string()
}

// The catalogue belongs to the host: don't touch it unless asked to
fn default_read_only() -> bool {
    true
}

#[derive(Deserialize, Debug, PartialEq, Eq, Default, Clone)]
pub struct Frontend {
    pub http: Option<HttpFrontend>,
}

#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(default)]
pub struct HttpFrontend {
    pub bind_host: String,
    pub bind_port: u16,
}

impl Default for HttpFrontend {
    fn default() -> Self {
        Self {
            bind_host: "127.0.0.1".to_string(),
            bind_port: 8080,
        }
    }
}

pub fn validate_config(config: MafRepoConfig) -> Result<MafRepoConfig, ConfigError> {
    let read_only_in_memory_sqlite = matches!(
        config.catalog,
        Catalog::Sqlite(Sqlite { ref dsn, read_only: true }) if dsn.contains(":memory:")
    );

    if read_only_in_memory_sqlite {
        Err(ConfigError::Message(
            "You are using a read-only in-memory SQLite catalog. It will never \
        contain any catalog versions; set read_only = false to create the tables."
                .to_string(),
        ))
    } else {
        Ok(config)
    }
}

fn environment(env_vars: Option<HashMap<String, String>>) -> Environment {
    // Parse values so that e.g. `read_only` overrides come through as booleans
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
        .source(env_vars)
}

pub fn load_config(
    path: &Path,
    env_vars: Option<HashMap<String, String>>,
) -> Result<MafRepoConfig, ConfigError> {
    let path = path.to_str().ok_or_else(|| {
        ConfigError::Message(format!("Invalid config path {}", path.display()))
    })?;

    let config = Config::builder()
        .add_source(File::with_name(path))
        .add_source(environment(env_vars));

    config.build()?.try_deserialize().and_then(validate_config)
}

// Load a config from a string (to test our structs are defined correctly)
pub fn load_config_from_string(
    config_str: &str,
    skip_validation: bool,
    env_vars: Option<HashMap<String, String>>,
) -> Result<MafRepoConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(config_str, FileFormat::Toml))
        .add_source(environment(env_vars));

    if skip_validation {
        config.build()?.try_deserialize()
    } else {
        config.build()?.try_deserialize().and_then(validate_config)
    }
}
