use std::path::PathBuf;

use thiserror::Error;

use super::{ProbeError, ValidationError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .toml or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have .toml or .json extension.")]
    MissingExtension,
    #[error("Config does not define any targets.")]
    NoTargets,
    #[error("Invalid target '{name}': {source}")]
    InvalidTarget {
        name: String,
        #[source]
        source: ProbeError,
    },
    #[error("Invalid value in target '{name}': {source}")]
    InvalidTargetValue {
        name: String,
        #[source]
        source: ValidationError,
    },
}
