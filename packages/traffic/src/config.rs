//! Loading [`TrafficConfig`] from TOML and the environment.

use std::path::{Path, PathBuf};

use street_traffic_models::TrafficConfig;

use crate::TrafficError;

/// Environment variable overriding the dataset path.
pub const DATASET_PATH_ENV: &str = "TRAFFIC_DATASET_PATH";

/// Reads a TOML configuration file. Missing keys take their defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load(path: &Path) -> Result<TrafficConfig, TrafficError> {
    let contents = std::fs::read_to_string(path).map_err(|e| TrafficError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&contents)
}

/// Parses TOML configuration text.
///
/// # Errors
///
/// Returns an error if the text is not valid TOML or has mistyped keys.
pub fn parse(contents: &str) -> Result<TrafficConfig, TrafficError> {
    Ok(toml::de::from_str(contents)?)
}

/// Applies environment overrides to `config`.
#[must_use]
pub fn with_env(mut config: TrafficConfig) -> TrafficConfig {
    if let Some(path) = std::env::var_os(DATASET_PATH_ENV).filter(|p| !p.is_empty()) {
        config.dataset_path = PathBuf::from(path);
    }
    config
}

/// Resolves the effective configuration: the TOML file when given,
/// defaults otherwise, then environment overrides.
///
/// # Errors
///
/// Returns an error if a config file was given and cannot be loaded.
pub fn resolve(path: Option<&Path>) -> Result<TrafficConfig, TrafficError> {
    let config = match path {
        Some(path) => load(path)?,
        None => TrafficConfig::default(),
    };
    Ok(with_env(config))
}
