use std::{fs, path::Path};

use arena_core::ArenaConfig;
use thiserror::Error;

/// Errors raised while loading a TOML configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("could not read {path}: {source}")]
    Read {
        /// File that failed to load.
        path: String,
        /// Underlying IO failure.
        source: std::io::Error,
    },
    /// The file was not valid TOML for an arena configuration.
    #[error("could not parse arena configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Reads an arena configuration from a TOML file.
///
/// Missing tables and fields keep their defaults.
pub(crate) fn load(path: &Path) -> Result<ArenaConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text)
}

fn parse(text: &str) -> Result<ArenaConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}
