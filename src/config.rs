//! Configuration loading
//!
//! Reads `~/.config/pm-chat/config.toml`. A missing default file means
//! defaults everywhere; a file that exists but does not parse is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

mod types;

pub use types::*;

const CONFIG_DIR: &str = "pm-chat";
const CONFIG_FILE: &str = "config.toml";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Default location of the config file
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load configuration from an explicit path, or the default location
///
/// An explicit path must exist; the default location is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    match config_path() {
        Some(path) => load_config_from_path(&path),
        None => {
            log::debug!("No home directory, using default config");
            Ok(Config::default())
        }
    }
}

/// Load configuration, treating a missing file as empty
pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        log::debug!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    read_config(path)
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Loaded config from {}", path.display());
    parse_config(&contents)
}

/// Parse configuration from TOML text
pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
