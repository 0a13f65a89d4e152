use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::types::Config;

/// Why a store config file was rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot open store config {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store config {} is not valid TOML: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("store config rejected: {message}")]
    Invalid { message: String },
}

impl Config {
    /// `mvi-store/config.toml` under the platform config directory, or
    /// under the working directory when the platform has none.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("mvi-store").join("config.toml")
    }

    /// Read [`Config::config_path`]. A missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from(&path)
    }

    /// Loads, parses and validates the file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Malformed {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject a filter `EnvFilter` cannot parse and an empty demo chat list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(err) = EnvFilter::try_new(&self.logging.filter) {
            return Err(ConfigError::Invalid {
                message: format!("Invalid logging filter '{}': {}", self.logging.filter, err),
            });
        }

        if self.demo.chats.is_empty() {
            return Err(ConfigError::Invalid {
                message: "demo.chats must list at least one chat".to_string(),
            });
        }

        Ok(())
    }
}
