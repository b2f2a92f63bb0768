//! Configuration management for Mixshell

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::logging::LogFormat;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingSection,
    pub store: StoreConfig,
    pub replay: ReplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub format: String,
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            format: LogFormat::Text.to_string(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Snapshots buffered per subscriber before it starts lagging
    pub channel_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Stop at the first action that fails validation
    pub strict: bool,
}

impl Config {
    /// Load configuration from the default location
    ///
    /// `MIXSHELL_CONFIG` names the file explicitly and must exist. Without
    /// it, a missing `<config_dir>/mixshell/config.toml` means defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = env_config_path() {
            return Self::load_from_path(&path);
        }

        let path = resolve_config_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "store.channel_capacity".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        self.logging
            .format
            .parse::<LogFormat>()
            .map_err(|reason| ConfigError::Invalid {
                field: "logging.format".to_string(),
                reason,
            })?;

        Ok(())
    }
}

fn env_config_path() -> Option<PathBuf> {
    std::env::var("MIXSHELL_CONFIG")
        .ok()
        .filter(|path| !path.is_empty())
        .map(|path| PathBuf::from(shellexpand::tilde(&path).to_string()))
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Some(path) = env_config_path() {
        return Ok(path);
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("mixshell").join("config.toml"))
}
