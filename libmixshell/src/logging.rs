//! Logging setup shared by Mixshell hosts
//!
//! Logs always go to stderr so stdout stays free for snapshots.
//!
//! # Examples
//!
//! ```no_run
//! use libmixshell::logging::{LoggingConfig, LogFormat};
//!
//! let config = LoggingConfig::new(LogFormat::Json, "debug".to_string(), false);
//! config.init();
//! ```

use std::str::FromStr;

use crate::config::LoggingSection;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text output (no colors, for piping)
    Text,
    /// Machine-parseable JSON (one JSON object per line)
    Json,
    /// Pretty-printed with colors (for development)
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Configuration for logging initialization
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    pub verbose: bool,
}

impl LoggingConfig {
    /// Create a new logging configuration
    ///
    /// * `format` - Log output format (text, json, or pretty)
    /// * `level` - Minimum log level (error, warn, info, debug, trace)
    /// * `verbose` - If true, defaults to debug level
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
        }
    }

    /// Build from the `[logging]` section of the config file
    pub fn from_section(section: &LoggingSection, verbose: bool) -> Result<Self> {
        let format = section
            .format
            .parse::<LogFormat>()
            .map_err(|reason| ConfigError::Invalid {
                field: "logging.format".to_string(),
                reason,
            })?;
        Ok(Self::new(format, section.level.clone(), verbose))
    }

    /// Install the global subscriber
    ///
    /// Does nothing if one is already installed (tests install their own).
    pub fn init(&self) {
        if let Err(error) = self.try_init() {
            tracing::debug!(%error, "Logging already initialized");
        }
    }

    /// Install the global subscriber, failing if one is already set
    pub fn try_init(&self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        use tracing_subscriber::EnvFilter;

        // RUST_LOG wins over the configured level
        let level = if self.verbose { "debug" } else { self.level.as_str() };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .flatten_event(true)
                .with_target(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .try_init(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("Json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("PRETTY".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
    }

    #[test]
    fn test_log_format_from_str_invalid() {
        let result = "xml".parse::<LogFormat>();
        assert!(result.unwrap_err().contains("Invalid log format: 'xml'"));
    }

    #[test]
    fn test_log_format_display() {
        assert_eq!(LogFormat::Text.to_string(), "text");
        assert_eq!(LogFormat::Json.to_string(), "json");
        assert_eq!(LogFormat::Pretty.to_string(), "pretty");
    }

    #[test]
    fn test_from_section() {
        let section = LoggingSection {
            format: "json".to_string(),
            level: "warn".to_string(),
        };
        let config = LoggingConfig::from_section(&section, true).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "warn");
        assert!(config.verbose);
    }

    #[test]
    fn test_from_section_rejects_unknown_format() {
        let section = LoggingSection {
            format: "syslog".to_string(),
            level: "info".to_string(),
        };
        let err = LoggingConfig::from_section(&section, false).err().unwrap();
        assert!(err.to_string().contains("logging.format"));
    }
}
