//! Error types for Mixshell

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MixshellError>;

#[derive(Error, Debug)]
pub enum MixshellError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid action: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to decode action record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MixshellError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MixshellError::Validation(_) => 3,
            MixshellError::Decode(_) => 3,
            MixshellError::Config(_) => 1,
            MixshellError::Io(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// A payload that cannot be applied to the current state.
///
/// The reducer never changes state when it produces one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed '{kind}' payload: {reason}")]
    Malformed { kind: String, reason: String },

    #[error("'{kind}' payload must be an object")]
    NotAnObject { kind: String },

    #[error("{field} must not be negative (got {value})")]
    NegativeDimension { field: &'static str, value: i64 },

    #[error("{field} is too large (got {value})")]
    DimensionOverflow { field: &'static str, value: i64 },

    #[error("audio source '{0}' already exists")]
    DuplicateId(String),

    #[error("no audio source ids left to assign")]
    IdSpaceExhausted,
}
