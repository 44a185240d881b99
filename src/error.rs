use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AnchorError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to enumerate {suffix} trust anchor files in {dir}: {reason}")]
    Enumerate {
        suffix: String,
        dir: PathBuf,
        reason: String,
    },

    #[error("Resource exhaustion: {0}")]
    ResourceExhausted(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<std::io::Error> for AnchorError {
    fn from(err: std::io::Error) -> Self {
        AnchorError::Io(err.to_string())
    }
}

impl From<std::collections::TryReserveError> for AnchorError {
    fn from(err: std::collections::TryReserveError) -> Self {
        AnchorError::ResourceExhausted(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid trust anchor directory: {0}")]
    InvalidDirectory(String),

    #[error("No trust anchor directories configured")]
    NoDirectories,

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, AnchorError>;
