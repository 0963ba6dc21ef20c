use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum UnitStyleError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Test execution error: {0}")]
    ExecutionError(String),
}

pub type Result<T> = std::result::Result<T, UnitStyleError>;
