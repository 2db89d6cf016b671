//! Error types for the command-line front end

use thiserror::Error;
use vega_core::CoreError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::SerializationError(err.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;
