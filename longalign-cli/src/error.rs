//! Error handling for the longalign CLI

use std::path::PathBuf;
use thiserror::Error;

/// Validation failures raised by the CLI itself
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("No sequences found in {path}")]
    EmptyInput { path: PathBuf },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument { message: message.into() }
    }

    pub fn empty_input(path: PathBuf) -> Self {
        Self::EmptyInput { path }
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(format!("TOML serialization error: {}", err))
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
