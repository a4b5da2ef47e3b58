use std::path::PathBuf;

use compact_str::CompactString;
use thiserror::Error;

use crate::client::ClientError;

pub type Result<T> = std::result::Result<T, RuoError>;

#[derive(Debug, Error)]
pub enum RuoError {
    #[error("Configuration file not found: {path} (run `ruo config init` to create one)")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Failed to load configuration from {path}: {message}")]
    ConfigLoadError { path: PathBuf, message: String },

    #[error("Failed to save configuration to {path}: {message}")]
    ConfigSaveError { path: PathBuf, message: String },

    #[error("Invalid configuration for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error(transparent)]
    Client(ClientError),

    #[error("{0}")]
    GeneralError(CompactString),
}

impl From<ClientError> for RuoError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::ConfigValidation { field, message } => {
                RuoError::config_validation_error(field, message)
            },
            other => RuoError::Client(other),
        }
    }
}

impl From<serde_json::Error> for RuoError {
    fn from(e: serde_json::Error) -> Self {
        RuoError::GeneralError(format!("Failed to render output: {e}").into())
    }
}

impl RuoError {
    /// Create a configuration file not found error
    pub fn config_file_not_found(path: PathBuf) -> Self {
        Self::ConfigFileNotFound { path }
    }

    /// Create a configuration load error
    pub fn config_load_error(path: PathBuf, source: impl std::fmt::Display) -> Self {
        Self::ConfigLoadError { path, message: source.to_string() }
    }

    /// Create a configuration save error
    pub fn config_save_error(path: PathBuf, source: impl std::fmt::Display) -> Self {
        Self::ConfigSaveError { path, message: source.to_string() }
    }

    /// Create a configuration validation error
    pub fn config_validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidationError { field: field.into(), message: message.into() }
    }
}
