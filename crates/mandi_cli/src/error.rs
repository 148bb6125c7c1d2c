//! CLI error types

use mandi_engine::config::ConfigError;
use mandi_engine::{QueryError, RegistryError};
use thiserror::Error;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Initialisation failed: {0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;
