//! Configuration error types.

use thiserror::Error;

/// Site configuration assembly error.
///
/// Every variant is fatal: bootstrap stops and no partial configuration
/// is handed to the runtime.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvironmentVariable(String),
    #[error("invalid port in {name}: {value:?}")]
    InvalidPort { name: String, value: String },
    #[error("invalid app id: {0}")]
    InvalidAppId(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("failed to read file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("failed to parse overrides: {0}")]
    Parse(#[from] serde_yaml::Error),
}
