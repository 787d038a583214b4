//! Environment variable access.

use std::collections::HashMap;
use std::env;

use super::ConfigError;

/// Database driver name.
pub const ENV_DB_DRIVER: &str = "DB_DRIVER";
/// Database name.
pub const ENV_DB_NAME: &str = "DB_NAME";
/// Database user.
pub const ENV_DB_USER: &str = "DB_USER";
/// Database password (secret).
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
/// Database host.
pub const ENV_DB_HOST: &str = "DB_HOST";
/// Database port, coerced to an integer.
pub const ENV_DB_PORT: &str = "DB_PORT";
/// Deployment application identifier.
pub const ENV_APP_ID: &str = "DP_APP_ID";

/// Source of environment variables.
///
/// Implementations must not cache: every call observes the current state.
pub trait EnvironmentReader {
    /// Returns the variable value, or `None` when it is not set.
    fn read(&self, name: &str) -> Option<String>;

    /// Returns the variable value, failing when it is unset or empty.
    fn read_required(&self, name: &str) -> Result<String, ConfigError> {
        match self.read(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvironmentVariable(name.to_string())),
        }
    }

    /// Reads a required variable and coerces it to a TCP port.
    fn read_port(&self, name: &str) -> Result<u16, ConfigError> {
        let raw = self.read_required(name)?;
        match raw.trim().parse::<u16>() {
            Ok(port) if port > 0 => Ok(port),
            _ => Err(ConfigError::InvalidPort {
                name: name.to_string(),
                value: raw,
            }),
        }
    }
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvironmentReader for ProcessEnv {
    fn read(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

/// In-memory environment snapshot.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    pub fn remove(&mut self, name: &str) {
        self.vars.remove(name);
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvironmentReader for MapEnv {
    fn read(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
