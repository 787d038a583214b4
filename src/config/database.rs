//! Database connection configuration.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt;

use super::env::{
    ENV_DB_DRIVER, ENV_DB_HOST, ENV_DB_NAME, ENV_DB_PASSWORD, ENV_DB_PORT, ENV_DB_USER,
    EnvironmentReader,
};
use super::ConfigError;

/// Database driver identifier.
///
/// Unknown names are carried through verbatim so the runtime can decide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseDriver {
    Mysql,
    Pgsql,
    Sqlite,
    Other(String),
}

impl DatabaseDriver {
    pub fn parse(name: &str) -> Self {
        match name {
            "mysql" => Self::Mysql,
            "pgsql" => Self::Pgsql,
            "sqlite" => Self::Sqlite,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Mysql => "mysql",
            Self::Pgsql => "pgsql",
            Self::Sqlite => "sqlite",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for DatabaseDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings for the default database.
#[derive(Debug, Clone)]
pub struct DatabaseConnectionDescriptor {
    pub driver: DatabaseDriver,
    pub database: String,
    pub username: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    /// Table name prefix; empty means no prefix.
    pub prefix: String,
}

impl DatabaseConnectionDescriptor {
    /// Reads the six required variables in a fixed order.
    ///
    /// The first absent variable is reported.
    pub fn from_env(env: &dyn EnvironmentReader) -> Result<Self, ConfigError> {
        let driver = env.read_required(ENV_DB_DRIVER)?;
        let database = env.read_required(ENV_DB_NAME)?;
        let username = env.read_required(ENV_DB_USER)?;
        let password = env.read_required(ENV_DB_PASSWORD)?;
        let host = env.read_required(ENV_DB_HOST)?;
        let port = env.read_port(ENV_DB_PORT)?;

        Ok(Self {
            driver: DatabaseDriver::parse(&driver),
            database,
            username,
            password: SecretString::from(password),
            host,
            port,
            prefix: String::new(),
        })
    }

    /// SHA-256 over every connection field, hex encoded.
    pub(crate) fn credentials_digest(&self) -> String {
        let mut hasher = Sha256::new();
        CanonicalCredentials::from(self).write_to(&mut hasher);
        hex::encode(hasher.finalize())
    }
}

/// Borrowed view of the descriptor in a fixed field order.
struct CanonicalCredentials<'a> {
    driver: &'a str,
    database: &'a str,
    username: &'a str,
    password: &'a str,
    host: &'a str,
    port: u16,
    prefix: &'a str,
}

impl<'a> From<&'a DatabaseConnectionDescriptor> for CanonicalCredentials<'a> {
    fn from(db: &'a DatabaseConnectionDescriptor) -> Self {
        Self {
            driver: db.driver.as_str(),
            database: &db.database,
            username: &db.username,
            password: db.password.expose_secret(),
            host: &db.host,
            port: db.port,
            prefix: &db.prefix,
        }
    }
}

impl CanonicalCredentials<'_> {
    // Each string is length-prefixed so field boundaries cannot shift.
    fn write_to(&self, hasher: &mut Sha256) {
        for field in [
            self.driver,
            self.database,
            self.username,
            self.password,
            self.host,
        ] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        hasher.update(self.port.to_le_bytes());
        hasher.update((self.prefix.len() as u64).to_le_bytes());
        hasher.update(self.prefix.as_bytes());
    }
}

/// Optional database settings from the overrides file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseOverrides {
    /// Table name prefix.
    pub prefix: Option<String>,
}
