//! Site configuration assembly.
//!
//! Required values come from environment variables; optional settings have
//! documented defaults and can be overridden through a YAML file of
//! recognized options. The result is an immutable [`SiteConfiguration`]
//! built once at bootstrap and passed explicitly to whatever consumes it.

mod compat;
mod database;
pub mod defaults;
mod env;
mod error;
mod security;
mod storage;

pub use compat::{CompatibilityFlags, CompatibilityOverrides};
pub use database::{DatabaseConnectionDescriptor, DatabaseDriver, DatabaseOverrides};
pub use env::{
    ENV_APP_ID, ENV_DB_DRIVER, ENV_DB_HOST, ENV_DB_NAME, ENV_DB_PASSWORD, ENV_DB_PORT,
    ENV_DB_USER, EnvironmentReader, MapEnv, ProcessEnv,
};
pub use error::ConfigError;
pub use security::{
    HostCheck, HostPattern, SecurityOverrides, SecuritySettings, TrustedHostPolicy,
    TrustedHostsSetting, is_valid_http_host,
};
pub use storage::{
    ConfigStorageBackends, ConfigStorageClass, ConfigStoragePaths, StorageOverrides,
    validate_app_id,
};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::{debug, info, warn};

/// Every environment variable that must be present at bootstrap.
pub const REQUIRED_ENV_VARS: [&str; 7] = [
    ENV_DB_DRIVER,
    ENV_DB_NAME,
    ENV_DB_USER,
    ENV_DB_PASSWORD,
    ENV_DB_HOST,
    ENV_DB_PORT,
    ENV_APP_ID,
];

/// Optional settings, all sections optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteOverrides {
    #[serde(default)]
    pub database: DatabaseOverrides,
    #[serde(default)]
    pub config_storage: StorageOverrides,
    #[serde(default)]
    pub security: SecurityOverrides,
    #[serde(default)]
    pub compatibility: CompatibilityOverrides,
    /// Absolute site URL, no trailing slash.
    pub base_url: Option<String>,
}

impl SiteOverrides {
    /// Load overrides from a YAML file at the given path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document means "no overrides".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Fully resolved site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfiguration {
    pub app_id: String,
    pub database: DatabaseConnectionDescriptor,
    pub config_directories: ConfigStoragePaths,
    pub config_storage: ConfigStorageBackends,
    pub security: SecuritySettings,
    pub compatibility: CompatibilityFlags,
    pub base_url: Option<String>,
}

impl SiteConfiguration {
    /// Reads `DP_APP_ID` and assembles the configuration with the given overrides.
    pub fn from_env(
        env: &dyn EnvironmentReader,
        overrides: &SiteOverrides,
    ) -> Result<Self, ConfigError> {
        let app_id = env.read_required(ENV_APP_ID)?;
        assemble_with(env, &app_id, overrides)
    }

    /// The salt the runtime should use.
    ///
    /// When no salt is configured this is the hex SHA-256 of the database
    /// connection fields, so it is stable across servers sharing the same
    /// credentials.
    pub fn effective_hash_salt(&self) -> SecretString {
        if !self.security.hash_salt.expose_secret().is_empty() {
            return self.security.hash_salt.clone();
        }
        SecretString::from(self.database.credentials_digest())
    }
}

/// Assembles the configuration using defaults for every optional setting.
pub fn assemble(
    env: &dyn EnvironmentReader,
    app_id: &str,
) -> Result<SiteConfiguration, ConfigError> {
    assemble_with(env, app_id, &SiteOverrides::default())
}

/// Assembles the configuration, applying explicit overrides.
pub fn assemble_with(
    env: &dyn EnvironmentReader,
    app_id: &str,
    overrides: &SiteOverrides,
) -> Result<SiteConfiguration, ConfigError> {
    let mut database = DatabaseConnectionDescriptor::from_env(env)?;
    database.prefix = defaults::database_prefix(overrides.database.prefix.as_deref());

    let derived = ConfigStoragePaths::for_app(app_id)?;
    let config_directories = defaults::storage_paths(derived, &overrides.config_storage)?;
    let config_storage = defaults::storage_backends(&overrides.config_storage);

    let security = SecuritySettings {
        hash_salt: defaults::hash_salt(&overrides.security)?,
        trusted_hosts: defaults::trusted_hosts(
            overrides.security.trusted_host_patterns.as_ref(),
        )?,
        update_free_access: defaults::update_free_access(overrides.security.update_free_access),
    };

    let compatibility = CompatibilityFlags {
        drupal_compatibility: defaults::drupal_compatibility(&overrides.compatibility),
    };

    let base_url = defaults::base_url(overrides.base_url.as_deref())?;

    if security.hash_salt.expose_secret().is_empty() {
        debug!("hash salt not set, runtime will derive it from database credentials");
    }
    if !security.trusted_hosts.is_configured() {
        warn!("trusted host patterns are not configured; all hosts will be accepted");
    }
    if security.update_free_access {
        warn!("update script access check is disabled");
    }

    info!(
        app_id = %app_id,
        driver = %database.driver,
        host = %database.host,
        port = database.port,
        active = %config_directories.active,
        staging = %config_directories.staging,
        "site configuration assembled"
    );

    Ok(SiteConfiguration {
        app_id: app_id.to_string(),
        database,
        config_directories,
        config_storage,
        security,
        compatibility,
        base_url,
    })
}
