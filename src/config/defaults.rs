//! Default values and validation rules for every optional setting.
//!
//! Each function takes the override (if any) and returns the effective
//! value, so the assembler never has to know what "unset" means.

use secrecy::SecretString;
use std::fs;
use tracing::debug;

use super::compat::CompatibilityOverrides;
use super::security::{SecurityOverrides, TrustedHostPolicy, TrustedHostsSetting};
use super::storage::{ConfigStorageBackends, ConfigStoragePaths, StorageOverrides};
use super::ConfigError;

pub const DEFAULT_DATABASE_PREFIX: &str = "";
pub const DEFAULT_UPDATE_FREE_ACCESS: bool = false;
pub const DEFAULT_DRUPAL_COMPATIBILITY: bool = true;
pub const DEFAULT_CLEAR_STAGING_AFTER_SYNC: bool = true;

pub fn database_prefix(prefix: Option<&str>) -> String {
    prefix.unwrap_or(DEFAULT_DATABASE_PREFIX).to_string()
}

/// Replaces derived directories with explicit ones, then checks active != staging.
pub fn storage_paths(
    derived: ConfigStoragePaths,
    overrides: &StorageOverrides,
) -> Result<ConfigStoragePaths, ConfigError> {
    let paths = ConfigStoragePaths {
        active: overrides.active_dir.clone().unwrap_or(derived.active),
        staging: overrides.staging_dir.clone().unwrap_or(derived.staging),
    };
    paths.validate()?;
    Ok(paths)
}

pub fn storage_backends(overrides: &StorageOverrides) -> ConfigStorageBackends {
    ConfigStorageBackends {
        active: overrides.active_class.unwrap_or_default(),
        staging: overrides.staging_class.unwrap_or_default(),
        clear_staging_after_sync: overrides
            .clear_staging_after_sync
            .unwrap_or(DEFAULT_CLEAR_STAGING_AFTER_SYNC),
    }
}

/// Empty salt unless given inline or through a file, never both.
pub fn hash_salt(overrides: &SecurityOverrides) -> Result<SecretString, ConfigError> {
    match (&overrides.hash_salt, &overrides.hash_salt_file) {
        (Some(_), Some(_)) => Err(ConfigError::Configuration(
            "hash_salt and hash_salt_file are mutually exclusive".into(),
        )),
        (Some(salt), None) => Ok(SecretString::from(salt.as_str())),
        (None, Some(path)) => {
            let content = fs::read_to_string(path)?;
            debug!(path = %path, "hash salt loaded from file");
            Ok(SecretString::from(content.trim_end_matches(['\r', '\n'])))
        }
        (None, None) => Ok(SecretString::from("")),
    }
}

/// Unset means "not configured", never an empty pattern list.
pub fn trusted_hosts(
    setting: Option<&TrustedHostsSetting>,
) -> Result<TrustedHostPolicy, ConfigError> {
    match setting {
        None => Ok(TrustedHostPolicy::NotConfigured),
        Some(TrustedHostsSetting::Enabled(false)) => Ok(TrustedHostPolicy::Disabled),
        Some(TrustedHostsSetting::Enabled(true)) => Err(ConfigError::Configuration(
            "trusted_host_patterns accepts a list of patterns or false".into(),
        )),
        Some(TrustedHostsSetting::Patterns(patterns)) => {
            TrustedHostPolicy::from_patterns(patterns.as_slice())
        }
    }
}

pub fn update_free_access(value: Option<bool>) -> bool {
    value.unwrap_or(DEFAULT_UPDATE_FREE_ACCESS)
}

/// An absolute http(s) URL without a trailing slash.
pub fn base_url(value: Option<&str>) -> Result<Option<String>, ConfigError> {
    let Some(url) = value else {
        return Ok(None);
    };

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| {
            ConfigError::Configuration(format!(
                "base_url {:?} must start with http:// or https://",
                url
            ))
        })?;

    if rest.is_empty() || rest.starts_with('/') {
        return Err(ConfigError::Configuration(format!(
            "base_url {:?} has no host",
            url
        )));
    }
    if url.ends_with('/') {
        return Err(ConfigError::Configuration(format!(
            "base_url {:?} must not have a trailing slash",
            url
        )));
    }
    if url.chars().any(char::is_whitespace) {
        return Err(ConfigError::Configuration(format!(
            "base_url {:?} contains whitespace",
            url
        )));
    }

    Ok(Some(url.to_string()))
}

pub fn drupal_compatibility(overrides: &CompatibilityOverrides) -> bool {
    overrides
        .drupal_compatibility
        .unwrap_or(DEFAULT_DRUPAL_COMPATIBILITY)
}
