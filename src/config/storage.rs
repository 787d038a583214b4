//! Configuration storage settings.

use regex::Regex;
use serde::Deserialize;
use std::path::{Component, Path};
use std::sync::LazyLock;

use super::ConfigError;

static APP_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("app id pattern is valid")
});

/// Where the active and staging configuration sets live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStoragePaths {
    pub active: String,
    pub staging: String,
}

impl ConfigStoragePaths {
    /// Derives `files/config_<app_id>/{active,staging}`.
    pub fn for_app(app_id: &str) -> Result<Self, ConfigError> {
        validate_app_id(app_id)?;
        let base = format!("files/config_{}", app_id);
        Ok(Self {
            active: format!("{}/active", base),
            staging: format!("{}/staging", base),
        })
    }

    /// Both sets must point at different directories.
    ///
    /// Paths are compared lexically, ignoring `.` segments, repeated and
    /// trailing separators.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let active = normalized_components(&self.active);
        let staging = normalized_components(&self.staging);
        if active.is_empty() || staging.is_empty() {
            return Err(ConfigError::Configuration(
                "config storage directories must not be empty".into(),
            ));
        }
        if active == staging {
            return Err(ConfigError::Configuration(format!(
                "active and staging config directories are the same: {}",
                self.active
            )));
        }
        Ok(())
    }
}

fn normalized_components(path: &str) -> Vec<Component<'_>> {
    Path::new(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Rejects identifiers that could escape `files/`.
pub fn validate_app_id(app_id: &str) -> Result<(), ConfigError> {
    if app_id.is_empty() {
        return Err(ConfigError::InvalidAppId("app id is empty".into()));
    }
    if app_id.contains("..") || app_id.contains('/') || app_id.contains('\\') {
        return Err(ConfigError::InvalidAppId(format!(
            "{:?} contains a path traversal sequence",
            app_id
        )));
    }
    if !APP_ID_PATTERN.is_match(app_id) {
        return Err(ConfigError::InvalidAppId(format!(
            "{:?} must contain only letters, digits, '-' and '_'",
            app_id
        )));
    }
    Ok(())
}

/// Backend used to hold a configuration set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ConfigStorageClass {
    #[default]
    #[serde(rename = "ConfigFileStorage")]
    File,
    #[serde(rename = "ConfigDatabaseStorage")]
    Database,
}

/// Storage backends for both configuration sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStorageBackends {
    pub active: ConfigStorageClass,
    pub staging: ConfigStorageClass,
    /// Empty the staging directory after each sync.
    pub clear_staging_after_sync: bool,
}

/// Optional storage settings from the overrides file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageOverrides {
    /// Replaces the derived active directory.
    pub active_dir: Option<String>,
    /// Replaces the derived staging directory.
    pub staging_dir: Option<String>,
    pub active_class: Option<ConfigStorageClass>,
    pub staging_class: Option<ConfigStorageClass>,
    /// Keep staging files after sync when false (default: true).
    pub clear_staging_after_sync: Option<bool>,
}
