//! Backwards-compatibility toggles.

use serde::Deserialize;

/// Legacy API compatibility switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatibilityFlags {
    /// Keep the Drupal 7 API compatibility layer loaded.
    pub drupal_compatibility: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompatibilityOverrides {
    pub drupal_compatibility: Option<bool>,
}
